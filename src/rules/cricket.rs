//! Classic two-player cricket: close the seven scoring sectors, score
//! surplus hits against an opponent who still has the sector open.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    score::{ClosingScore, PlayerScore, SCORING_SECTORS},
    throw::Throw,
    types::PlayerId,
};

use super::{GameMode, RosterError, SettingsError, ThrowEvaluation};

/// Validated configuration shared by the cricket family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CricketSettings {
    darts_per_turn: u8,
    hits_to_close_sector: u8,
    count_multipliers: bool,
}

impl CricketSettings {
    /// Validates and builds the settings. `darts_per_turn` below 3 exists
    /// for short test games.
    pub fn new(
        darts_per_turn: u8,
        hits_to_close_sector: u8,
        count_multipliers: bool,
    ) -> Result<Self, SettingsError> {
        if !(1..=3).contains(&darts_per_turn) {
            return Err(SettingsError::OutOfRange {
                name: "darts_per_turn",
                min: 1,
                max: 3,
                value: u32::from(darts_per_turn),
            });
        }

        if !(1..=5).contains(&hits_to_close_sector) {
            return Err(SettingsError::OutOfRange {
                name: "hits_to_close_sector",
                min: 1,
                max: 5,
                value: u32::from(hits_to_close_sector),
            });
        }

        Ok(Self {
            darts_per_turn,
            hits_to_close_sector,
            count_multipliers,
        })
    }

    /// Darts each player throws per turn.
    pub fn darts_per_turn(&self) -> u8 {
        self.darts_per_turn
    }

    /// Hits required to close a sector.
    pub fn hits_to_close_sector(&self) -> u8 {
        self.hits_to_close_sector
    }

    /// Whether the double/triple rings count as multiple hits.
    pub fn count_multipliers(&self) -> bool {
        self.count_multipliers
    }

    pub(crate) fn new_hits(&self, throw: &Throw) -> u8 {
        if self.count_multipliers {
            throw.multiplier()
        } else {
            1
        }
    }
}

impl Default for CricketSettings {
    fn default() -> Self {
        Self {
            darts_per_turn: 3,
            hits_to_close_sector: 3,
            count_multipliers: true,
        }
    }
}

/// Applies `new_hits` on `sector` to a closing score, capping the hit count
/// at `cap` and returning the surplus that carries over as scoring hits.
pub(crate) fn apply_sector_hits(
    score: ClosingScore,
    sector: u8,
    new_hits: u8,
    cap: u8,
) -> (ClosingScore, u8) {
    if score.is_closed(sector, cap) {
        // Every hit on a closed sector is surplus.
        return (score, new_hits);
    }

    let current = score.hits_on(sector);
    let updated_hits = cap.min(current + new_hits);
    let additional = (current + new_hits).saturating_sub(cap);
    (score.with_hits(sector, updated_hits), additional)
}

/// Classic cricket: surplus hits score for the thrower while the opponent
/// has the sector open; win by closing everything with at least as many
/// points as the opponent.
pub struct Cricket {
    settings: CricketSettings,
}

impl Cricket {
    /// Builds the variant from validated settings.
    pub fn new(settings: CricketSettings) -> Self {
        Self { settings }
    }
}

impl GameMode for Cricket {
    fn darts_per_turn(&self) -> u8 {
        self.settings.darts_per_turn
    }

    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError> {
        if players.len() != 2 {
            return Err(RosterError::PlayerCount {
                mode: "cricket",
                min: 2,
                max: 2,
                found: players.len(),
            });
        }
        Ok(())
    }

    fn initial_score(&self, player_id: PlayerId) -> PlayerScore {
        PlayerScore::Closing(ClosingScore::new(player_id))
    }

    fn evaluate_throw(
        &self,
        player_id: PlayerId,
        throw: &Throw,
        all_scores: &HashMap<PlayerId, PlayerScore>,
    ) -> ThrowEvaluation {
        let player = all_scores
            .get(&player_id)
            .unwrap_or_else(|| panic!("no score entry for thrower {player_id}"))
            .as_closing("thrower");
        let (_, opponent) = all_scores
            .iter()
            .find(|&(&id, _)| id != player_id)
            .expect("two-player roster always has an opponent");
        let opponent = opponent.as_closing("opponent");

        let sector = throw.sector();
        // There is no bust in this family; off-sector darts change nothing.
        if !SCORING_SECTORS.contains(&sector) {
            return ThrowEvaluation::proceed(PlayerScore::Closing(player));
        }

        let cap = self.settings.hits_to_close_sector;
        let (mut updated, additional_hits) =
            apply_sector_hits(player, sector, self.settings.new_hits(throw), cap);

        if additional_hits > 0 && !opponent.is_closed(sector, cap) {
            updated.points += u32::from(additional_hits) * u32::from(sector);
        }

        if !updated.all_closed(cap) {
            return ThrowEvaluation::proceed(PlayerScore::Closing(updated));
        }

        if updated.points > opponent.points {
            return ThrowEvaluation::win(PlayerScore::Closing(updated), None);
        }
        if updated.points == opponent.points {
            // Level on points: a draw only if the opponent is also done;
            // otherwise first to close everything takes it.
            if opponent.all_closed(cap) {
                return ThrowEvaluation::tie(PlayerScore::Closing(updated), None);
            }
            return ThrowEvaluation::win(PlayerScore::Closing(updated), None);
        }

        ThrowEvaluation::proceed(PlayerScore::Closing(updated))
    }
}

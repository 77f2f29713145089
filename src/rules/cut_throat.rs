//! Cut-throat cricket for 2..4 players: surplus hits add penalty points to
//! every opponent with the sector still open; lowest penalty wins.

use hashbrown::HashMap;

use crate::{
    score::{ClosingScore, PlayerScore, SCORING_SECTORS},
    throw::Throw,
    types::PlayerId,
};

use super::{
    GameMode, RosterError, ThrowEvaluation,
    cricket::{apply_sector_hits, CricketSettings},
};

/// Multi-player penalty cricket.
pub struct CutThroatCricket {
    settings: CricketSettings,
}

impl CutThroatCricket {
    /// Builds the variant from validated settings.
    pub fn new(settings: CricketSettings) -> Self {
        Self { settings }
    }
}

impl GameMode for CutThroatCricket {
    fn darts_per_turn(&self) -> u8 {
        self.settings.darts_per_turn()
    }

    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError> {
        if !(2..=4).contains(&players.len()) {
            return Err(RosterError::PlayerCount {
                mode: "cut-throat cricket",
                min: 2,
                max: 4,
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

        let sector = throw.sector();
        // There is no bust in this family; off-sector darts change nothing.
        if !SCORING_SECTORS.contains(&sector) {
            return ThrowEvaluation::proceed(PlayerScore::Closing(player));
        }

        let cap = self.settings.hits_to_close_sector();
        let (updated, additional_hits) =
            apply_sector_hits(player, sector, self.settings.new_hits(throw), cap);

        if additional_hits == 0 && !updated.all_closed(cap) {
            return ThrowEvaluation::proceed(PlayerScore::Closing(updated));
        }

        // Surplus hits penalize everyone who still has the sector open.
        let penalty = u32::from(additional_hits) * u32::from(sector);
        let mut opponents: Vec<ClosingScore> = Vec::new();
        let mut others: HashMap<PlayerId, PlayerScore> = HashMap::new();
        for (&id, score) in all_scores {
            if id == player_id {
                continue;
            }
            let mut opponent = score.as_closing("opponent");
            if penalty > 0 && !opponent.is_closed(sector, cap) {
                opponent.points += penalty;
                others.insert(id, PlayerScore::Closing(opponent));
            }
            opponents.push(opponent);
        }
        let others = if others.is_empty() { None } else { Some(others) };

        if !updated.all_closed(cap) {
            return match others {
                Some(others) => ThrowEvaluation::proceed_with(PlayerScore::Closing(updated), others),
                None => ThrowEvaluation::proceed(PlayerScore::Closing(updated)),
            };
        }

        // All sectors closed: rank against the other all-closed players.
        // Open players never block a win, whatever their penalty.
        let closed_rivals: Vec<&ClosingScore> = opponents
            .iter()
            .filter(|o| o.all_closed(cap))
            .collect();

        if closed_rivals.iter().any(|o| o.points < updated.points) {
            return match others {
                Some(others) => ThrowEvaluation::proceed_with(PlayerScore::Closing(updated), others),
                None => ThrowEvaluation::proceed(PlayerScore::Closing(updated)),
            };
        }
        if closed_rivals.iter().any(|o| o.points == updated.points) {
            return ThrowEvaluation::tie(PlayerScore::Closing(updated), others);
        }
        ThrowEvaluation::win(PlayerScore::Closing(updated), others)
    }
}

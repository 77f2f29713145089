//! Free-for-all countdown: 2..4 players race to a number of legs, no
//! advantage play.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    score::{CountdownScore, PlayerScore},
    throw::Throw,
    types::PlayerId,
};

use super::{
    GameMode, Progress, RosterError, SettingsError, ThrowEvaluation,
    x01::{self, finishes_leg, is_bust},
};

/// Validated configuration for [`FreeForAll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeForAllSettings {
    darts_per_turn: u8,
    score_per_leg: i32,
    legs_to_win_match: u32,
    double_out: bool,
}

impl FreeForAllSettings {
    /// Validates and builds the settings.
    pub fn new(
        darts_per_turn: u8,
        score_per_leg: i32,
        legs_to_win_match: u32,
        double_out: bool,
    ) -> Result<Self, SettingsError> {
        if !(1..=3).contains(&darts_per_turn) {
            return Err(SettingsError::OutOfRange {
                name: "darts_per_turn",
                min: 1,
                max: 3,
                value: u32::from(darts_per_turn),
            });
        }

        x01::validate_score_per_leg(score_per_leg)?;

        if !(1..=18).contains(&legs_to_win_match) {
            return Err(SettingsError::OutOfRange {
                name: "legs_to_win_match",
                min: 1,
                max: 18,
                value: legs_to_win_match,
            });
        }

        Ok(Self {
            darts_per_turn,
            score_per_leg,
            legs_to_win_match,
            double_out,
        })
    }

    /// Darts each player throws per turn.
    pub fn darts_per_turn(&self) -> u8 {
        self.darts_per_turn
    }

    /// Starting score of every leg.
    pub fn score_per_leg(&self) -> i32 {
        self.score_per_leg
    }

    /// Legs needed to win the match.
    pub fn legs_to_win_match(&self) -> u32 {
        self.legs_to_win_match
    }

    /// Whether the finishing dart must be a double.
    pub fn double_out(&self) -> bool {
        self.double_out
    }
}

impl Default for FreeForAllSettings {
    fn default() -> Self {
        Self {
            darts_per_turn: 3,
            score_per_leg: 501,
            legs_to_win_match: 3,
            double_out: false,
        }
    }
}

/// Multi-player legs race.
pub struct FreeForAll {
    settings: FreeForAllSettings,
}

impl FreeForAll {
    /// Builds the variant from validated settings.
    pub fn new(settings: FreeForAllSettings) -> Self {
        Self { settings }
    }
}

impl GameMode for FreeForAll {
    fn darts_per_turn(&self) -> u8 {
        self.settings.darts_per_turn
    }

    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError> {
        if !(2..=4).contains(&players.len()) {
            return Err(RosterError::PlayerCount {
                mode: "free-for-all",
                min: 2,
                max: 4,
                found: players.len(),
            });
        }
        Ok(())
    }

    fn initial_score(&self, player_id: PlayerId) -> PlayerScore {
        PlayerScore::Countdown(CountdownScore {
            player_id,
            remaining_in_leg: self.settings.score_per_leg,
            legs_won: 0,
        })
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
            .as_countdown("thrower");

        let after_throw = player.remaining_in_leg - throw.points();

        if after_throw != 0 {
            if is_bust(after_throw, self.settings.double_out) {
                return ThrowEvaluation::bust();
            }
            return ThrowEvaluation::proceed(PlayerScore::Countdown(CountdownScore {
                remaining_in_leg: after_throw,
                ..player
            }));
        }

        if !finishes_leg(throw, self.settings.double_out) {
            return ThrowEvaluation::bust();
        }

        let updated = CountdownScore {
            remaining_in_leg: self.settings.score_per_leg,
            legs_won: player.legs_won + 1,
            ..player
        };

        if updated.legs_won >= self.settings.legs_to_win_match {
            return ThrowEvaluation::win(PlayerScore::Countdown(updated), None);
        }

        // Fresh leg for the whole table.
        let mut others = HashMap::new();
        for (&id, score) in all_scores {
            if id == player_id {
                continue;
            }
            let other = score.as_countdown("other participant");
            others.insert(
                id,
                PlayerScore::Countdown(CountdownScore {
                    remaining_in_leg: self.settings.score_per_leg,
                    ..other
                }),
            );
        }

        ThrowEvaluation::advance(PlayerScore::Countdown(updated), others, Progress::LegWon)
    }
}

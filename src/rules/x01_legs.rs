//! Two-player x01: first to a number of legs, optionally with advantage
//! play and a sudden-death cap.

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

/// Validated configuration for [`X01Legs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct X01LegsSettings {
    score_per_leg: i32,
    legs_to_win_match: u32,
    double_out: bool,
    advantages: bool,
    sudden_death_leg: Option<u32>,
}

impl X01LegsSettings {
    /// Validates and builds the settings.
    ///
    /// Advantage play only takes effect when more than one leg is needed;
    /// its sudden-death cap defaults to `legs_to_win_match + 2` and must
    /// exceed `legs_to_win_match`.
    pub fn new(
        score_per_leg: i32,
        legs_to_win_match: u32,
        double_out: bool,
        advantages: bool,
        sudden_death_leg: Option<u32>,
    ) -> Result<Self, SettingsError> {
        x01::validate_score_per_leg(score_per_leg)?;

        if !(1..=18).contains(&legs_to_win_match) {
            return Err(SettingsError::OutOfRange {
                name: "legs_to_win_match",
                min: 1,
                max: 18,
                value: legs_to_win_match,
            });
        }

        let advantages = advantages && legs_to_win_match > 1;
        let sudden_death_leg = if advantages {
            let cap = sudden_death_leg.unwrap_or(legs_to_win_match + 2);
            if cap <= legs_to_win_match {
                return Err(SettingsError::SuddenDeathTooLow {
                    sudden_death: cap,
                    threshold: legs_to_win_match,
                });
            }
            Some(cap)
        } else {
            None
        };

        Ok(Self {
            score_per_leg,
            legs_to_win_match,
            double_out,
            advantages,
            sudden_death_leg,
        })
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

    /// Whether the match must be won by two legs (up to the cap).
    pub fn advantages(&self) -> bool {
        self.advantages
    }

    /// Sudden-death cap leg count, present only with advantage play.
    pub fn sudden_death_leg(&self) -> Option<u32> {
        self.sudden_death_leg
    }
}

impl Default for X01LegsSettings {
    fn default() -> Self {
        Self {
            score_per_leg: 501,
            legs_to_win_match: 3,
            double_out: false,
            advantages: false,
            sudden_death_leg: None,
        }
    }
}

/// Classic two-player legs race.
pub struct X01Legs {
    settings: X01LegsSettings,
}

impl X01Legs {
    /// Builds the variant from validated settings.
    pub fn new(settings: X01LegsSettings) -> Self {
        Self { settings }
    }

    fn match_won(&self, legs_won: u32, opponent_legs_won: u32) -> bool {
        if !self.settings.advantages {
            return legs_won >= self.settings.legs_to_win_match;
        }

        let cap = self
            .settings
            .sudden_death_leg
            .expect("advantage play always carries a sudden-death cap");
        (legs_won >= self.settings.legs_to_win_match && legs_won >= opponent_legs_won + 2)
            || legs_won >= cap
    }
}

impl GameMode for X01Legs {
    fn darts_per_turn(&self) -> u8 {
        3
    }

    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError> {
        if players.len() != 2 {
            return Err(RosterError::PlayerCount {
                mode: "x01 legs",
                min: 2,
                max: 2,
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
        let (&opponent_id, opponent) = all_scores
            .iter()
            .find(|&(&id, _)| id != player_id)
            .expect("two-player roster always has an opponent");
        let opponent = opponent.as_countdown("opponent");

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

        if self.match_won(updated.legs_won, opponent.legs_won) {
            return ThrowEvaluation::win(PlayerScore::Countdown(updated), None);
        }

        // Fresh leg for both sides.
        let mut others = HashMap::new();
        others.insert(
            opponent_id,
            PlayerScore::Countdown(CountdownScore {
                remaining_in_leg: self.settings.score_per_leg,
                ..opponent
            }),
        );

        ThrowEvaluation::advance(PlayerScore::Countdown(updated), others, Progress::LegWon)
    }
}

//! Two-player x01 sets play: legs roll up into sets, with a decider rule
//! once both sides are one set from match point.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    score::{PlayerScore, SetsScore},
    throw::Throw,
    types::PlayerId,
};

use super::{
    GameMode, Progress, RosterError, SettingsError, ThrowEvaluation,
    x01::{self, finishes_leg, is_bust},
};

/// Validated configuration for [`X01Sets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct X01SetsSettings {
    score_per_leg: i32,
    legs_to_win_set: u32,
    sets_to_win_match: u32,
    double_out: bool,
    advantages: bool,
    sudden_death_leg: Option<u32>,
}

impl X01SetsSettings {
    /// Validates and builds the settings.
    ///
    /// The sudden-death cap applies to the decider set; it defaults to
    /// `legs_to_win_set + 2` and must exceed `legs_to_win_set`.
    pub fn new(
        score_per_leg: i32,
        legs_to_win_set: u32,
        sets_to_win_match: u32,
        double_out: bool,
        advantages: bool,
        sudden_death_leg: Option<u32>,
    ) -> Result<Self, SettingsError> {
        x01::validate_score_per_leg(score_per_leg)?;

        if !(2..=4).contains(&legs_to_win_set) {
            return Err(SettingsError::OutOfRange {
                name: "legs_to_win_set",
                min: 2,
                max: 4,
                value: legs_to_win_set,
            });
        }

        if !(3..=7).contains(&sets_to_win_match) {
            return Err(SettingsError::OutOfRange {
                name: "sets_to_win_match",
                min: 3,
                max: 7,
                value: sets_to_win_match,
            });
        }

        let sudden_death_leg = if advantages {
            let cap = sudden_death_leg.unwrap_or(legs_to_win_set + 2);
            if cap <= legs_to_win_set {
                return Err(SettingsError::SuddenDeathTooLow {
                    sudden_death: cap,
                    threshold: legs_to_win_set,
                });
            }
            Some(cap)
        } else {
            None
        };

        Ok(Self {
            score_per_leg,
            legs_to_win_set,
            sets_to_win_match,
            double_out,
            advantages,
            sudden_death_leg,
        })
    }

    /// Starting score of every leg.
    pub fn score_per_leg(&self) -> i32 {
        self.score_per_leg
    }

    /// Legs needed to win a set.
    pub fn legs_to_win_set(&self) -> u32 {
        self.legs_to_win_set
    }

    /// Sets needed to win the match.
    pub fn sets_to_win_match(&self) -> u32 {
        self.sets_to_win_match
    }

    /// Whether the finishing dart must be a double.
    pub fn double_out(&self) -> bool {
        self.double_out
    }

    /// Whether a level decider set must be won by two legs.
    pub fn advantages(&self) -> bool {
        self.advantages
    }

    /// Sudden-death cap leg count for the decider set.
    pub fn sudden_death_leg(&self) -> Option<u32> {
        self.sudden_death_leg
    }
}

impl Default for X01SetsSettings {
    fn default() -> Self {
        Self {
            score_per_leg: 501,
            legs_to_win_set: 3,
            sets_to_win_match: 3,
            double_out: false,
            advantages: false,
            sudden_death_leg: None,
        }
    }
}

/// Classic two-player sets play.
pub struct X01Sets {
    settings: X01SetsSettings,
}

impl X01Sets {
    /// Builds the variant from validated settings.
    pub fn new(settings: X01SetsSettings) -> Self {
        Self { settings }
    }

    /// Both sides one set from match point.
    fn in_decider(&self, sets_won: u32, opponent_sets_won: u32) -> bool {
        self.settings.advantages
            && sets_won == self.settings.sets_to_win_match - 1
            && opponent_sets_won == self.settings.sets_to_win_match - 1
    }

    /// Decider set: two legs clear, or the sudden-death cap reached.
    fn decider_won(&self, legs_won: u32, opponent_legs_won: u32) -> bool {
        let cap = self
            .settings
            .sudden_death_leg
            .expect("advantage play always carries a sudden-death cap");
        (legs_won >= self.settings.legs_to_win_set && legs_won >= opponent_legs_won + 2)
            || legs_won >= cap
    }
}

impl GameMode for X01Sets {
    fn darts_per_turn(&self) -> u8 {
        3
    }

    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError> {
        if players.len() != 2 {
            return Err(RosterError::PlayerCount {
                mode: "x01 sets",
                min: 2,
                max: 2,
                found: players.len(),
            });
        }
        Ok(())
    }

    fn initial_score(&self, player_id: PlayerId) -> PlayerScore {
        PlayerScore::Sets(SetsScore {
            player_id,
            remaining_in_leg: self.settings.score_per_leg,
            legs_won_in_set: 0,
            sets_won: 0,
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
            .as_sets("thrower");
        let (&opponent_id, opponent) = all_scores
            .iter()
            .find(|&(&id, _)| id != player_id)
            .expect("two-player roster always has an opponent");
        let opponent = opponent.as_sets("opponent");

        let after_throw = player.remaining_in_leg - throw.points();

        if after_throw != 0 {
            if is_bust(after_throw, self.settings.double_out) {
                return ThrowEvaluation::bust();
            }
            return ThrowEvaluation::proceed(PlayerScore::Sets(SetsScore {
                remaining_in_leg: after_throw,
                ..player
            }));
        }

        if !finishes_leg(throw, self.settings.double_out) {
            return ThrowEvaluation::bust();
        }

        let mut legs_won = player.legs_won_in_set + 1;
        let mut sets_won = player.sets_won;
        let mut set_won = false;
        let mut match_won = false;

        if self.in_decider(sets_won, opponent.sets_won) {
            // A decider set win is the match.
            if self.decider_won(legs_won, opponent.legs_won_in_set) {
                set_won = true;
                legs_won = 0;
                sets_won += 1;
                match_won = true;
            }
        } else if legs_won >= self.settings.legs_to_win_set {
            set_won = true;
            legs_won = 0;
            sets_won += 1;
            match_won = sets_won >= self.settings.sets_to_win_match;
        }

        let updated = PlayerScore::Sets(SetsScore {
            remaining_in_leg: self.settings.score_per_leg,
            legs_won_in_set: legs_won,
            sets_won,
            ..player
        });

        if match_won {
            return ThrowEvaluation::win(updated, None);
        }

        // Fresh leg for the opponent; a set win also clears their legs.
        let mut others = HashMap::new();
        others.insert(
            opponent_id,
            PlayerScore::Sets(SetsScore {
                remaining_in_leg: self.settings.score_per_leg,
                legs_won_in_set: if set_won { 0 } else { opponent.legs_won_in_set },
                ..opponent
            }),
        );

        let progress = if set_won {
            Progress::SetWon
        } else {
            Progress::LegWon
        };
        ThrowEvaluation::advance(updated, others, progress)
    }
}

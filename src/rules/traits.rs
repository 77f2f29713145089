//! Capability contract every rule variant implements.

use hashbrown::HashMap;

use crate::{
    score::PlayerScore,
    throw::Throw,
    types::PlayerId,
};

use super::RosterError;

/// What a single dart did to the match, from the variant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Invalid finish; the match restores the turn-start snapshot and the
    /// turn is forfeited. Not an error.
    Bust,
    /// Play goes on.
    Continue,
    /// The thrower won the match.
    Win,
    /// The match ended level between two or more players.
    Tie,
}

/// Boundary signal carried on countdown results so the match layer can
/// rotate the leg/set starter without re-deriving it from score deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    /// No boundary crossed.
    #[default]
    None,
    /// A leg was just won (match still running).
    LegWon,
    /// A set was just won (match still running).
    SetWon,
}

/// Outcome of evaluating one throw.
///
/// Created fresh per evaluation and never mutated; the match layer consumes
/// it within the same call.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowEvaluation {
    /// What the dart did.
    pub outcome: Outcome,
    /// The thrower's new score. Absent on [`Outcome::Bust`]; the match
    /// restores its own snapshot instead.
    pub updated_score: Option<PlayerScore>,
    /// Side-effect changes to other participants, absent when none changed.
    pub other_updated: Option<HashMap<PlayerId, PlayerScore>>,
    /// Boundary signal for turn rotation.
    pub progress: Progress,
}

impl ThrowEvaluation {
    /// Bust: no score carried, the match rolls back.
    pub fn bust() -> Self {
        Self {
            outcome: Outcome::Bust,
            updated_score: None,
            other_updated: None,
            progress: Progress::None,
        }
    }

    /// Continue with only the thrower's score changed.
    pub fn proceed(updated: PlayerScore) -> Self {
        Self {
            outcome: Outcome::Continue,
            updated_score: Some(updated),
            other_updated: None,
            progress: Progress::None,
        }
    }

    /// Continue with side effects on other participants.
    pub fn proceed_with(updated: PlayerScore, others: HashMap<PlayerId, PlayerScore>) -> Self {
        Self {
            outcome: Outcome::Continue,
            updated_score: Some(updated),
            other_updated: Some(others),
            progress: Progress::None,
        }
    }

    /// Continue across a leg/set boundary.
    pub fn advance(
        updated: PlayerScore,
        others: HashMap<PlayerId, PlayerScore>,
        progress: Progress,
    ) -> Self {
        Self {
            outcome: Outcome::Continue,
            updated_score: Some(updated),
            other_updated: Some(others),
            progress,
        }
    }

    /// Match won by the thrower.
    pub fn win(updated: PlayerScore, others: Option<HashMap<PlayerId, PlayerScore>>) -> Self {
        Self {
            outcome: Outcome::Win,
            updated_score: Some(updated),
            other_updated: others,
            progress: Progress::None,
        }
    }

    /// Match ended level among all-closed players.
    pub fn tie(updated: PlayerScore, others: Option<HashMap<PlayerId, PlayerScore>>) -> Self {
        Self {
            outcome: Outcome::Tie,
            updated_score: Some(updated),
            other_updated: others,
            progress: Progress::None,
        }
    }
}

/// One rule variant: validates rosters, mints starting scores, and decides
/// what each dart does. Evaluation is a pure function of its inputs; the
/// score map is read but never mutated here.
pub trait GameMode: Send + Sync + 'static {
    /// Darts each player throws per turn.
    fn darts_per_turn(&self) -> u8;

    /// Checks the roster size against the variant's allowed range.
    fn validate_players(&self, players: &[PlayerId]) -> Result<(), RosterError>;

    /// Mints the variant's starting score for one player.
    fn initial_score(&self, player_id: PlayerId) -> PlayerScore;

    /// Evaluates one dart against the current scores of all participants.
    fn evaluate_throw(
        &self,
        player_id: PlayerId,
        throw: &Throw,
        all_scores: &HashMap<PlayerId, PlayerScore>,
    ) -> ThrowEvaluation;
}

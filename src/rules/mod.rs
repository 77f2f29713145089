//! Rule variants: one pluggable evaluator per game family.

/// Classic cricket (close sectors, score on the open opponent).
pub mod cricket;
/// Cut-throat cricket (close sectors, penalize open opponents).
pub mod cut_throat;
/// Free-for-all countdown for 2..4 players.
pub mod free_for_all;
/// Rule-variant trait and throw evaluation contract.
pub mod traits;
/// Shared countdown (x01) mechanics.
pub(crate) mod x01;
/// Classic x01 race to a number of legs.
pub mod x01_legs;
/// Classic x01 sets play.
pub mod x01_sets;

use thiserror::Error;

use crate::types::PlayerId;

pub use traits::{GameMode, Outcome, Progress, ThrowEvaluation};

/// Rejection raised by a settings constructor for out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Starting score not on the x01 ladder.
    #[error("score per leg must be one of 201, 301, 401, 501, 601, 701, 801 or 901, got {0}")]
    ScorePerLeg(i32),
    /// A numeric knob outside its allowed range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Name of the offending setting.
        name: &'static str,
        /// Smallest allowed value.
        min: u32,
        /// Largest allowed value.
        max: u32,
        /// Rejected value.
        value: u32,
    },
    /// Sudden-death cap at or below the ordinary winning threshold.
    #[error("sudden death leg {sudden_death} must exceed the winning threshold {threshold}")]
    SuddenDeathTooLow {
        /// Configured cap.
        sudden_death: u32,
        /// Legs needed to win without the cap.
        threshold: u32,
    },
}

/// Rejection raised when a roster does not fit the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Participant count outside the variant's allowed range.
    #[error("{mode} requires {min}..={max} players, got {found}")]
    PlayerCount {
        /// Variant name.
        mode: &'static str,
        /// Minimum roster size.
        min: usize,
        /// Maximum roster size.
        max: usize,
        /// Offered roster size.
        found: usize,
    },
    /// The same player id appears twice.
    #[error("duplicate player id {0} in roster")]
    DuplicatePlayer(PlayerId),
}

//! Mechanics shared by the countdown (x01) variants.

use crate::throw::Throw;

use super::SettingsError;

/// Starting scores a leg may be played from.
pub(crate) const ALLOWED_STARTING_SCORES: [i32; 8] = [201, 301, 401, 501, 601, 701, 801, 901];

pub(crate) fn validate_score_per_leg(score_per_leg: i32) -> Result<(), SettingsError> {
    if ALLOWED_STARTING_SCORES.contains(&score_per_leg) {
        Ok(())
    } else {
        Err(SettingsError::ScorePerLeg(score_per_leg))
    }
}

/// Instant bust when the remainder is not exactly zero: always below zero,
/// and additionally a remainder of 1 under double-out (no double scores 1).
pub(crate) fn is_bust(after_throw: i32, double_out: bool) -> bool {
    if !double_out {
        after_throw < 0
    } else {
        after_throw < 0 || after_throw == 1
    }
}

/// Whether a dart that lands exactly on zero actually finishes the leg.
pub(crate) fn finishes_leg(throw: &Throw, double_out: bool) -> bool {
    !double_out || throw.is_double()
}

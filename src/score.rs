//! Per-player score snapshots, one shape per rule family.
//!
//! Scores are small `Copy` values updated with struct-update syntax; every
//! change produces a new value, which keeps the match layer's turn-start
//! snapshot free of aliasing.

use serde::{Deserialize, Serialize};

use crate::types::PlayerId;

/// The seven cricket scoring sectors, in hit-array order.
pub const SCORING_SECTORS: [u8; 7] = [15, 16, 17, 18, 19, 20, 25];

/// Countdown score for legs-only play (x01 legs, free-for-all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownScore {
    /// Owning player.
    pub player_id: PlayerId,
    /// Points left in the current leg; never negative at rest.
    pub remaining_in_leg: i32,
    /// Legs won so far in the match.
    pub legs_won: u32,
}

/// Countdown score for sets play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetsScore {
    /// Owning player.
    pub player_id: PlayerId,
    /// Points left in the current leg; never negative at rest.
    pub remaining_in_leg: i32,
    /// Legs won in the current set.
    pub legs_won_in_set: u32,
    /// Sets won so far in the match.
    pub sets_won: u32,
}

/// Closing score for the cricket family: a penalty/point accumulator plus a
/// hit count per scoring sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingScore {
    /// Owning player.
    pub player_id: PlayerId,
    /// Accumulated points (classic) or penalties (cut-throat).
    pub points: u32,
    /// Hit counts indexed by [`SCORING_SECTORS`], each capped at the
    /// configured hits-to-close.
    pub hits: [u8; 7],
}

impl ClosingScore {
    /// Zeroed score for `player_id`.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            points: 0,
            hits: [0; 7],
        }
    }

    /// Position of `sector` in the hit array, or `None` when it does not
    /// score in cricket.
    pub fn sector_index(sector: u8) -> Option<usize> {
        SCORING_SECTORS.iter().position(|&s| s == sector)
    }

    /// Hit count on a scoring sector. Panics on a non-scoring sector; the
    /// variants check membership before reading.
    pub fn hits_on(&self, sector: u8) -> u8 {
        let idx = Self::sector_index(sector)
            .unwrap_or_else(|| panic!("sector {sector} does not score in cricket"));
        self.hits[idx]
    }

    /// Copy of this score with the hit count on `sector` replaced.
    pub fn with_hits(mut self, sector: u8, hits: u8) -> Self {
        let idx = Self::sector_index(sector)
            .unwrap_or_else(|| panic!("sector {sector} does not score in cricket"));
        self.hits[idx] = hits;
        self
    }

    /// True when `sector` has reached `hits_to_close`.
    pub fn is_closed(&self, sector: u8, hits_to_close: u8) -> bool {
        self.hits_on(sector) >= hits_to_close
    }

    /// True when every scoring sector has reached `hits_to_close`.
    pub fn all_closed(&self, hits_to_close: u8) -> bool {
        self.hits.iter().all(|&h| h >= hits_to_close)
    }
}

/// Polymorphic per-player score. The shape in use must match the active
/// rule variant for every player in a match; mixing shapes is a programming
/// error, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerScore {
    /// Legs-only countdown shape.
    Countdown(CountdownScore),
    /// Sets countdown shape.
    Sets(SetsScore),
    /// Cricket-family closing shape.
    Closing(ClosingScore),
}

impl PlayerScore {
    /// Owning player id, regardless of shape.
    pub fn player_id(&self) -> PlayerId {
        match self {
            PlayerScore::Countdown(s) => s.player_id,
            PlayerScore::Sets(s) => s.player_id,
            PlayerScore::Closing(s) => s.player_id,
        }
    }

    /// Unwraps the countdown shape, panicking on mismatch.
    pub fn as_countdown(&self, context: &str) -> CountdownScore {
        match self {
            PlayerScore::Countdown(s) => *s,
            other => panic!("expected countdown score for {context}, got {other:?}"),
        }
    }

    /// Unwraps the sets shape, panicking on mismatch.
    pub fn as_sets(&self, context: &str) -> SetsScore {
        match self {
            PlayerScore::Sets(s) => *s,
            other => panic!("expected sets score for {context}, got {other:?}"),
        }
    }

    /// Unwraps the closing shape, panicking on mismatch.
    pub fn as_closing(&self, context: &str) -> ClosingScore {
        match self {
            PlayerScore::Closing(s) => *s,
            other => panic!("expected closing score for {context}, got {other:?}"),
        }
    }
}

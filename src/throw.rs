//! Validated single-dart input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sector value of the bullseye.
pub const BULL: u8 = 25;

/// Rejection raised when a dart's raw numbers cannot occur on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidHitError {
    /// Multiplier outside the single/double/triple rings.
    #[error("multiplier must be 1, 2 or 3, got {0}")]
    Multiplier(u8),
    /// Sector value that exists on no board.
    #[error("sector must be 1..=20 or 25 (bull), got {0}")]
    Sector(u8),
    /// The bull has no triple ring.
    #[error("the bull has no triple ring")]
    TripleBull,
}

/// One dart: sector value plus ring multiplier.
///
/// Constructed only through [`Throw::new`]; an invalid combination never
/// exists at rest, including after deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawThrow")]
pub struct Throw {
    sector: u8,
    multiplier: u8,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawThrow {
    sector: u8,
    multiplier: u8,
}

impl TryFrom<RawThrow> for Throw {
    type Error = InvalidHitError;

    fn try_from(raw: RawThrow) -> Result<Self, Self::Error> {
        Throw::new(raw.sector, raw.multiplier)
    }
}

impl Throw {
    /// Validates and builds a throw.
    pub fn new(sector: u8, multiplier: u8) -> Result<Self, InvalidHitError> {
        if !(1..=3).contains(&multiplier) {
            return Err(InvalidHitError::Multiplier(multiplier));
        }
        if !(1..=20).contains(&sector) && sector != BULL {
            return Err(InvalidHitError::Sector(sector));
        }
        if sector == BULL && multiplier == 3 {
            return Err(InvalidHitError::TripleBull);
        }
        Ok(Self { sector, multiplier })
    }

    /// Sector value, 1..=20 or 25.
    pub fn sector(&self) -> u8 {
        self.sector
    }

    /// Ring multiplier, 1..=3.
    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    /// Derived point value of the dart.
    pub fn points(&self) -> i32 {
        i32::from(self.sector) * i32::from(self.multiplier)
    }

    /// True when the dart landed in the double ring.
    pub fn is_double(&self) -> bool {
        self.multiplier == 2
    }
}

//! Journaled throw records and persistence wrappers.

use serde::{Deserialize, Serialize};

use crate::{
    throw::Throw,
    types::{PlayerId, ThrowSeq},
};

/// Version number for serialized [`ThrowRecordEnvelope`] payloads.
pub const RECORD_FORMAT_VERSION: u16 = 1;

/// Immutable history entry appended for every accepted throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowRecord {
    /// Monotonic sequence within the match.
    pub seq: ThrowSeq,
    /// Wall-clock timestamp in milliseconds, audit metadata only.
    pub ts_ms: u64,
    /// Player who threw the dart.
    pub player_id: PlayerId,
    /// The dart itself.
    pub throw: Throw,
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowRecordEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped record.
    pub record: ThrowRecord,
}

impl ThrowRecordEnvelope {
    /// Constructs an envelope using [`RECORD_FORMAT_VERSION`].
    pub fn new(record: ThrowRecord) -> Self {
        Self {
            format_version: RECORD_FORMAT_VERSION,
            record,
        }
    }
}

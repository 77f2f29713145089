//! Shared primitive identifiers.

/// Participant identifier. Identity management lives outside this crate;
/// the match only needs ids it can compare and hash.
pub type PlayerId = u64;

/// Monotonic throw sequence number within one match journal.
pub type ThrowSeq = u64;

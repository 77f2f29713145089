//! Runtime event stream payloads.

use crate::{
    rules::Outcome,
    types::{PlayerId, ThrowSeq},
};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// A throw was accepted and committed.
    ThrowAccepted {
        /// Player who threw.
        player_id: PlayerId,
        /// What the dart did.
        outcome: Outcome,
    },
    /// The thrower took a leg; the leg starter rotated.
    LegWon {
        /// Player who won the leg.
        player_id: PlayerId,
    },
    /// The thrower took a set; both starters rotated.
    SetWon {
        /// Player who won the set.
        player_id: PlayerId,
    },
    /// The match has a result.
    Finished {
        /// The winner, absent on a draw.
        winner: Option<PlayerId>,
    },
    /// Persistence has reached at least this throw sequence.
    DurableUpTo {
        /// Highest sequence known durable.
        seq: ThrowSeq,
    },
}

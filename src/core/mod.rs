//! Match aggregate and turn orchestration.

/// The match state machine.
pub mod game;

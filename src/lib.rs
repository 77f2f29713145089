//! Authoritative darts match scoring with append-only SQLite journaling.
//!
//! # Examples
//!
//! In-memory usage with [`core::game::DartMatch`]:
//! ```
//! use std::sync::Arc;
//!
//! use dartmatch::{
//!     core::game::DartMatch,
//!     rules::{Outcome, x01_legs::{X01Legs, X01LegsSettings}},
//!     throw::Throw,
//! };
//!
//! let settings = X01LegsSettings::new(301, 1, false, false, None).expect("settings");
//! let mut game = DartMatch::new(Arc::new(X01Legs::new(settings)), vec![1, 2]).expect("roster");
//!
//! let triple_twenty = Throw::new(20, 3).expect("valid hit");
//! let eval = game.register_throw(1, triple_twenty).expect("player 1 opens");
//! assert_eq!(eval.outcome, Outcome::Continue);
//! ```
//!
//! Runtime usage with SQLite journal:
//! ```no_run
//! use std::sync::Arc;
//!
//! use dartmatch::{
//!     core::game::DartMatch,
//!     persist::sqlite::SqliteHistorySink,
//!     rules::x01_legs::{X01Legs, X01LegsSettings},
//!     runtime::handle::{RuntimeConfig, spawn_match},
//!     throw::Throw,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sink = SqliteHistorySink::open("match.db").expect("open sqlite");
//! let settings = X01LegsSettings::default();
//! let game = DartMatch::new(Arc::new(X01Legs::new(settings)), vec![1, 2]).expect("roster");
//! let handle = spawn_match(game, Some(Box::new(sink)), RuntimeConfig::default());
//!
//! let throw = Throw::new(20, 1).expect("valid hit");
//! let _eval = handle.register_throw(1, throw).await.expect("register");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Match aggregate and turn protocol.
pub mod core;
/// Persistence abstraction and SQLite journal.
pub mod persist;
/// Journaled throw records and their storage envelope.
pub mod record;
/// Rule variants and the capability trait they implement.
pub mod rules;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Per-player score states.
pub mod score;
/// Validated dart hits.
pub mod throw;
/// Shared primitive types.
pub mod types;

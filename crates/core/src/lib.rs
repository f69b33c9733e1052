//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of a 4x4 sliding-tile merge game with
//! consumable boosters. It has no dependencies on terminal, filesystem or
//! async I/O; those are supplied by the caller through three seams:
//!
//! - [`RandomSource`]: tile spawns and shuffles (seed it for reproducible games)
//! - [`EventSink`]: receives [`GameEvent`]s for rendering, statistics or audio
//! - [`SessionStore`]: loads the last session at start-up and receives a
//!   [`SessionState`] after every committed change
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid, empty-cell queries, terminal detection, spawning
//! - [`moves`]: per-line compaction and merge for the four directions
//! - [`history`]: bounded undo log with oldest-first eviction
//! - [`boosters`]: inventory counts and the bomb targeting state machine
//! - [`session`]: [`GameSession`], which sequences all of the above
//! - [`snapshot`]: persisted session format and restore validation
//! - [`stats`]: lifetime statistics folded from events
//!
//! # Rules
//!
//! - A move slides every line towards one edge; equal neighbours merge once
//!   per move and the merged value is added to the score.
//! - After a move that changed the board one tile spawns: 2 with
//!   probability 0.9, otherwise 4.
//! - The game is over once the board is full and no two orthogonal
//!   neighbours match. A `life` booster, if held, is spent to reshuffle the
//!   board instead.
//!
//! # Example
//!
//! ```
//! use tile_merge_core::{EngineConfig, GameSession, MemoryStore, SimpleRng};
//! use tile_merge_types::Direction;
//!
//! let mut game = GameSession::new(
//!     EngineConfig::default(),
//!     SimpleRng::new(12345),
//!     Vec::new(),
//!     MemoryStore::new(),
//! );
//! assert_eq!(game.board().tile_count(), 2);
//!
//! for dir in Direction::ALL {
//!     game.apply_move(dir).unwrap();
//! }
//! assert!(game.history().len() >= 2);
//! ```

pub mod board;
pub mod boosters;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod moves;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use tile_merge_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use boosters::{BombState, BoosterInventory};
pub use config::EngineConfig;
pub use error::GameError;
pub use events::{EventSink, GameEvent, SessionSummary};
pub use history::{History, HistoryEntry};
pub use moves::{apply_move, can_move, slide_line, MoveResult};
pub use rng::{shuffle, RandRng, RandomSource, ScriptedRng, SimpleRng};
pub use session::GameSession;
pub use snapshot::{HistorySnapshot, Rejection, SessionState};
pub use stats::Statistics;
pub use store::{MemoryStore, SessionStore};

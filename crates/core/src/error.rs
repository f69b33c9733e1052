//! Engine error taxonomy.
//!
//! Every variant is a recoverable, locally reported condition. An operation
//! that returns one of these has left the session untouched.

use crate::types::BoosterKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Move or booster requested while the session is over
    #[error("session is over")]
    InvalidMove,
    /// Undo with fewer than two snapshots on the history stack
    #[error("nothing to undo")]
    InsufficientHistory,
    #[error("no {} boosters left", .0.as_str())]
    InsufficientBoosters(BoosterKind),
    /// Bomb target selected while no bomb is armed (never armed, cancelled or expired)
    #[error("no bomb is waiting for a target")]
    NoTarget,
    #[error("cell ({row}, {col}) is empty")]
    EmptyTargetCell { row: u8, col: u8 },
    #[error("cell ({row}, {col}) is off the board")]
    OutOfBounds { row: u8, col: u8 },
    /// Bombing the only tile would leave an empty, unplayable board
    #[error("cannot destroy the last tile")]
    LastTile,
    /// A tile spawn was attempted on a full board. Indicates a terminal-check bug upstream.
    #[error("no empty cell to spawn a tile")]
    BoardSpawnExhausted,
}

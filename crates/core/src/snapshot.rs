//! Persisted session snapshot.
//!
//! This is the exchange format with the persistence collaborator. It is
//! validated on the way back in: a snapshot that is over, empty, malformed or
//! already stuck is never resumed.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::boosters::BoosterInventory;
use crate::history::{History, HistoryEntry};
use crate::types::BOARD_SIZE;

pub type Grid = [[u32; BOARD_SIZE]; BOARD_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub board: Grid,
    pub score: u32,
}

impl From<&HistoryEntry> for HistorySnapshot {
    fn from(value: &HistoryEntry) -> Self {
        Self {
            board: value.board.to_rows(),
            score: value.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub board: Grid,
    pub score: u32,
    #[serde(default)]
    pub merge_count: u32,
    #[serde(default)]
    pub move_count: u32,
    #[serde(default)]
    pub highest_tile: u32,
    pub game_over: bool,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub boosters: BoosterInventory,
    /// Oldest first; the last entry mirrors `board`/`score`
    #[serde(default)]
    pub history: Vec<HistorySnapshot>,
}

/// Why a persisted snapshot was not resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    GameOver,
    EmptyBoard,
    MalformedBoard,
    NoMovesLeft,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::GameOver => "game over",
            Rejection::EmptyBoard => "empty board",
            Rejection::MalformedBoard => "malformed board",
            Rejection::NoMovesLeft => "no moves left",
        }
    }
}

impl SessionState {
    pub fn board(&self) -> Board {
        Board::from_rows(self.board)
    }

    /// Check whether this snapshot may be resumed.
    pub fn validate(&self) -> Result<(), Rejection> {
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        let board = self.board();
        if !board.is_well_formed() {
            return Err(Rejection::MalformedBoard);
        }
        if board.is_empty() {
            return Err(Rejection::EmptyBoard);
        }
        if board.is_terminal() {
            return Err(Rejection::NoMovesLeft);
        }
        Ok(())
    }

    /// Rebuild the undo history, keeping the newest `depth` entries.
    ///
    /// Falls back to a single snapshot of the live state when the persisted
    /// history is missing, malformed, or does not end at the live state.
    pub fn restore_history(&self, depth: usize) -> History {
        let mut history = History::new(depth);
        let live = self.board();

        let consistent = self
            .history
            .last()
            .map(|top| top.board == self.board && top.score == self.score)
            .unwrap_or(false)
            && self
                .history
                .iter()
                .all(|h| Board::from_rows(h.board).is_well_formed());

        if consistent {
            for h in &self.history {
                history.push(&Board::from_rows(h.board), h.score);
            }
        } else {
            history.push(&live, self.score);
        }
        history
    }
}

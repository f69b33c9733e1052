//! History stack - bounded undo log
//!
//! Holds deep copies of `(board, score)` taken after every state-changing
//! operation. The newest entry always mirrors the live state; undo drops it
//! and exposes the one below. When the bound is exceeded the OLDEST entry is
//! evicted, so at most `depth - 1` steps can ever be undone.

use std::collections::VecDeque;

use crate::board::Board;
use crate::error::GameError;
use crate::types::HISTORY_DEPTH;

/// An immutable snapshot of board and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub board: Board,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    depth: usize,
}

impl History {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            entries: VecDeque::with_capacity(depth + 1),
            depth,
        }
    }

    /// Maximum number of entries kept
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an undo would succeed
    pub fn can_undo(&self) -> bool {
        self.entries.len() >= 2
    }

    /// The entry mirroring the live state
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Record a snapshot, evicting the oldest entry past the bound.
    pub fn push(&mut self, board: &Board, score: u32) {
        self.entries.push_back(HistoryEntry {
            board: *board,
            score,
        });
        while self.entries.len() > self.depth {
            self.entries.pop_front();
        }
    }

    /// Overwrite the current entry, or record one if the log is empty.
    pub fn replace_current(&mut self, board: &Board, score: u32) {
        match self.entries.back_mut() {
            Some(top) => *top = HistoryEntry {
                board: *board,
                score,
            },
            None => self.push(board, score),
        }
    }

    /// Drop the current entry and return the one that becomes current.
    ///
    /// Needs at least two entries; otherwise nothing changes.
    pub fn undo(&mut self) -> Result<HistoryEntry, GameError> {
        if !self.can_undo() {
            return Err(GameError::InsufficientHistory);
        }
        self.entries.pop_back();
        self.entries
            .back()
            .copied()
            .ok_or(GameError::InsufficientHistory)
    }

    /// Drop everything and start again from a single snapshot
    pub fn reset(&mut self, board: &Board, score: u32) {
        self.entries.clear();
        self.push(board, score);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_DEPTH)
    }
}

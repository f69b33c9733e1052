//! Events emitted by the session for renderers, audio, statistics and persistence.
//!
//! Sinks are fire-and-forget: `emit` returns nothing and a sink must never
//! call back into the session.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{BoosterKind, Direction, MergeEvent, Position, MAX_MOVE_MERGES};

/// Final numbers of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub highest_tile: u32,
    pub won: bool,
    pub moves: u32,
    pub merges: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh board was dealt
    GameStarted,
    TileSpawned {
        pos: Position,
        value: u32,
    },
    Moved {
        direction: Direction,
        score_delta: u32,
        merges: ArrayVec<MergeEvent, MAX_MOVE_MERGES>,
        /// Cumulative score after the move
        score: u32,
    },
    /// First appearance of the winning tile this session
    Won {
        tile: u32,
    },
    GameOver,
    /// The session is finished for good (no life booster saved it)
    SessionEnded(SessionSummary),
    BoosterUsed(BoosterKind),
    BombArmed,
    BombCancelled {
        expired: bool,
    },
    /// A life booster cancelled game over and reshuffled the board
    LifeUsed,
}

pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

/// Discards everything
impl EventSink for () {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Records everything (tests, replays)
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Fans out to both sinks in order
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &GameEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &GameEvent) {
        (**self).emit(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: &GameEvent) {
        (**self).emit(event);
    }
}

//! Lifetime statistics, aggregated from session events.
//!
//! Best score and highest tile track live play; per-game counters are only
//! folded in when a session ends for good.

use serde::{Deserialize, Serialize};

use crate::events::{EventSink, GameEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub games_played: u32,
    pub wins: u32,
    pub best_score: u32,
    pub highest_tile: u32,
    pub total_score: u64,
    pub total_moves: u64,
    pub total_merges: u64,
}

impl Statistics {
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Moved { score, merges, .. } => {
                self.best_score = self.best_score.max(*score);
                if let Some(top) = merges.iter().map(|m| m.value).max() {
                    self.highest_tile = self.highest_tile.max(top);
                }
            }
            GameEvent::TileSpawned { value, .. } => {
                self.highest_tile = self.highest_tile.max(*value);
            }
            GameEvent::SessionEnded(summary) => {
                self.games_played += 1;
                if summary.won {
                    self.wins += 1;
                }
                self.best_score = self.best_score.max(summary.score);
                self.highest_tile = self.highest_tile.max(summary.highest_tile);
                self.total_score += summary.score as u64;
                self.total_moves += summary.moves as u64;
                self.total_merges += summary.merges as u64;
            }
            _ => {}
        }
    }

    /// Mean final score over finished games
    pub fn average_score(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        (self.total_score / self.games_played as u64) as u32
    }
}

impl EventSink for Statistics {
    fn emit(&mut self, event: &GameEvent) {
        self.record(event);
    }
}

//! Engine configuration.
//!
//! Defaults come from the shared constants; a handful of knobs can be
//! overridden through the environment.
//!
//! - `TILE_MERGE_HISTORY_DEPTH`: undo snapshots kept (default 10)
//! - `TILE_MERGE_WIN_TILE`: tile value that counts as a win (default 2048)
//! - `TILE_MERGE_BOMB_TIMEOUT_MS`: armed bomb timeout (default 10000)

use crate::types::{
    BOMB_TIMEOUT_MS, HISTORY_DEPTH, INITIAL_TILES, SPAWN_FOUR_PROBABILITY, WIN_TILE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub history_depth: usize,
    pub win_tile: u32,
    pub spawn_four_probability: f64,
    pub bomb_timeout_ms: u32,
    pub initial_tiles: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            win_tile: WIN_TILE,
            spawn_four_probability: SPAWN_FOUR_PROBABILITY,
            bomb_timeout_ms: BOMB_TIMEOUT_MS,
            initial_tiles: INITIAL_TILES,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let history_depth = env::var("TILE_MERGE_HISTORY_DEPTH")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.history_depth);

        let win_tile = env::var("TILE_MERGE_WIN_TILE")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|v| v.is_power_of_two() && *v >= 4)
            .unwrap_or(defaults.win_tile);

        let bomb_timeout_ms = env::var("TILE_MERGE_BOMB_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.bomb_timeout_ms);

        Self {
            history_depth,
            win_tile,
            bomb_timeout_ms,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.history_depth, 10);
        assert_eq!(c.win_tile, 2048);
        assert_eq!(c.bomb_timeout_ms, 10_000);
        assert_eq!(c.initial_tiles, 2);
        assert!((c.spawn_four_probability - 0.1).abs() < f64::EPSILON);
    }
}

//! Store configuration.

use std::path::{Path, PathBuf};

pub const DEFAULT_SAVE_DIR: &str = ".tile-merge";
pub const SESSION_FILE: &str = "session.json";
pub const STATS_FILE: &str = "stats.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read `TILE_MERGE_SAVE_DIR`, falling back to `.tile-merge`.
    pub fn from_env() -> Self {
        use std::env;

        let dir = env::var("TILE_MERGE_SAVE_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }
}

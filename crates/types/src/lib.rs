//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! They are plain data with no game logic, usable from the engine, the input
//! layer, the terminal view, and the persistence collaborator alike.
//!
//! # Board Dimensions
//!
//! The playfield is a square grid of `BOARD_SIZE` x `BOARD_SIZE` cells
//! addressed as `(row, col)`, row 0 at the top and col 0 on the left.
//!
//! # Engine Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BOARD_SIZE` | 4 | Rows and columns of the grid |
//! | `HISTORY_DEPTH` | 10 | Undo snapshots kept (oldest evicted first) |
//! | `WIN_TILE` | 2048 | First appearance fires the win event |
//! | `SPAWN_FOUR_PROBABILITY` | 0.1 | Chance a spawned tile is 4 instead of 2 |
//! | `BOMB_TIMEOUT_MS` | 10000 | Armed bomb returns to idle after this long |
//! | `INITIAL_TILES` | 2 | Tiles seeded on a new game |
//!
//! # Examples
//!
//! ```
//! use tile_merge_types::{BoosterKind, Direction, GameAction, BOARD_SIZE};
//!
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//!
//! assert_eq!(BoosterKind::from_str("bomb"), Some(BoosterKind::Bomb));
//! assert_eq!(BoosterKind::Shuffle.as_str(), "shuffle");
//!
//! assert_eq!(GameAction::from_str("undo"), Some(GameAction::Undo));
//! assert_eq!(BOARD_SIZE, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Grid side length in cells
pub const BOARD_SIZE: usize = 4;

/// Total number of cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Undo snapshots kept by the history stack
pub const HISTORY_DEPTH: usize = 10;

/// Tile value whose first appearance counts as a win
pub const WIN_TILE: u32 = 2048;

/// Probability that a spawned tile is a 4 rather than a 2
pub const SPAWN_FOUR_PROBABILITY: f64 = 0.1;

/// Time an armed bomb waits for a target before cancelling itself
pub const BOMB_TIMEOUT_MS: u32 = 10_000;

/// Number of random tiles placed on a fresh board
pub const INITIAL_TILES: usize = 2;

/// Merges a single row or column pass can produce at most
pub const MAX_LINE_MERGES: usize = BOARD_SIZE / 2;

/// Merges a whole move can produce at most
pub const MAX_MOVE_MERGES: usize = MAX_LINE_MERGES * BOARD_SIZE;


/// Movement directions
///
/// `Right` and `Down` are the mirror images of `Left` and `Up`: the engine
/// walks every line starting from the edge the tiles slide towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a stable order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Consumable power-ups
///
/// - **Undo**: roll back to the previous history snapshot
/// - **Shuffle**: redistribute every tile at random
/// - **Bomb**: destroy one selected tile
/// - **Life**: consumed automatically to survive a game over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoosterKind {
    Undo,
    Shuffle,
    Bomb,
    Life,
}

impl BoosterKind {
    pub const ALL: [BoosterKind; 4] = [
        BoosterKind::Undo,
        BoosterKind::Shuffle,
        BoosterKind::Bomb,
        BoosterKind::Life,
    ];

    /// Parse booster kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::BoosterKind;
    ///
    /// assert_eq!(BoosterKind::from_str("Undo"), Some(BoosterKind::Undo));
    /// assert_eq!(BoosterKind::from_str("lives"), Some(BoosterKind::Life));
    /// assert_eq!(BoosterKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "undo" => Some(BoosterKind::Undo),
            "shuffle" => Some(BoosterKind::Shuffle),
            "bomb" => Some(BoosterKind::Bomb),
            "life" | "lives" => Some(BoosterKind::Life),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoosterKind::Undo => "undo",
            BoosterKind::Shuffle => "shuffle",
            BoosterKind::Bomb => "bomb",
            BoosterKind::Life => "life",
        }
    }

    /// Whether the player activates this booster directly.
    ///
    /// `Life` is only ever consumed by the engine on game over.
    pub fn is_manual(&self) -> bool {
        !matches!(self, BoosterKind::Life)
    }
}

/// A grid coordinate, `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate lies on the board
    pub fn in_bounds(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Flat row-major index, if in bounds
    pub fn index(&self) -> Option<usize> {
        if self.in_bounds() {
            Some(self.row as usize * BOARD_SIZE + self.col as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Position::index`]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

/// One merge produced during a move: where the merged tile ended up and its value.
///
/// Consumed by renderers and audio for effects; the engine only reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeEvent {
    pub pos: Position,
    pub value: u32,
}

/// Requests arriving from the input surface
///
/// These are produced by key mapping (or any other front end) and handed to
/// the session controller one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Slide every tile in a direction
    Move(Direction),
    /// Use an undo booster
    Undo,
    /// Use a shuffle booster
    Shuffle,
    /// Arm a bomb booster (a target selection must follow)
    Bomb,
    /// Disarm a pending bomb without consuming it
    CancelBomb,
    /// Select the bomb target cell
    Target(Position),
    /// Abandon the current board and start over
    NewGame,
}

impl GameAction {
    /// Parse an action from its protocol string
    ///
    /// Directions parse to `Move`; targets carry coordinates and are not
    /// representable as a bare string.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Move(Direction::Left)));
    /// assert_eq!(GameAction::from_str("cancelBomb"), Some(GameAction::CancelBomb));
    /// assert_eq!(GameAction::from_str("newGame"), Some(GameAction::NewGame));
    /// assert_eq!(GameAction::from_str("life"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(dir) = Direction::from_str(s) {
            return Some(GameAction::Move(dir));
        }
        match s.to_lowercase().as_str() {
            "undo" => Some(GameAction::Undo),
            "shuffle" => Some(GameAction::Shuffle),
            "bomb" => Some(GameAction::Bomb),
            "cancelbomb" => Some(GameAction::CancelBomb),
            "newgame" | "restart" => Some(GameAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(dir) => dir.as_str(),
            GameAction::Undo => "undo",
            GameAction::Shuffle => "shuffle",
            GameAction::Bomb => "bomb",
            GameAction::CancelBomb => "cancelBomb",
            GameAction::Target(_) => "target",
            GameAction::NewGame => "newGame",
        }
    }
}

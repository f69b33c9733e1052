//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. While a bomb
//! is armed the caller routes keys through a [`TargetCursor`] instead.

pub mod cursor;
pub mod map;

pub use tile_merge_types as types;

pub use cursor::TargetCursor;
pub use map::{direction_for_key, handle_key_event, should_quit};

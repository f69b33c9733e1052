//! Terminal presentation for the tile-merge demo shell.
//!
//! [`GameView`] turns a session into plain text lines and
//! [`TerminalRenderer`] writes them to the terminal, rewriting only the lines
//! that changed. The engine itself never depends on this crate.

pub mod renderer;
pub mod view;

pub use tile_merge_core as core;
pub use tile_merge_types as types;

pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{GameView, ViewFrame};

//! Tile Merge (workspace facade crate).
//!
//! Re-exports the member crates as `tile_merge::{core, input, store, term, types}`
//! so integration tests and the binary share one import surface.

pub use tile_merge_core as core;
pub use tile_merge_input as input;
pub use tile_merge_store as store;
pub use tile_merge_term as term;
pub use tile_merge_types as types;

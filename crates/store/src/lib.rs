//! Filesystem persistence for the tile-merge engine.
//!
//! The engine hands over a snapshot after every committed change and must
//! never wait on the disk, so writes are queued to a background task running
//! on a private tokio runtime:
//!
//! - [`JsonFileStore`]: `session.json` / `stats.json` under the save directory
//! - [`ChannelSink`]: forwards [`GameEvent`](crate::core::GameEvent)s to async consumers
//! - [`StoreConfig`]: save directory, overridable with `TILE_MERGE_SAVE_DIR`

pub mod config;
pub mod file;
pub mod sink;
pub mod writer;

pub use tile_merge_core as core;
pub use tile_merge_types as types;

pub use config::StoreConfig;
pub use file::JsonFileStore;
pub use sink::ChannelSink;
pub use writer::{write_atomic, Writer, WriterRuntime};

//! JSON file persistence for the session and lifetime statistics.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::core::{GameEvent, SessionState, SessionStore, Statistics};
use crate::sink::ChannelSink;
use crate::writer::{Writer, WriterRuntime};

/// Session store backed by `session.json` in the save directory.
///
/// Loads are synchronous; saves are queued to the background writer. A load
/// first waits for queued saves so it never observes a stale file.
pub struct JsonFileStore {
    config: StoreConfig,
    runtime: WriterRuntime,
}

impl JsonFileStore {
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(config.dir())
            .with_context(|| format!("creating save dir {}", config.dir().display()))?;
        let runtime = WriterRuntime::start()?;
        debug!(dir = %config.dir().display(), "store opened");
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Wait for every queued save to reach the disk.
    pub fn flush(&self) -> bool {
        self.runtime.flush()
    }

    pub fn load_stats(&self) -> Statistics {
        self.runtime.flush();
        match read_json(&self.config.stats_path()) {
            Ok(stats) => stats.unwrap_or_default(),
            Err(err) => {
                warn!(error = %format!("{:#}", err), "ignoring unreadable stats file");
                Statistics::default()
            }
        }
    }

    pub fn save_stats(&self, stats: &Statistics) {
        queue_json(&self.runtime.writer(), &self.config.stats_path(), stats);
    }

    /// Start the statistics recorder.
    ///
    /// Returns a sink to hand to the session and a receiver that always holds
    /// the latest totals. Statistics are saved whenever a game ends.
    pub fn stats_recorder(&self) -> (ChannelSink, watch::Receiver<Statistics>) {
        let initial = self.load_stats();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (stats_tx, stats_rx) = watch::channel(initial);

        self.runtime.handle().spawn(record_stats(
            event_rx,
            stats_tx,
            self.runtime.writer(),
            self.config.stats_path(),
        ));

        (ChannelSink::new(event_tx), stats_rx)
    }
}

impl SessionStore for JsonFileStore {
    fn load_session(&mut self) -> Option<SessionState> {
        self.runtime.flush();
        match read_json(&self.config.session_path()) {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %format!("{:#}", err), "ignoring unreadable session file");
                None
            }
        }
    }

    fn save_session(&mut self, state: &SessionState) {
        queue_json(&self.runtime.writer(), &self.config.session_path(), state);
    }
}

async fn record_stats(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    stats_tx: watch::Sender<Statistics>,
    writer: Writer,
    path: std::path::PathBuf,
) {
    let mut stats = *stats_tx.borrow();
    while let Some(event) = events.recv().await {
        stats.record(&event);
        if matches!(event, GameEvent::SessionEnded(_)) {
            queue_json(&writer, &path, &stats);
        }
        stats_tx.send_replace(stats);
    }
    // Sink dropped: keep live best score / highest tile too.
    queue_json(&writer, &path, &stats);
}

fn queue_json<T: Serialize>(writer: &Writer, path: &Path, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => writer.write(path.to_path_buf(), json),
        Err(err) => warn!(path = %path.display(), error = %err, "serialize failed"),
    }
}

/// `Ok(None)` when the file does not exist yet.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
    };
    let value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(value))
}

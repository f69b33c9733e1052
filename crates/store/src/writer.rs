//! Background file writer.
//!
//! Bridges the synchronous game loop with async file I/O: callers hand over
//! finished JSON documents and return immediately, a task on a private tokio
//! runtime writes them out. Queued writes to the same path are coalesced so
//! only the newest document hits the disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug)]
enum WriteRequest {
    Write { path: PathBuf, contents: String },
    Flush(oneshot::Sender<()>),
}

/// Cheap handle for queueing writes.
#[derive(Debug, Clone)]
pub struct Writer {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl Writer {
    /// Queue `contents` for `path`. Never blocks.
    pub fn write(&self, path: PathBuf, contents: String) {
        if self
            .tx
            .send(WriteRequest::Write { path, contents })
            .is_err()
        {
            warn!("store writer has stopped, dropping write");
        }
    }
}

/// Owns the runtime the writer task runs on.
///
/// Pending writes are flushed on drop. Do not drop it from inside another
/// tokio runtime.
pub struct WriterRuntime {
    rt: Runtime,
    writer: Writer,
}

impl WriterRuntime {
    pub fn start() -> Result<Self> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tile-merge-store")
            .enable_all()
            .build()
            .context("failed to create store runtime")?;

        let (tx, rx) = mpsc::unbounded_channel::<WriteRequest>();
        rt.spawn(run_writer(rx));

        Ok(Self {
            rt,
            writer: Writer { tx },
        })
    }

    pub fn writer(&self) -> Writer {
        self.writer.clone()
    }

    pub fn handle(&self) -> &tokio::runtime::Handle {
        self.rt.handle()
    }

    /// Block until every write queued so far is on disk.
    pub fn flush(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if self.writer.tx.send(WriteRequest::Flush(done_tx)).is_err() {
            return false;
        }
        self.rt.block_on(done_rx).is_ok()
    }
}

impl Drop for WriterRuntime {
    fn drop(&mut self) {
        self.flush();
    }
}

async fn run_writer(mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    let mut pending: Vec<(PathBuf, String)> = Vec::new();

    while let Some(request) = rx.recv().await {
        let mut flushes = Vec::new();
        queue(&mut pending, &mut flushes, request);
        while let Ok(request) = rx.try_recv() {
            queue(&mut pending, &mut flushes, request);
        }

        for (path, contents) in pending.drain(..) {
            if let Err(err) = write_atomic(&path, &contents).await {
                warn!(path = %path.display(), error = %format!("{:#}", err), "save failed");
            }
        }
        for done in flushes {
            let _ = done.send(());
        }
    }
    debug!("store writer stopped");
}

fn queue(
    pending: &mut Vec<(PathBuf, String)>,
    flushes: &mut Vec<oneshot::Sender<()>>,
    request: WriteRequest,
) {
    match request {
        WriteRequest::Write { path, contents } => {
            match pending.iter_mut().find(|(p, _)| *p == path) {
                Some(slot) => slot.1 = contents,
                None => pending.push((path, contents)),
            }
        }
        WriteRequest::Flush(done) => flushes.push(done),
    }
}

/// Write through a temporary file so a crash never leaves a torn document.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_land_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");

        let runtime = WriterRuntime::start().unwrap();
        runtime.writer().write(path.clone(), "{\"a\":1}".to_string());
        assert!(runtime.flush());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let runtime = WriterRuntime::start().unwrap();
        let writer = runtime.writer();
        for i in 0..20 {
            writer.write(path.clone(), i.to_string());
        }
        assert!(runtime.flush());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "19");
    }

    #[test]
    fn test_coalescing_keeps_distinct_paths() {
        let mut pending = Vec::new();
        let mut flushes = Vec::new();
        for (name, body) in [("a", "1"), ("b", "2"), ("a", "3")] {
            queue(
                &mut pending,
                &mut flushes,
                WriteRequest::Write {
                    path: PathBuf::from(name),
                    contents: body.to_string(),
                },
            );
        }
        assert_eq!(
            pending,
            vec![
                (PathBuf::from("a"), "3".to_string()),
                (PathBuf::from("b"), "2".to_string()),
            ]
        );
    }
}

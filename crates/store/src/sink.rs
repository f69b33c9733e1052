//! Event sink forwarding into a tokio channel.

use tokio::sync::mpsc;

use crate::core::{EventSink, GameEvent};

/// Forwards every event to an async consumer.
///
/// Sending never blocks. Events emitted after the receiver is gone are dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: &GameEvent) {
        let _ = self.tx.send(event.clone());
    }
}

//! View event model and the fire-and-forget queue that carries it.

use tokio::sync::mpsc;
use tracing::warn;

/// A matched resolution whose link should have its view counter bumped.
///
/// Created by [`crate::application::services::KeywordResolver`] once a stage
/// has matched, and processed by [`crate::domain::view_worker::run_view_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    pub link_id: i64,
    pub keyword: String,
}

impl ViewEvent {
    pub fn new(link_id: i64, keyword: impl Into<String>) -> Self {
        Self {
            link_id,
            keyword: keyword.into(),
        }
    }
}

/// Producer side of the view queue.
///
/// Scheduling never waits: when the queue is full or the worker is gone the
/// event is dropped and counted, and the caller carries on.
#[derive(Debug, Clone)]
pub struct ViewQueue {
    sender: mpsc::Sender<ViewEvent>,
}

impl ViewQueue {
    pub fn new(sender: mpsc::Sender<ViewEvent>) -> Self {
        Self { sender }
    }

    /// Creates a bounded queue, returning the producer and the receiver for the worker.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<ViewEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Schedules a view increment without blocking.
    ///
    /// Returns `false` when the event had to be dropped.
    pub fn schedule(&self, event: ViewEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(ev)) => {
                warn!(link_id = ev.link_id, keyword = %ev.keyword, "View queue full, dropping event");
                metrics::counter!("golinks_view_events_dropped_total", "reason" => "full")
                    .increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(ev)) => {
                warn!(link_id = ev.link_id, keyword = %ev.keyword, "View queue closed, dropping event");
                metrics::counter!("golinks_view_events_dropped_total", "reason" => "closed")
                    .increment(1);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

//! Best-effort "currently visiting" notifications
//!
//! The publisher holds at most one observer. Connecting replaces the previous
//! observer (whose receiver then sees the channel close); disconnecting or
//! dropping the receiver clears it. Publishing never blocks and never fails:
//! with no observer, a full channel, or a closed channel the event is dropped.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Notification sent when a page visit starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "currentUrl")]
    pub current_url: String,
}

impl ProgressEvent {
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            current_url: current_url.into(),
        }
    }
}

/// Single-observer progress channel
///
/// Cloning shares the observer slot, so the side that accepts connections and
/// the coordinator that publishes can hold separate handles.
#[derive(Debug, Clone)]
pub struct ProgressPublisher {
    observer: Arc<Mutex<Option<mpsc::Sender<ProgressEvent>>>>,
    capacity: usize,
}

impl ProgressPublisher {
    /// Creates a publisher whose observer channel holds `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            observer: Arc::new(Mutex::new(None)),
            capacity: capacity.max(1),
        }
    }

    /// Connects a new observer, replacing any existing one
    pub fn connect(&self) -> mpsc::Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);
        if self.slot().replace(tx).is_some() {
            tracing::debug!("Progress observer replaced by a new connection");
        }
        rx
    }

    /// Drops the current observer, if any
    pub fn disconnect(&self) {
        if self.slot().take().is_some() {
            tracing::debug!("Progress observer disconnected");
        }
    }

    /// Returns true if an observer is connected and still listening
    pub fn is_connected(&self) -> bool {
        let mut slot = self.slot();
        let closed = match slot.as_ref() {
            Some(tx) => tx.is_closed(),
            None => return false,
        };
        if closed {
            *slot = None;
        }
        !closed
    }

    /// Attempts to deliver a "currently visiting" event
    pub fn publish(&self, current_url: &str) {
        let mut slot = self.slot();
        let Some(tx) = slot.as_ref() else {
            return;
        };

        match tx.try_send(ProgressEvent::new(current_url)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!("Progress observer lagging, dropped {}", event.current_url);
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Progress observer went away");
                *slot = None;
            }
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<mpsc::Sender<ProgressEvent>>> {
        self.observer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ProgressPublisher {
    fn default() -> Self {
        Self::new(16)
    }
}

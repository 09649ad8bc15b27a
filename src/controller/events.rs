//! Controller event bus
//!
//! Uses a tokio broadcast channel so the UI shell (toasts, skeletons,
//! empty states) can observe the controller without being polled.

use tokio::sync::broadcast;
use tracing::{debug, warn};

const DEFAULT_CAPACITY: usize = 64;

/// Something the UI shell may want to react to.
#[derive(Debug, Clone)]
pub enum ListEvent {
    /// A page was fetched and applied.
    Loaded {
        page: u32,
        appended: usize,
        total: u64,
        exhausted: bool,
    },
    /// The accumulated list was reset (committed search or refresh).
    Reset { query: String },
    /// A fetch failed; the accumulated list is unchanged. Transient and
    /// recoverable by re-triggering.
    Error { message: String },
}

#[derive(Clone)]
pub struct ListEvents {
    sender: broadcast::Sender<ListEvent>,
}

impl ListEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: ListEvent) {
        if self.sender.send(event).is_err() {
            // No subscribers attached; normal when no UI is listening.
            debug!("list event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> ListEventSubscriber {
        ListEventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ListEvents {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ListEventSubscriber {
    receiver: broadcast::Receiver<ListEvent>,
}

impl ListEventSubscriber {
    /// Receive the next event; `None` once the controller is gone.
    pub async fn recv(&mut self) -> Option<ListEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "list event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

//! Channel primitives used by the repositories.
//!
//! Two delivery behaviors are needed:
//!
//! - [`ReplayChannel`]: every new subscriber immediately sees the latest
//!   value (items, loading flags). Backed by `tokio::sync::watch`.
//! - [`EventChannel`]: values go only to subscribers present at emit time
//!   (errors). Backed by `tokio::sync::broadcast`.

use tokio::sync::{broadcast, watch};

/// A channel that retains its latest value and replays it to every new
/// subscriber.
pub struct ReplayChannel<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone + Send + Sync + 'static> ReplayChannel<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Publishes a new value, replacing the retained one.
    pub fn emit(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Snapshot of the current value.
    pub fn latest(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Subscribes; the receiver starts with the current value marked as
    /// seen-changed, so the first `changed().await` resolves immediately
    /// after any emit, and `borrow()` always has a value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

/// A channel that delivers values only to currently attached subscribers.
///
/// Emitting with no subscribers simply drops the value; errors must not pile
/// up for listeners that attach later.
pub struct EventChannel<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> EventChannel<T> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn emit(&self, value: T) {
        // An error here only means nobody is listening right now.
        let _ = self.sender.send(value);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }
}

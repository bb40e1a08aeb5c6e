//! Whole-collection caching repository.
//!
//! Holds the last successfully fetched collection and republishes it to
//! every subscriber. A failed refresh never clears cached items: the error
//! goes to the error channel and the stale data stays visible.

use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use photoloft_core::errors::ApiError;

use crate::channels::{EventChannel, ReplayChannel};
use crate::freshness::FreshnessPolicy;

/// Fetches the full collection from the backing service.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn get_collection(&self) -> Result<Vec<Self::Item>, ApiError>;
}

#[derive(Default)]
struct Flags {
    is_loading: bool,
    is_never_updated: bool,
    fresh_at: Option<Instant>,
}

/// A cached collection with freshness tracking.
///
/// State is exposed three ways: replaying items and loading channels for
/// subscribers, a fire-once error channel, and synchronous accessors for
/// the current snapshot.
pub struct CollectionRepository<S: CollectionSource> {
    source: S,
    policy: FreshnessPolicy,
    items: ReplayChannel<Vec<S::Item>>,
    loading: ReplayChannel<bool>,
    errors: EventChannel<ApiError>,
    flags: Mutex<Flags>,
    // Serializes updates so concurrent callers produce one fetch each, in
    // order, never interleaved.
    update_lock: tokio::sync::Mutex<()>,
}

impl<S: CollectionSource> CollectionRepository<S> {
    pub fn new(source: S, policy: FreshnessPolicy) -> Self {
        Self {
            source,
            policy,
            items: ReplayChannel::new(Vec::new()),
            loading: ReplayChannel::new(false),
            errors: EventChannel::new(16),
            flags: Mutex::new(Flags {
                is_loading: false,
                is_never_updated: true,
                fresh_at: None,
            }),
            update_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Fetches the collection and replaces the cached items.
    ///
    /// On failure the cached items are kept, the repository stops being
    /// fresh and the error is both returned and emitted on the error
    /// channel.
    pub async fn update(&self) -> Result<(), ApiError> {
        let _guard = self.update_lock.lock().await;
        self.run_update().await
    }

    // Caller must hold `update_lock`.
    async fn run_update(&self) -> Result<(), ApiError> {
        self.set_loading(true);

        let result = self.source.get_collection().await;
        {
            let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
            flags.is_never_updated = false;
            match &result {
                Ok(items) => {
                    flags.fresh_at = Some(Instant::now());
                    debug!(items = items.len(), "collection updated");
                }
                Err(e) => {
                    flags.fresh_at = None;
                    warn!(error = %e, "collection update failed, keeping cached items");
                }
            }
        }
        match result {
            Ok(items) => {
                self.items.emit(items);
                self.set_loading(false);
                Ok(())
            }
            Err(e) => {
                self.errors.emit(e.clone());
                self.set_loading(false);
                Err(e)
            }
        }
    }

    /// Updates only when the cached data is no longer fresh.
    ///
    /// Freshness is re-checked after waiting for any in-flight update, so a
    /// burst of callers results in a single fetch.
    pub async fn update_if_not_fresh(&self) -> Result<(), ApiError> {
        if self.is_fresh() {
            return Ok(());
        }
        let _guard = self.update_lock.lock().await;
        if self.is_fresh() {
            return Ok(());
        }
        self.run_update().await
    }

    /// Updates only when at least one update (successful or not) already
    /// ran; a repository nobody ever loaded stays untouched.
    pub async fn update_if_ever_updated(&self) -> Result<(), ApiError> {
        if self.is_never_updated() {
            return Ok(());
        }
        self.update().await
    }

    /// Marks the cached data as stale without touching it.
    pub fn invalidate(&self) {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fresh_at = None;
    }

    /// Snapshot of the cached items.
    pub fn items_list(&self) -> Vec<S::Item> {
        self.items.latest()
    }

    pub fn subscribe_items(&self) -> watch::Receiver<Vec<S::Item>> {
        self.items.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<ApiError> {
        self.errors.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_loading
    }

    /// Whether the cached data is current according to the freshness policy.
    pub fn is_fresh(&self) -> bool {
        let fresh_at = self
            .flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fresh_at;
        self.policy.is_fresh(fresh_at)
    }

    /// True until the first update attempt finishes, success or failure.
    pub fn is_never_updated(&self) -> bool {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_never_updated
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn set_loading(&self, loading: bool) {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_loading = loading;
        self.loading.emit(loading);
    }
}

//! Incrementally loaded paged repository.
//!
//! Unlike [`CollectionRepository`](crate::repository::CollectionRepository),
//! which always holds the whole collection, this repository grows its cached
//! list one page at a time as the UI scrolls.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use photoloft_core::domain::{DataPage, PagingOrder};
use photoloft_core::errors::ApiError;

use crate::channels::{EventChannel, ReplayChannel};
use crate::freshness::FreshnessPolicy;

/// Fetches one page from the backing service.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Clone + Eq + Hash + Send + Sync + 'static;

    async fn get_page(
        &self,
        limit: u32,
        cursor: Option<String>,
        order: PagingOrder,
    ) -> Result<DataPage<Self::Item>, ApiError>;
}

#[derive(Default)]
struct Flags {
    is_loading: bool,
    is_never_updated: bool,
    fresh_at: Option<Instant>,
}

struct Paging<T> {
    next_cursor: Option<String>,
    no_more_items: bool,
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            next_cursor: None,
            no_more_items: false,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

/// A paged cache over a [`PageSource`].
///
/// Freshness is direction-aware: with descending order the first page holds
/// the newest items, so loading it makes the data fresh; with ascending
/// order only reaching the last page does.
pub struct PagedDataRepository<S: PageSource> {
    source: S,
    order: PagingOrder,
    page_limit: u32,
    policy: FreshnessPolicy,
    items: ReplayChannel<Vec<S::Item>>,
    loading: ReplayChannel<bool>,
    errors: EventChannel<ApiError>,
    flags: Mutex<Flags>,
    paging: Mutex<Paging<S::Item>>,
    update_lock: tokio::sync::Mutex<()>,
}

impl<S: PageSource> PagedDataRepository<S> {
    pub fn new(source: S, order: PagingOrder, page_limit: u32, policy: FreshnessPolicy) -> Self {
        Self {
            source,
            order,
            page_limit,
            policy,
            items: ReplayChannel::new(Vec::new()),
            loading: ReplayChannel::new(false),
            errors: EventChannel::new(16),
            flags: Mutex::new(Flags {
                is_loading: false,
                is_never_updated: true,
                fresh_at: None,
            }),
            paging: Mutex::new(Paging::default()),
            update_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Loads the next page and appends it to the cached list.
    ///
    /// Returns `Ok(false)` without fetching when a load is already running
    /// or the source reported no further pages.
    pub async fn load_more(&self) -> Result<bool, ApiError> {
        if self.is_loading() {
            return Ok(false);
        }
        let _guard = self.update_lock.lock().await;
        // Another caller may have finished the collection while we waited.
        if self.no_more_items() {
            return Ok(false);
        }
        self.load_next_page().await
    }

    /// Restarts pagination from the beginning, replacing the cached items
    /// with the fresh first page.
    pub async fn update(&self) -> Result<(), ApiError> {
        let _guard = self.update_lock.lock().await;
        self.run_update().await
    }

    /// Updates only when the cached data is no longer fresh.
    ///
    /// Freshness is re-checked after waiting for any in-flight load, so a
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

    // Caller must hold `update_lock`.
    async fn run_update(&self) -> Result<(), ApiError> {
        *self.paging.lock().unwrap_or_else(|e| e.into_inner()) = Paging::default();
        self.load_next_page().await.map(|_| ())
    }

    /// Updates only when at least one load already ran.
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

    pub fn is_fresh(&self) -> bool {
        let fresh_at = self
            .flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fresh_at;
        self.policy.is_fresh(fresh_at)
    }

    pub fn is_never_updated(&self) -> bool {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_never_updated
    }

    /// Whether the source reported the end of the collection.
    pub fn no_more_items(&self) -> bool {
        self.paging
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .no_more_items
    }

    pub fn order(&self) -> PagingOrder {
        self.order
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // Caller must hold `update_lock`.
    async fn load_next_page(&self) -> Result<bool, ApiError> {
        let (cursor, first_page) = {
            let paging = self.paging.lock().unwrap_or_else(|e| e.into_inner());
            (paging.next_cursor.clone(), paging.next_cursor.is_none())
        };

        self.set_loading(true);
        let result = self
            .source
            .get_page(self.page_limit, cursor, self.order)
            .await;

        {
            let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
            flags.is_never_updated = false;
        }

        match result {
            Ok(page) => {
                let snapshot = {
                    let mut paging = self.paging.lock().unwrap_or_else(|e| e.into_inner());
                    for item in page.items {
                        if paging.seen.insert(item.clone()) {
                            paging.items.push(item);
                        }
                    }
                    paging.no_more_items = page.is_last;
                    paging.next_cursor = page.next_cursor;
                    paging.items.clone()
                };

                // Newest-first data is current once the first page is in;
                // oldest-first data only once the collection is complete.
                let covers_newest = match self.order {
                    PagingOrder::Desc => first_page,
                    PagingOrder::Asc => page.is_last,
                };
                if covers_newest {
                    self.flags
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .fresh_at = Some(Instant::now());
                }

                debug!(items = snapshot.len(), "page appended");
                self.items.emit(snapshot);
                self.set_loading(false);
                Ok(true)
            }
            Err(e) => {
                self.flags
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .fresh_at = None;
                warn!(error = %e, "page load failed, keeping cached items");
                self.errors.emit(e.clone());
                self.set_loading(false);
                Err(e)
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        self.flags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_loading = loading;
        self.loading.emit(loading);
    }
}

//! Drains a cursor-paged source into a single list.

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

use tracing::debug;

use photoloft_core::domain::DataPage;
use photoloft_core::errors::ApiError;

/// Fetches pages one after another until the source reports the last one,
/// concatenating the items in page order.
///
/// By default items are deduplicated by equality while preserving first
/// occurrence order; servers occasionally repeat an item on a page boundary
/// when the collection shifts mid-pagination.
pub struct PagedCollectionLoader<F> {
    fetch: F,
    start_cursor: Option<String>,
    distinct: bool,
}

impl<F> PagedCollectionLoader<F> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            start_cursor: None,
            distinct: true,
        }
    }

    /// Starts pagination at `cursor` instead of the beginning.
    pub fn with_start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    /// Disables deduplication.
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Loads every remaining page. Any page failure aborts the whole load.
    pub async fn load_all<T, Fut>(self) -> Result<Vec<T>, ApiError>
    where
        T: Clone + Eq + Hash,
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<DataPage<T>, ApiError>>,
    {
        let mut items: Vec<T> = Vec::new();
        let mut seen: Option<HashSet<T>> = self.distinct.then(HashSet::new);
        let mut cursor = self.start_cursor;
        let mut pages = 0usize;

        loop {
            let page = (self.fetch)(cursor.clone()).await?;
            pages += 1;

            for item in page.items {
                match seen.as_mut() {
                    Some(seen) => {
                        if seen.insert(item.clone()) {
                            items.push(item);
                        }
                    }
                    None => items.push(item),
                }
            }

            if page.is_last {
                break;
            }
            cursor = match page.next_cursor {
                Some(next) => Some(next),
                None => {
                    return Err(ApiError::invariant(
                        "page reported more items but carried no cursor",
                    ))
                }
            };
        }

        debug!(pages, items = items.len(), "collection fully loaded");
        Ok(items)
    }
}

//! Pagination primitives shared by services, the paged loader and the
//! repositories.

use serde::{Deserialize, Serialize};

/// One page of a remote collection.
///
/// Works with both cursor and page-number pagination; the cursor is opaque to
/// everything except the page provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPage<T> {
    /// Items of this page, in server order.
    pub items: Vec<T>,
    /// Cursor for the next page, if the provider has one.
    pub next_cursor: Option<String>,
    /// True when no further pages should be requested, regardless of
    /// `next_cursor`.
    pub is_last: bool,
}

impl<T> DataPage<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>, is_last: bool) -> Self {
        Self {
            items,
            next_cursor,
            is_last,
        }
    }

    /// An empty terminal page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            is_last: true,
        }
    }
}

/// Direction in which pages are requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingOrder {
    /// Oldest items first.
    Asc,
    /// Newest items first.
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_is_last() {
        let page: DataPage<u32> = DataPage::empty();
        assert!(page.items.is_empty());
        assert!(page.is_last);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_is_last_wins_over_cursor() {
        // A provider may return a cursor on the last page; is_last is the
        // only signal that matters.
        let page = DataPage::new(vec![1, 2], Some("40".to_string()), true);
        assert!(page.is_last);
        assert!(page.next_cursor.is_some());
    }
}

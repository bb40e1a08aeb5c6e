//! Sort orders understood by the collection endpoints.

use photoloft_core::domain::PagingOrder;

/// Server-side sort order, as sent in the `order` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOrder {
    Newest,
    Oldest,
    Favorites,
}

impl ApiOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiOrder::Newest => "newest",
            ApiOrder::Oldest => "oldest",
            ApiOrder::Favorites => "favorites",
        }
    }
}

impl From<PagingOrder> for ApiOrder {
    fn from(order: PagingOrder) -> Self {
        match order {
            PagingOrder::Desc => ApiOrder::Newest,
            PagingOrder::Asc => ApiOrder::Oldest,
        }
    }
}

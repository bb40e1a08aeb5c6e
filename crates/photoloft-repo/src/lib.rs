//! Photoloft repositories - cached collections over the API
//!
//! Repositories sit between the UI and the typed API services. They cache
//! the last fetched items, expose them through replaying channels, track
//! freshness and loading state, and report fetch errors on a separate
//! fire-once channel so stale-but-usable data stays visible.
//!
//! ## Key Components
//!
//! - [`channels`] - the replay and event channel primitives
//! - [`loader::PagedCollectionLoader`] - drains a cursor-paged source into
//!   one deduplicated list
//! - [`repository::CollectionRepository`] - whole-collection caching with
//!   freshness, loading and error channels
//! - [`paged::PagedDataRepository`] - incremental page-by-page loading
//! - [`albums`] / [`photos`] - concrete repositories over the API services

pub mod albums;
pub mod channels;
pub mod freshness;
pub mod loader;
pub mod paged;
pub mod photos;
pub mod repository;

pub use freshness::FreshnessPolicy;
pub use repository::{CollectionRepository, CollectionSource};

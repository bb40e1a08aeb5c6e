//! Object persistence port (driven/secondary port)
//!
//! A minimal key-value-style contract for persisting a single object, used
//! for the stored session and the stored credentials. Adapters live in
//! `photoloft-store`.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (file, keyring, ...) and don't need domain-level classification.
//! - Methods are synchronous: implementations are expected to be fast local
//!   stores, and the session renewal path reads credentials from whichever
//!   worker thread happens to be renewing.

/// Persistence for a single object of type `T`.
pub trait ObjectPersistence<T>: Send + Sync {
    /// Returns true if an item is stored.
    fn has_item(&self) -> bool;

    /// Loads the stored item, or `None` if nothing is stored or the stored
    /// data cannot be read back.
    fn load_item(&self) -> anyhow::Result<Option<T>>;

    /// Stores the item, replacing any previous one.
    fn save_item(&self, item: &T) -> anyhow::Result<()>;

    /// Removes the stored item, if any.
    fn clear(&self) -> anyhow::Result<()>;
}

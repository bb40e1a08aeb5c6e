//! Port traits implemented by adapter crates.

pub mod persistence;

pub use persistence::ObjectPersistence;

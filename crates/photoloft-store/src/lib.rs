//! Photoloft persistence adapters
//!
//! Implementations of the `ObjectPersistence` port from `photoloft-core`:
//!
//! - [`MemoryPersistence`] - in-process only, mainly for tests
//! - [`JsonFilePersistence`] - a JSON file on disk, for sessions and other
//!   non-secret state
//! - [`KeyringPersistence`] - the OS secret service, for credentials

pub mod file;
pub mod keyring;
pub mod memory;

pub use file::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use self::keyring::KeyringPersistence;

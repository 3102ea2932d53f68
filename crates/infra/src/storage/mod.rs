//! Key-value store backends
//!
//! Implementations of [`vioshop_core::KeyValueStore`] backed by a local JSON
//! file or the OS keychain. [`open_store`] picks one from [`StorageConfig`].

pub mod file;
pub mod keychain;

use std::sync::Arc;

pub use file::FileStore;
pub use keychain::KeychainStore;
use vioshop_core::{InMemoryStore, KeyValueStore};
use vioshop_domain::{StorageBackend, StorageConfig};

/// Build the store selected by `config`.
pub fn open_store(config: &StorageConfig) -> Arc<dyn KeyValueStore> {
    tracing::debug!(backend = %config.backend, "opening key-value store");
    match config.backend {
        StorageBackend::File => Arc::new(FileStore::new(&config.path)),
        StorageBackend::Keychain => Arc::new(KeychainStore::new()),
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
    }
}

//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use tempfile::TempDir;
use vioshop_core::{CredentialStore, KeyValueStore};
use vioshop_domain::{Credentials, Region};
use vioshop_infra::http::HttpClient;
use vioshop_infra::storage::FileStore;

pub const APP_KEY: &str = "app-key";
pub const APP_SECRET: &str = "app-secret";

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer once per binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("vioshop_infra=debug,vioshop_core=debug")
            .with_test_writer()
            .try_init();
    });
}

/// HTTP client with short timeouts and no retry delay to speak of.
pub fn http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(2)
        .base_backoff(Duration::from_millis(5))
        .build()
        .expect("http client should build")
}

/// JSON file store in a temp directory that lives as long as the fixture.
pub struct TempFileStore {
    pub store: Arc<FileStore>,
    dir: TempDir,
}

impl TempFileStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = Arc::new(FileStore::new(dir.path().join("store.json")));
        Self { store, dir }
    }

    /// A second handle onto the same file, as after an app restart.
    pub fn reopen(&self) -> Arc<FileStore> {
        Arc::new(FileStore::new(self.dir.path().join("store.json")))
    }

    pub fn as_kv(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }
}

impl Default for TempFileStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_credentials() -> Credentials {
    Credentials {
        app_key: APP_KEY.into(),
        app_secret: APP_SECRET.into(),
        region: Region::BR,
        ..Credentials::default()
    }
}

pub fn credential_store(store: Arc<dyn KeyValueStore>) -> Arc<CredentialStore> {
    Arc::new(CredentialStore::new(store, default_credentials()))
}

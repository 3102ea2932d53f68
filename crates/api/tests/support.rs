//! Shared fixtures for command integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use vioshop_core::CredentialProvider;
use vioshop_domain::{
    AppConfig, MediaConfig, PartnerConfig, Price, Product, StorageBackend, StorageConfig,
};
use vioshop_infra::credentials::StaticKeyProvider;
use vioshop_infra::storage::FileStore;
use vioshop_lib::AppContext;
use wiremock::MockServer;

pub const APP_KEY: &str = "app-key";
pub const APP_SECRET: &str = "app-secret";
pub const MEDIA_KEY: &str = "media-key";

/// Context wired against `server` for both APIs, with its store in a temp
/// directory.
pub struct TestContext {
    pub ctx: AppContext,
    pub dir: TempDir,
}

pub fn test_config(server: &MockServer, dir: &TempDir) -> AppConfig {
    AppConfig {
        partner: PartnerConfig {
            app_key: APP_KEY.into(),
            app_secret: APP_SECRET.into(),
            open_api_base_url: server.uri(),
            auth_base_url: server.uri(),
            timeout_secs: 5,
            ..PartnerConfig::default()
        },
        media: MediaConfig {
            api_key: Some(MEDIA_KEY.into()),
            api_base_url: server.uri(),
            video_model: "veo-test".into(),
            text_model: "text-test".into(),
            poll_interval_secs: 0,
            max_polls: 3,
            timeout_secs: 5,
            ..MediaConfig::default()
        },
        storage: StorageConfig {
            backend: StorageBackend::File,
            path: dir.path().join("store.json").to_string_lossy().to_string(),
        },
    }
}

pub async fn create_test_context(server: &MockServer) -> TestContext {
    let dir = TempDir::new().expect("failed to create temporary test directory");
    let config = test_config(server, &dir);
    let ctx = AppContext::from_config(config).await.expect("context should build");
    TestContext { ctx, dir }
}

/// Same config, explicit store and key provider.
pub async fn create_context_with_keys(
    server: &MockServer,
    keys: Arc<dyn CredentialProvider>,
) -> TestContext {
    let dir = TempDir::new().expect("failed to create temporary test directory");
    let config = test_config(server, &dir);
    let store = Arc::new(FileStore::new(dir.path().join("store.json")));
    let ctx = AppContext::with_parts(config, store, keys).await.expect("context should build");
    TestContext { ctx, dir }
}

pub fn static_keys(key: Option<&str>) -> Arc<dyn CredentialProvider> {
    Arc::new(StaticKeyProvider::new(key.map(str::to_string)))
}

pub fn product(id: &str) -> Product {
    Product {
        id: id.into(),
        title: format!("Product {id}"),
        image_url: String::new(),
        price: Price { amount: "19.90".into(), currency: "BRL".into() },
        commission_rate: 20.0,
        total_sales: 0,
        source_url: format!("https://shop.tiktok.com/view/product/{id}"),
    }
}

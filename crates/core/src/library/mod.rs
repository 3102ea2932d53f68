//! Saved products and video history
//!
//! Both lists are stored newest-first as JSON arrays in the key-value store.
//! An unreadable list is treated as empty rather than failing the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::warn;
use vioshop_domain::constants::{SAVED_PRODUCTS_KEY, VIDEO_HISTORY_KEY};
use vioshop_domain::{Product, Result, VideoProject, VioShopError};

use crate::storage::KeyValueStore;

pub struct Library {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl Library {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    pub async fn saved_products(&self) -> Vec<Product> {
        self.read_list(SAVED_PRODUCTS_KEY).await
    }

    /// Prepend `product` unless a product with the same id is already saved.
    pub async fn save_product(&self, product: Product) -> Result<Vec<Product>> {
        let _guard = self.write_lock.lock().await;
        let mut products: Vec<Product> = self.read_list(SAVED_PRODUCTS_KEY).await;
        if products.iter().any(|p| p.id == product.id) {
            return Ok(products);
        }
        products.insert(0, product);
        self.write_list(SAVED_PRODUCTS_KEY, &products).await?;
        Ok(products)
    }

    pub async fn remove_product(&self, product_id: &str) -> Result<Vec<Product>> {
        let _guard = self.write_lock.lock().await;
        let mut products: Vec<Product> = self.read_list(SAVED_PRODUCTS_KEY).await;
        let before = products.len();
        products.retain(|p| p.id != product_id);
        if products.len() != before {
            self.write_list(SAVED_PRODUCTS_KEY, &products).await?;
        }
        Ok(products)
    }

    pub async fn video_history(&self) -> Vec<VideoProject> {
        self.read_list(VIDEO_HISTORY_KEY).await
    }

    pub async fn save_video(&self, video: VideoProject) -> Result<Vec<VideoProject>> {
        let _guard = self.write_lock.lock().await;
        let mut history: Vec<VideoProject> = self.read_list(VIDEO_HISTORY_KEY).await;
        history.insert(0, video);
        self.write_list(VIDEO_HISTORY_KEY, &history).await?;
        Ok(history)
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "failed to read library list");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(key, error = %err, "library list is corrupted, treating as empty");
            Vec::new()
        })
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| VioShopError::Internal(format!("failed to encode {key}: {e}")))?;
        self.store.set(key, &json).await
    }
}

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use vioshop_domain::constants::API_CONFIG_KEY;
use vioshop_domain::{
    Credentials, CredentialsPatch, ResolvedCredentials, Result, TokenGrant, VioShopError,
};

use crate::storage::KeyValueStore;

/// Persisted partner credentials with default fallback.
///
/// The whole record lives under one key, so every write is a single `set`.
/// Writers are serialized so a read-merge-write never interleaves with
/// another writer in the same process.
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    defaults: Credentials,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, defaults: Credentials) -> Self {
        Self { store, defaults, write_lock: Mutex::new(()) }
    }

    pub fn defaults(&self) -> &Credentials {
        &self.defaults
    }

    /// Resolve the effective credentials.
    ///
    /// Never fails: a missing, unreadable, corrupted or incomplete record
    /// degrades to the defaults with `is_using_defaults = true`.
    pub async fn resolve(&self) -> ResolvedCredentials {
        match self.load_merged().await {
            Some(credentials) if credentials.is_complete() => {
                ResolvedCredentials { credentials, is_using_defaults: false }
            }
            Some(_) => {
                debug!("stored credentials incomplete, using defaults");
                self.fallback()
            }
            None => self.fallback(),
        }
    }

    /// Merge `patch` into the stored record and write it back.
    ///
    /// # Errors
    /// Returns `VioShopError::Storage` when the record cannot be written.
    pub async fn persist(&self, patch: CredentialsPatch) -> Result<Credentials> {
        let _guard = self.write_lock.lock().await;
        let mut current = self.load_merged().await.unwrap_or_else(|| self.defaults.clone());
        current.apply(patch);
        self.write(&current).await?;
        info!(app_key = %current.app_key, region = %current.region, "credentials persisted");
        Ok(current)
    }

    /// Store an OAuth grant. Token, refresh token and expiry land in one write.
    pub async fn store_tokens(&self, grant: &TokenGrant) -> Result<Credentials> {
        self.persist(CredentialsPatch::from(grant)).await
    }

    /// Remove OAuth tokens but keep the rest of the record.
    pub async fn clear_tokens(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(mut current) = self.load_merged().await else {
            return Ok(());
        };
        current.clear_tokens();
        self.write(&current).await?;
        info!("stored OAuth tokens cleared");
        Ok(())
    }

    /// Remove all stored overrides, reverting `resolve()` to defaults.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(API_CONFIG_KEY).await?;
        info!("stored credentials cleared");
        Ok(())
    }

    fn fallback(&self) -> ResolvedCredentials {
        ResolvedCredentials { credentials: self.defaults.clone(), is_using_defaults: true }
    }

    /// Stored record merged over the defaults, `None` when absent or unusable.
    async fn load_merged(&self) -> Option<Credentials> {
        let raw = match self.store.get(API_CONFIG_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read stored credentials");
                return None;
            }
        };

        let stored = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("stored credentials are not a JSON object, ignoring");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "stored credentials are corrupted, ignoring");
                return None;
            }
        };

        let mut merged = match serde_json::to_value(&self.defaults) {
            Ok(Value::Object(map)) => map,
            _ => return None,
        };
        for (key, value) in stored {
            if !value.is_null() {
                merged.insert(key, value);
            }
        }

        match serde_json::from_value::<Credentials>(Value::Object(merged)) {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                warn!(error = %err, "stored credentials have invalid fields, ignoring");
                None
            }
        }
    }

    async fn write(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string(credentials)
            .map_err(|e| VioShopError::Internal(format!("failed to encode credentials: {e}")))?;
        self.store.set(API_CONFIG_KEY, &json).await
    }
}

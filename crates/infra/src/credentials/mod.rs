//! Media API key providers
//!
//! [`StaticKeyProvider`] serves a fixed key from configuration.
//! [`StoredKeyProvider`] keeps the key in a [`KeyValueStore`] and asks a
//! [`KeyPrompt`] for a replacement when the provider rejects the current one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use vioshop_core::{CredentialProvider, KeyValueStore};
use vioshop_domain::constants::MEDIA_API_KEY_KEY;
use vioshop_domain::IntegrationError;

/// A key that never changes. Re-selection always declines.
#[derive(Clone)]
pub struct StaticKeyProvider {
    key: Option<String>,
}

impl StaticKeyProvider {
    pub fn new(key: Option<String>) -> Self {
        Self { key: key.filter(|k| !k.trim().is_empty()) }
    }
}

impl std::fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyProvider").field("has_key", &self.key.is_some()).finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticKeyProvider {
    async fn current_key(&self) -> Option<String> {
        self.key.clone()
    }

    async fn prompt_for_key(&self) -> Result<bool, IntegrationError> {
        Ok(false)
    }
}

/// Interactive source of a new media API key.
#[async_trait]
pub trait KeyPrompt: Send + Sync {
    /// Returns the key the user selected, or `None` if they declined.
    async fn request_key(&self) -> Result<Option<String>, IntegrationError>;
}

/// Key persisted under [`MEDIA_API_KEY_KEY`], with an optional fallback used
/// until a key has been stored.
pub struct StoredKeyProvider {
    store: Arc<dyn KeyValueStore>,
    prompt: Arc<dyn KeyPrompt>,
    fallback: Option<String>,
}

impl StoredKeyProvider {
    pub fn new(store: Arc<dyn KeyValueStore>, prompt: Arc<dyn KeyPrompt>) -> Self {
        Self { store, prompt, fallback: None }
    }

    pub fn with_fallback(mut self, key: Option<String>) -> Self {
        self.fallback = key.filter(|k| !k.trim().is_empty());
        self
    }
}

#[async_trait]
impl CredentialProvider for StoredKeyProvider {
    async fn current_key(&self) -> Option<String> {
        match self.store.get(MEDIA_API_KEY_KEY).await {
            Ok(Some(key)) if !key.trim().is_empty() => Some(key),
            Ok(_) => self.fallback.clone(),
            Err(err) => {
                warn!(error = %err, "failed to read stored media key");
                self.fallback.clone()
            }
        }
    }

    async fn prompt_for_key(&self) -> Result<bool, IntegrationError> {
        let Some(key) = self.prompt.request_key().await? else {
            info!("media key selection declined");
            return Ok(false);
        };
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }

        self.store.set(MEDIA_API_KEY_KEY, key).await.map_err(IntegrationError::from)?;
        info!("media key re-selected");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use vioshop_core::InMemoryStore;

    use super::*;

    struct ScriptedPrompt {
        answers: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPrompt {
        fn new(answers: Vec<Option<&str>>) -> Arc<Self> {
            let answers = answers.into_iter().rev().map(|a| a.map(str::to_string)).collect();
            Arc::new(Self { answers: Mutex::new(answers) })
        }
    }

    #[async_trait]
    impl KeyPrompt for ScriptedPrompt {
        async fn request_key(&self) -> Result<Option<String>, IntegrationError> {
            Ok(self.answers.lock().pop().flatten())
        }
    }

    #[tokio::test]
    async fn static_provider_never_reselects() {
        let provider = StaticKeyProvider::new(Some("abc".into()));
        assert_eq!(provider.current_key().await.as_deref(), Some("abc"));
        assert!(!provider.prompt_for_key().await.unwrap());

        assert!(!StaticKeyProvider::new(Some("  ".into())).has_key().await);
    }

    #[tokio::test]
    async fn stored_provider_prefers_stored_key_over_fallback() {
        let store = Arc::new(InMemoryStore::new());
        let provider = StoredKeyProvider::new(store.clone(), ScriptedPrompt::new(vec![]))
            .with_fallback(Some("env-key".into()));

        assert_eq!(provider.current_key().await.as_deref(), Some("env-key"));

        store.set(MEDIA_API_KEY_KEY, "stored-key").await.unwrap();
        assert_eq!(provider.current_key().await.as_deref(), Some("stored-key"));
    }

    #[tokio::test]
    async fn prompt_stores_selected_key() {
        let store = Arc::new(InMemoryStore::new());
        let provider =
            StoredKeyProvider::new(store.clone(), ScriptedPrompt::new(vec![Some("new-key")]));

        assert!(provider.prompt_for_key().await.unwrap());
        assert_eq!(store.get(MEDIA_API_KEY_KEY).await.unwrap().as_deref(), Some("new-key"));
        assert_eq!(provider.current_key().await.as_deref(), Some("new-key"));
    }

    #[tokio::test]
    async fn declined_prompt_leaves_store_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let provider = StoredKeyProvider::new(store.clone(), ScriptedPrompt::new(vec![None]));

        assert!(!provider.prompt_for_key().await.unwrap());
        assert_eq!(store.get(MEDIA_API_KEY_KEY).await.unwrap(), None);
    }
}

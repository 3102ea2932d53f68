//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vioshop_core::{
    CredentialProvider, CredentialStore, KeyValueStore, Library, MediaJobRunner, PollPolicy,
};
use vioshop_domain::{AppConfig, AuthState, Credentials, PartnerConfig, Result, VioShopError};
use vioshop_infra::credentials::{KeyPrompt, StaticKeyProvider, StoredKeyProvider};
use vioshop_infra::http::HttpClient;
use vioshop_infra::storage::open_store;
use vioshop_infra::{config, GeminiClient, TikTokShopClient};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub credentials: Arc<CredentialStore>,
    pub partner: Arc<TikTokShopClient>,
    pub media_client: Arc<GeminiClient>,
    pub media: Arc<MediaJobRunner>,
    pub media_keys: Arc<dyn CredentialProvider>,
    pub library: Arc<Library>,
}

impl AppContext {
    /// Load `.env`, then configuration from file and environment, and build
    /// the context from it.
    pub async fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "loaded .env"),
            Err(e) => warn!(error = %e, "could not load .env file"),
        }

        let config = config::load()?;
        Self::from_config(config).await
    }

    /// Build the context with the media key taken from configuration.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let store = open_store(&config.storage);
        let keys: Arc<dyn CredentialProvider> =
            Arc::new(StaticKeyProvider::new(config.media.api_key.clone()));
        Self::with_parts(config, store, keys).await
    }

    /// Build the context with a persisted media key that the user can
    /// re-select through `prompt` after an entitlement failure. The
    /// configured key is used until one has been stored.
    pub async fn from_config_with_prompt(
        config: AppConfig,
        prompt: Arc<dyn KeyPrompt>,
    ) -> Result<Self> {
        config.validate()?;
        let store = open_store(&config.storage);
        let keys: Arc<dyn CredentialProvider> = Arc::new(
            StoredKeyProvider::new(store.clone(), prompt)
                .with_fallback(config.media.api_key.clone()),
        );
        Self::with_parts(config, store, keys).await
    }

    /// Wire every service over an explicit store and key provider.
    pub async fn with_parts(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        media_keys: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let credentials =
            Arc::new(CredentialStore::new(store.clone(), credential_defaults(&config.partner)));

        let partner_http = http_client(config.partner.timeout_secs)?;
        let partner =
            Arc::new(TikTokShopClient::new(partner_http, credentials.clone(), &config.partner));

        let media_http = http_client(config.media.timeout_secs)?;
        let media_client =
            Arc::new(GeminiClient::new(media_http, media_keys.clone(), &config.media));
        let media = Arc::new(MediaJobRunner::new(
            media_client.clone(),
            media_keys.clone(),
            PollPolicy::from(&config.media),
        ));

        let library = Arc::new(Library::new(store.clone()));

        let state = partner.restore_session().await;
        info!(
            backend = %config.storage.backend,
            auth_state = %state,
            "application context initialized"
        );

        Ok(Self { config, store, credentials, partner, media_client, media, media_keys, library })
    }

    pub fn auth_state(&self) -> AuthState {
        self.partner.auth_state()
    }
}

/// Compiled-in credential defaults that stored overrides merge over.
fn credential_defaults(partner: &PartnerConfig) -> Credentials {
    Credentials {
        app_key: partner.app_key.clone(),
        app_secret: partner.app_secret.clone(),
        region: partner.region,
        ..Credentials::default()
    }
}

fn http_client(timeout_secs: u64) -> Result<HttpClient> {
    HttpClient::builder().timeout(Duration::from_secs(timeout_secs.max(1))).build().map_err(
        |e| {
            tracing::error!(error = %e, "failed to build HTTP client");
            VioShopError::Internal(format!("failed to build HTTP client: {e}"))
        },
    )
}

#[cfg(test)]
mod tests {
    use vioshop_domain::Region;

    use super::*;

    #[test]
    fn defaults_come_from_partner_config() {
        let partner = PartnerConfig {
            app_key: "key".into(),
            app_secret: "secret".into(),
            region: Region::US,
            ..PartnerConfig::default()
        };
        let defaults = credential_defaults(&partner);
        assert_eq!(defaults.app_key, "key");
        assert_eq!(defaults.app_secret, "secret");
        assert_eq!(defaults.region, Region::US);
        assert!(defaults.access_token.is_none());
    }
}

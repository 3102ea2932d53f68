//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_AUTH_BASE_URL, DEFAULT_MAX_POLLS, DEFAULT_MEDIA_API_BASE_URL,
    DEFAULT_OPEN_API_BASE_URL, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TEXT_MODEL,
    DEFAULT_VIDEO_MODEL,
};
use crate::impl_domain_status_conversions;
use crate::types::Region;
use crate::{Result, VioShopError};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub partner: PartnerConfig,
    pub media: MediaConfig,
    pub storage: StorageConfig,
}

/// Partner commerce API configuration.
///
/// `app_key`, `app_secret` and `region` are the compiled-in credential
/// defaults that stored user overrides are merged over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerConfig {
    pub app_key: String,
    #[serde(skip_serializing)]
    pub app_secret: String,
    pub region: Region,
    pub open_api_base_url: String,
    pub auth_base_url: String,
    /// Include the JSON body in the product search signature.
    pub search_signs_body: bool,
    pub timeout_secs: u64,
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_secret: String::new(),
            region: Region::default(),
            open_api_base_url: DEFAULT_OPEN_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            search_signs_body: true,
            timeout_secs: 30,
        }
    }
}

/// Generative-media API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub video_model: String,
    pub text_model: String,
    pub poll_interval_secs: u64,
    pub max_polls: u32,
    pub max_wait_secs: Option<u64>,
    pub timeout_secs: u64,
}

impl MediaConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_MEDIA_API_BASE_URL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_polls: DEFAULT_MAX_POLLS,
            max_wait_secs: None,
            timeout_secs: 60,
        }
    }
}

/// Backing used for the local key-value store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keychain,
    Memory,
}

impl_domain_status_conversions!(StorageBackend {
    File => "file",
    Keychain => "keychain",
    Memory => "memory",
});

/// Local storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// File path for the `file` backend.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::File, path: "vioshop-store.json".to_string() }
    }
}

impl AppConfig {
    /// Check the values that cannot be caught by deserialization.
    ///
    /// # Errors
    /// Returns `VioShopError::Config` for malformed base URLs or a zero
    /// poll bound.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("partner.open_api_base_url", &self.partner.open_api_base_url),
            ("partner.auth_base_url", &self.partner.auth_base_url),
            ("media.api_base_url", &self.media.api_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| VioShopError::Config(format!("Invalid URL for {name}: {e}")))?;
        }

        if self.media.max_polls == 0 {
            return Err(VioShopError::Config("media.max_polls must be at least 1".into()));
        }

        if self.storage.backend == StorageBackend::File && self.storage.path.trim().is_empty() {
            return Err(VioShopError::Config("storage.path is required for file backend".into()));
        }

        Ok(())
    }
}

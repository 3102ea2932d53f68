//! Error types used throughout the application

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for VioShop
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum VioShopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for VioShop operations
pub type Result<T> = std::result::Result<T, VioShopError>;

/// Categories of integration errors, used for retry and recovery decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationErrorCategory {
    /// Network-level failure - retryable with bounded backoff
    Transport,
    /// Provider returned a structured error envelope - not retried
    Provider,
    /// Missing, revoked or rejected credentials - caller must reauthorize
    Authentication,
    /// Credential lacks the required capability tier
    Entitlement,
    /// Quota exceeded - retry after the suggested delay
    RateLimit,
    /// Caller-specified bound exceeded or caller cancelled
    Aborted,
    /// Response could not be understood
    Protocol,
}

/// Errors raised while talking to the partner commerce API or the
/// generative-media API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Access token revoked: {0}")]
    TokenRevoked(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Credential lacks required entitlement: {0}")]
    Entitlement(String),

    #[error("Rate limit exceeded (retry after {}s): {message}", retry_after.as_secs())]
    RateLimit { retry_after: Duration, message: String },

    #[error("Polling timed out after {polls} polls ({waited:?})")]
    Timeout { polls: u32, waited: Duration },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl IntegrationError {
    /// Get the error category for this error
    pub fn category(&self) -> IntegrationErrorCategory {
        match self {
            Self::Transport(_) => IntegrationErrorCategory::Transport,
            Self::Api { .. } => IntegrationErrorCategory::Provider,
            Self::Unauthenticated(_) | Self::TokenRevoked(_) | Self::AuthExchange(_) => {
                IntegrationErrorCategory::Authentication
            }
            Self::Entitlement(_) => IntegrationErrorCategory::Entitlement,
            Self::RateLimit { .. } => IntegrationErrorCategory::RateLimit,
            Self::Timeout { .. } | Self::Cancelled => IntegrationErrorCategory::Aborted,
            Self::InvalidResponse(_) | Self::Storage(_) => IntegrationErrorCategory::Protocol,
        }
    }

    /// Check if a caller may retry the failed operation on its own.
    ///
    /// Only transport failures and rate limits qualify. Entitlement failures
    /// go through [`IntegrationError::triggers_reselection`] instead.
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            IntegrationErrorCategory::Transport | IntegrationErrorCategory::RateLimit
        )
    }

    /// Suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self {
            Self::RateLimit { retry_after, .. } => retry_after.as_secs(),
            Self::Transport(_) => 5,
            _ => 0,
        }
    }

    /// Whether this error should send the user through credential reselection.
    pub fn triggers_reselection(&self) -> bool {
        matches!(self, Self::Entitlement(_))
    }
}

impl From<VioShopError> for IntegrationError {
    fn from(err: VioShopError) -> Self {
        match err {
            VioShopError::Network(msg) => Self::Transport(msg),
            VioShopError::Auth(msg) => Self::Unauthenticated(msg),
            VioShopError::Storage(msg) => Self::Storage(msg),
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

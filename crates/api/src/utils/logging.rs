use std::time::Duration;

use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use vioshop_domain::{IntegrationError, VioShopError};

/// Install the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. `json` switches the
/// formatter to one JSON object per line. Calling this again once a
/// subscriber is installed is a no-op.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if result.is_err() {
        debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"products::search_products"`
/// and must not carry user data.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Errors that map onto a stable label for logs.
pub trait ErrorLabel {
    fn label(&self) -> &'static str;
}

impl ErrorLabel for VioShopError {
    fn label(&self) -> &'static str {
        match self {
            VioShopError::Config(_) => "config",
            VioShopError::Storage(_) => "storage",
            VioShopError::Network(_) => "network",
            VioShopError::Auth(_) => "auth",
            VioShopError::NotFound(_) => "not_found",
            VioShopError::InvalidInput(_) => "invalid_input",
            VioShopError::Internal(_) => "internal",
        }
    }
}

impl ErrorLabel for IntegrationError {
    fn label(&self) -> &'static str {
        match self {
            IntegrationError::Transport(_) => "transport",
            IntegrationError::Api { .. } => "api",
            IntegrationError::Unauthenticated(_) => "unauthenticated",
            IntegrationError::TokenRevoked(_) => "token_revoked",
            IntegrationError::AuthExchange(_) => "auth_exchange",
            IntegrationError::Entitlement(_) => "entitlement",
            IntegrationError::RateLimit { .. } => "rate_limit",
            IntegrationError::Timeout { .. } => "timeout",
            IntegrationError::Cancelled => "cancelled",
            IntegrationError::InvalidResponse(_) => "invalid_response",
            IntegrationError::Storage(_) => "storage",
        }
    }
}

/// Convert an error into a stable label suitable for logging.
#[inline]
pub fn error_label<E: ErrorLabel>(error: &E) -> &'static str {
    error.label()
}

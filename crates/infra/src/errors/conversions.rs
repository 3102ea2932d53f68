//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use thiserror::Error;
use vioshop_domain::{IntegrationError, VioShopError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub VioShopError);

impl From<InfraError> for VioShopError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VioShopError> for InfraError {
    fn from(value: VioShopError) -> Self {
        InfraError(value)
    }
}

impl From<InfraError> for IntegrationError {
    fn from(value: InfraError) -> Self {
        value.0.into()
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVioShopError {
    fn into_vioshop(self) -> VioShopError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → VioShopError */
/* -------------------------------------------------------------------------- */

impl IntoVioShopError for KeyringError {
    fn into_vioshop(self) -> VioShopError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => VioShopError::NotFound("keychain entry not found".into()),
            BadEncoding(_) => {
                VioShopError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => VioShopError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                VioShopError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            Ambiguous(entries) => VioShopError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => VioShopError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                VioShopError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => VioShopError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_vioshop())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VioShopError */
/* -------------------------------------------------------------------------- */

impl IntoVioShopError for HttpError {
    fn into_vioshop(self) -> VioShopError {
        if self.is_timeout() {
            return VioShopError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return VioShopError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return VioShopError::InvalidInput(format!("failed to decode HTTP body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => VioShopError::Auth(message),
                404 => VioShopError::NotFound(message),
                400..=499 => VioShopError::InvalidInput(message),
                _ => VioShopError::Network(message),
            };
        }

        VioShopError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vioshop())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → VioShopError */
/* -------------------------------------------------------------------------- */

impl IntoVioShopError for std::io::Error {
    fn into_vioshop(self) -> VioShopError {
        match self.kind() {
            std::io::ErrorKind::NotFound => VioShopError::NotFound(self.to_string()),
            _ => VioShopError::Storage(format!("I/O error: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_vioshop())
    }
}

impl From<tempfile::PersistError> for InfraError {
    fn from(value: tempfile::PersistError) -> Self {
        InfraError(VioShopError::Storage(format!("failed to persist file: {}", value.error)))
    }
}

impl IntoVioShopError for JsonError {
    fn into_vioshop(self) -> VioShopError {
        VioShopError::Storage(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_vioshop())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

//! OAuth flow states

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Where the seller is in the partner OAuth flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    NotAuthorized,
    /// Consent URL handed to the user, waiting for the redirect.
    Authorizing,
    /// Authorization code received, exchange in flight.
    Exchanging,
    Authorized,
    Failed,
}

impl_domain_status_conversions!(AuthState {
    NotAuthorized => "not_authorized",
    Authorizing => "authorizing",
    Exchanging => "exchanging",
    Authorized => "authorized",
    Failed => "failed",
});

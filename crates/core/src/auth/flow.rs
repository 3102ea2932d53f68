use chrono::{DateTime, Utc};
use tracing::debug;
use vioshop_domain::{AuthState, Credentials, Result, VioShopError};

/// Tracks the seller's position in the OAuth flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFlow {
    state: AuthState,
    last_error: Option<String>,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `AUTHORIZED` when the stored credentials hold a live token.
    pub fn from_credentials(credentials: &Credentials, now: DateTime<Utc>) -> Self {
        let state = if credentials.has_valid_access_token(now) {
            AuthState::Authorized
        } else {
            AuthState::NotAuthorized
        };
        Self { state, last_error: None }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_authorized(&self) -> bool {
        self.state == AuthState::Authorized
    }

    /// Drop back to `NOT_AUTHORIZED` when the flow says `AUTHORIZED` but the
    /// stored token has expired or been removed. Returns whether it did.
    pub fn expire_stale(&mut self, credentials: &Credentials, now: DateTime<Utc>) -> bool {
        if self.state != AuthState::Authorized || credentials.has_valid_access_token(now) {
            return false;
        }
        self.transition(AuthState::NotAuthorized);
        true
    }

    /// The consent URL was handed to the user.
    pub fn begin_authorization(&mut self) -> Result<()> {
        match self.state {
            AuthState::NotAuthorized | AuthState::Authorizing | AuthState::Failed => {
                self.transition(AuthState::Authorizing);
                self.last_error = None;
                Ok(())
            }
            other => Err(invalid(other, AuthState::Authorizing)),
        }
    }

    /// An authorization code arrived and the exchange is starting.
    ///
    /// Accepted from `NOT_AUTHORIZED` too, since the redirect may land in a
    /// process that never issued the consent URL.
    pub fn receive_code(&mut self) -> Result<()> {
        match self.state {
            AuthState::NotAuthorized | AuthState::Authorizing | AuthState::Failed => {
                self.transition(AuthState::Exchanging);
                Ok(())
            }
            other => Err(invalid(other, AuthState::Exchanging)),
        }
    }

    pub fn complete(&mut self) -> Result<()> {
        match self.state {
            AuthState::Exchanging => {
                self.transition(AuthState::Authorized);
                self.last_error = None;
                Ok(())
            }
            other => Err(invalid(other, AuthState::Authorized)),
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        match self.state {
            AuthState::Exchanging => {
                self.transition(AuthState::Failed);
                self.last_error = Some(reason.into());
                Ok(())
            }
            other => Err(invalid(other, AuthState::Failed)),
        }
    }

    /// The provider rejected the access token.
    pub fn revoke(&mut self) {
        self.transition(AuthState::NotAuthorized);
    }

    pub fn logout(&mut self) {
        self.transition(AuthState::NotAuthorized);
        self.last_error = None;
    }

    fn transition(&mut self, next: AuthState) {
        debug!(from = %self.state, to = %next, "auth flow transition");
        self.state = next;
    }
}

fn invalid(from: AuthState, to: AuthState) -> VioShopError {
    VioShopError::InvalidInput(format!("invalid auth transition from {from} to {to}"))
}

//! Partner API credentials and OAuth token grants

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace region a seller account is registered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    BR,
    US,
    GB,
    ID,
    MY,
    PH,
    SG,
    TH,
    VN,
    MX,
    ES,
    JP,
}

impl Region {
    pub const ALL: [Self; 12] = [
        Self::BR,
        Self::US,
        Self::GB,
        Self::ID,
        Self::MY,
        Self::PH,
        Self::SG,
        Self::TH,
        Self::VN,
        Self::MX,
        Self::ES,
        Self::JP,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BR => "BR",
            Self::US => "US",
            Self::GB => "GB",
            Self::ID => "ID",
            Self::MY => "MY",
            Self::PH => "PH",
            Self::SG => "SG",
            Self::TH => "TH",
            Self::VN => "VN",
            Self::MX => "MX",
            Self::ES => "ES",
            Self::JP => "JP",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == upper)
            .ok_or_else(|| format!("Invalid Region: {s}"))
    }
}

/// Partner API credentials plus the OAuth tokens obtained for a seller.
///
/// An access token is only usable together with a `token_expiry` in the
/// future; without one the client runs unauthenticated.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
    pub region: Region,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub token_expiry: Option<DateTime<Utc>>,
    pub shop_cipher: Option<String>,
    pub partner_id: Option<String>,
    pub seller_name: Option<String>,
    pub open_id: Option<String>,
}

impl Credentials {
    /// Both halves of the app credential are present.
    pub fn is_complete(&self) -> bool {
        !self.app_key.trim().is_empty() && !self.app_secret.trim().is_empty()
    }

    /// Returns the access token when it is present and not yet expired.
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (self.access_token.as_deref(), self.token_expiry) {
            (Some(token), Some(expiry)) if !token.is_empty() && expiry > now => Some(token),
            _ => None,
        }
    }

    pub fn has_valid_access_token(&self, now: DateTime<Utc>) -> bool {
        self.valid_access_token(now).is_some()
    }

    /// Merge a partial update into this record. `None` fields are left alone.
    pub fn apply(&mut self, patch: CredentialsPatch) {
        let CredentialsPatch {
            app_key,
            app_secret,
            region,
            access_token,
            refresh_token,
            token_expiry,
            shop_cipher,
            partner_id,
            seller_name,
            open_id,
        } = patch;

        if let Some(value) = app_key {
            self.app_key = value;
        }
        if let Some(value) = app_secret {
            self.app_secret = value;
        }
        if let Some(value) = region {
            self.region = value;
        }
        if access_token.is_some() {
            self.access_token = access_token;
        }
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        if token_expiry.is_some() {
            self.token_expiry = token_expiry;
        }
        if shop_cipher.is_some() {
            self.shop_cipher = shop_cipher;
        }
        if partner_id.is_some() {
            self.partner_id = partner_id;
        }
        if seller_name.is_some() {
            self.seller_name = seller_name;
        }
        if open_id.is_some() {
            self.open_id = open_id;
        }
    }

    /// Drop the OAuth tokens, keeping the app credential.
    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.token_expiry = None;
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("region", &self.region)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_expiry", &self.token_expiry)
            .field("shop_cipher", &self.shop_cipher)
            .field("partner_id", &self.partner_id)
            .field("seller_name", &self.seller_name)
            .field("open_id", &self.open_id)
            .finish()
    }
}

/// Partial update for [`Credentials`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialsPatch {
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub region: Option<Region>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub token_expiry: Option<DateTime<Utc>>,
    pub shop_cipher: Option<String>,
    pub partner_id: Option<String>,
    pub seller_name: Option<String>,
    pub open_id: Option<String>,
}

impl From<&TokenGrant> for CredentialsPatch {
    fn from(grant: &TokenGrant) -> Self {
        Self {
            access_token: Some(grant.access_token.clone()),
            refresh_token: Some(grant.refresh_token.clone()),
            token_expiry: Some(grant.expires_at),
            open_id: grant.open_id.clone(),
            seller_name: grant.seller_name.clone(),
            ..Self::default()
        }
    }
}

/// Effective credentials returned by the config resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCredentials {
    pub credentials: Credentials,
    /// True when no usable stored record exists and defaults are in effect.
    pub is_using_defaults: bool,
}

/// Tokens issued by the OAuth code exchange or a refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds, as reported at issue time.
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub open_id: Option<String>,
    pub seller_name: Option<String>,
}

impl TokenGrant {
    /// Build a grant whose access token lives `expires_in` seconds from `issued_at`.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            expires_at: issued_at + Duration::seconds(expires_in),
            open_id: None,
            seller_name: None,
        }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("open_id", &self.open_id)
            .field("seller_name", &self.seller_name)
            .finish_non_exhaustive()
    }
}

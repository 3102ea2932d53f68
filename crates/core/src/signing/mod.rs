//! Partner API request signing
//!
//! Every signed call to the partner Open API carries a `sign` query parameter
//! computed as:
//!
//! ```text
//! sign = hex(HMAC-SHA256(key = secret,
//!            msg = secret + path + key1 + value1 + ... + keyN + valueN [+ body] + secret))
//! ```
//!
//! Query keys are sorted lexicographically before concatenation, so the
//! result does not depend on the order the caller supplies them in. Whether
//! the body participates is decided per endpoint with [`BodySigning`].

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use vioshop_domain::{Result, VioShopError};

type HmacSha256 = Hmac<Sha256>;

/// Query parameters that never participate in the signature.
const EXCLUDED_PARAMS: &[&str] = &["sign", "access_token"];

/// Whether an endpoint includes the request body in its signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodySigning {
    #[default]
    Include,
    Exclude,
}

impl BodySigning {
    pub fn from_flag(include: bool) -> Self {
        if include {
            Self::Include
        } else {
            Self::Exclude
        }
    }
}

/// A request ready to send: sorted query parameters plus their signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub path: String,
    pub query_params: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub signature: String,
}

impl SignedRequest {
    /// Query pairs including the `sign` parameter, in sorted key order.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> =
            self.query_params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        pairs.push(("sign", self.signature.as_str()));
        pairs
    }
}

/// Signs partner API requests with the app secret.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Compute the signature for `path` and `params` without a body.
    ///
    /// # Errors
    /// Returns `VioShopError::InvalidInput` for an empty secret or a path
    /// that does not start with `/`.
    pub fn sign<I, K, V>(&self, path: &str, params: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.sign_with_body(path, params, &[], BodySigning::Exclude)
    }

    /// Compute the signature, appending `body` when `mode` is
    /// [`BodySigning::Include`].
    pub fn sign_with_body<I, K, V>(
        &self,
        path: &str,
        params: I,
        body: &[u8],
        mode: BodySigning,
    ) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let sorted = sorted_params(params);
        self.digest(path, &sorted, body, mode)
    }

    /// Build a [`SignedRequest`] for `path`.
    pub fn sign_request<I, K, V>(
        &self,
        path: &str,
        params: I,
        body: Vec<u8>,
        mode: BodySigning,
    ) -> Result<SignedRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query_params = sorted_params(params);
        let signature = self.digest(path, &query_params, &body, mode)?;
        Ok(SignedRequest { path: path.to_string(), query_params, body, signature })
    }

    fn digest(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
        body: &[u8],
        mode: BodySigning,
    ) -> Result<String> {
        if self.secret.is_empty() {
            return Err(VioShopError::InvalidInput("signing secret is empty".into()));
        }
        if !path.starts_with('/') {
            return Err(VioShopError::InvalidInput(format!(
                "signing path must start with '/': {path}"
            )));
        }

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| VioShopError::Internal(format!("failed to initialise HMAC: {e}")))?;

        mac.update(self.secret.as_bytes());
        mac.update(path.as_bytes());
        for (key, value) in params {
            if EXCLUDED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            mac.update(key.as_bytes());
            mac.update(value.as_bytes());
        }
        if mode == BodySigning::Include {
            mac.update(body);
        }
        mac.update(self.secret.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Convenience wrapper for one-off signatures.
pub fn sign<I, K, V>(path: &str, params: I, secret: &str) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    RequestSigner::new(secret).sign(path, params)
}

fn sorted_params<I, K, V>(params: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    params.into_iter().map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())).collect()
}

/// OAuth helpers for TikTok Shop seller authorization
use chrono::{DateTime, TimeZone, Utc};
use vioshop_domain::{Region, TokenGrant};

use super::types::TokenData;

const AUTHORIZE_URL: &str = "https://services.tiktokshop.com/open/authorize";
const AUTHORIZE_URL_US: &str = "https://services.us.tiktokshop.com/open/authorize";

/// `access_token_expire_in` values below this are relative lifetimes in
/// seconds; anything larger is an absolute unix timestamp.
const ABSOLUTE_EXPIRY_THRESHOLD: i64 = 1_000_000_000;

/// Build the seller consent URL.
///
/// US sellers authorize on a separate host. `state` is echoed back on the
/// redirect and should be checked by the caller.
pub fn authorization_url(app_key: &str, region: Region, state: Option<&str>) -> String {
    let base = match region {
        Region::US => AUTHORIZE_URL_US,
        _ => AUTHORIZE_URL,
    };

    let mut url = format!("{base}?app_key={}", urlencoding::encode(app_key));
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        url.push_str("&state=");
        url.push_str(&urlencoding::encode(state));
    }
    url
}

/// Absolute expiry for an `access_token_expire_in` value.
pub fn expiry_from(expire_in: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    if expire_in >= ABSOLUTE_EXPIRY_THRESHOLD {
        if let Some(at) = Utc.timestamp_opt(expire_in, 0).single() {
            return at;
        }
    }
    now + chrono::Duration::seconds(expire_in.max(0))
}

pub(crate) fn grant_from(data: TokenData, now: DateTime<Utc>) -> TokenGrant {
    let expires_at = expiry_from(data.access_token_expire_in, now);
    TokenGrant {
        expires_in: (expires_at - now).num_seconds().max(0),
        access_token: data.access_token,
        refresh_token: data.refresh_token,
        expires_at,
        open_id: data.open_id,
        seller_name: data.seller_name,
    }
}

/// TikTok Shop Open API wire types
use serde::{Deserialize, Serialize};

/// Envelope wrapping every Open API and token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
    pub data: Option<T>,
}

/// Body of `POST /product/202309/products/search`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequestBody<'a> {
    pub page_size: u32,
    pub status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub products: Vec<WireProduct>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Product as returned by the search endpoint.
///
/// Every field except `id` is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireProduct {
    pub id: Flexible,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub main_images: Vec<WireImage>,
    #[serde(default)]
    pub price: Option<WirePrice>,
    #[serde(default)]
    pub commission: Option<WireCommission>,
    #[serde(default)]
    pub sales: Option<Flexible>,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireImage {
    #[serde(default)]
    pub url_list: Vec<String>,
    #[serde(default)]
    pub thumb_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WirePrice {
    #[serde(default)]
    pub sale_price: Option<Flexible>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCommission {
    #[serde(default)]
    pub rate: Option<Flexible>,
}

/// A scalar the API sends either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Flexible {
    Text(String),
    Number(serde_json::Number),
}

impl Default for Flexible {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Flexible {
    pub fn as_string(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        }
    }

    /// Numeric value, ignoring a trailing `%`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Text(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            Self::Number(number) => number.as_f64(),
        };
        value.filter(|v| v.is_finite())
    }
}

/// `data` of the token get/refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    /// Seconds until expiry, or an absolute unix timestamp.
    pub access_token_expire_in: i64,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_token_expire_in: Option<i64>,
    #[serde(default)]
    pub open_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
}

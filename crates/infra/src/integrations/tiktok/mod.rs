/// TikTok Shop Open API integration
///
/// Product search and seller OAuth against the partner commerce API.
///
/// # Architecture
///
/// - **Client**: `TikTokShopClient` - signed search, token exchange and refresh
/// - **Auth**: consent URL construction and token expiry handling
/// - **Mapping**: wire product to normalized [`vioshop_domain::Product`]
/// - **Types**: response envelope and wire shapes
///
/// # Usage
///
/// ```no_run
/// use std::sync::Arc;
///
/// use vioshop_core::{CredentialStore, InMemoryStore};
/// use vioshop_domain::{Credentials, PartnerConfig, ProductFilters};
/// use vioshop_infra::http::HttpClient;
/// use vioshop_infra::integrations::tiktok::TikTokShopClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PartnerConfig::default();
/// let backing = Arc::new(InMemoryStore::new());
/// let store = Arc::new(CredentialStore::new(backing, Credentials::default()));
/// let client = TikTokShopClient::new(HttpClient::new()?, store, &config);
///
/// // After the seller approved the consent URL:
/// client.exchange_authorization_code("auth-code", "app-key", "app-secret").await?;
///
/// let products = client.search_products(&ProductFilters::keywords("ring light")).await?;
/// println!("Found {} products", products.len());
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - **Network errors / 5xx on search**: retried by `HttpClient`, then `Transport`
/// - **Non-zero envelope code**: `Api` with the provider message
/// - **Codes 105001/105002 or HTTP 401**: tokens cleared, `TokenRevoked`
/// - **Token endpoints**: sent once, any failure is `AuthExchange`
pub mod auth;
pub mod client;
pub mod mapping;
pub mod types;

pub use auth::{authorization_url, expiry_from};
pub use client::TikTokShopClient;
pub use mapping::map_wire_product;
pub use types::{ApiEnvelope, WireProduct};

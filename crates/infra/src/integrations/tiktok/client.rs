/// TikTok Shop Open API client for product search and seller OAuth
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use vioshop_core::{AuthFlow, BodySigning, CredentialStore, RequestSigner};
use vioshop_domain::constants::{
    ACCESS_TOKEN_HEADER, PRODUCT_SEARCH_PAGE_SIZE, PRODUCT_SEARCH_PATH, REVOKED_TOKEN_CODES,
    TOKEN_GET_PATH, TOKEN_REFRESH_PATH,
};
use vioshop_domain::{
    AuthState, Credentials, CredentialsPatch, IntegrationError, PartnerConfig, Product,
    ProductFilters, TokenGrant,
};

use super::auth::{authorization_url, grant_from};
use super::mapping::map_wire_product;
use super::types::{ApiEnvelope, SearchData, SearchRequestBody, TokenData};
use crate::http::HttpClient;

const SEARCH_STATUS: &str = "ACTIVATE";

/// Partner commerce API client.
///
/// Credentials are resolved from the [`CredentialStore`] on every call, so
/// settings saved by the user take effect without rebuilding the client.
pub struct TikTokShopClient {
    http_client: HttpClient,
    credentials: Arc<CredentialStore>,
    flow: Mutex<AuthFlow>,
    open_api_base_url: String,
    auth_base_url: String,
    search_body_signing: BodySigning,
}

impl TikTokShopClient {
    pub fn new(
        http_client: HttpClient,
        credentials: Arc<CredentialStore>,
        config: &PartnerConfig,
    ) -> Self {
        Self {
            http_client,
            credentials,
            flow: Mutex::new(AuthFlow::new()),
            open_api_base_url: config.open_api_base_url.trim_end_matches('/').to_string(),
            auth_base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            search_body_signing: BodySigning::from_flag(config.search_signs_body),
        }
    }

    /// Set the OAuth state from the stored credentials.
    pub async fn restore_session(&self) -> AuthState {
        let resolved = self.credentials.resolve().await;
        let flow = AuthFlow::from_credentials(&resolved.credentials, Utc::now());
        let state = flow.state();
        *self.flow.lock() = flow;
        debug!(state = %state, "partner session restored");
        state
    }

    pub fn auth_state(&self) -> AuthState {
        self.flow.lock().state()
    }

    pub fn last_auth_error(&self) -> Option<String> {
        self.flow.lock().last_error().map(str::to_string)
    }

    /// Build the consent URL for the configured app and move to
    /// `AUTHORIZING`.
    ///
    /// # Errors
    /// `Unauthenticated` when no app key is configured, `AuthExchange` when
    /// the seller is already authorized or an exchange is running.
    pub async fn begin_authorization(
        &self,
        state: Option<&str>,
    ) -> Result<String, IntegrationError> {
        let credentials = self.credentials.resolve().await.credentials;
        if credentials.app_key.trim().is_empty() {
            return Err(IntegrationError::Unauthenticated("app key is not configured".into()));
        }

        let url = authorization_url(&credentials.app_key, credentials.region, state);
        self.expire_stale_session(&credentials);
        self.flow
            .lock()
            .begin_authorization()
            .map_err(|e| IntegrationError::AuthExchange(e.to_string()))?;

        info!(region = %credentials.region, "seller authorization started");
        Ok(url)
    }

    /// Search the seller's active products.
    ///
    /// Requires a live access token; without one this returns
    /// `Unauthenticated` before any request is made. A revoked token clears
    /// the stored tokens and resets the OAuth state.
    pub async fn search_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, IntegrationError> {
        let credentials = self.credentials.resolve().await.credentials;
        let Some(access_token) = credentials.valid_access_token(Utc::now()) else {
            self.expire_stale_session(&credentials);
            return Err(IntegrationError::Unauthenticated("no valid access token".into()));
        };
        if !credentials.is_complete() {
            return Err(IntegrationError::Unauthenticated(
                "app credentials are not configured".into(),
            ));
        }

        let body = SearchRequestBody {
            page_size: PRODUCT_SEARCH_PAGE_SIZE,
            status: SEARCH_STATUS,
            title: filters.keywords.as_deref().filter(|k| !k.trim().is_empty()),
            category_id: filters.category.as_deref().filter(|c| !c.trim().is_empty()),
        };
        let body = serde_json::to_vec(&body)
            .map_err(|e| IntegrationError::InvalidResponse(format!("encode search body: {e}")))?;

        let timestamp = Utc::now().timestamp().to_string();
        let shop_cipher = credentials.shop_cipher.clone().unwrap_or_default();
        let signed = RequestSigner::new(credentials.app_secret.as_str()).sign_request(
            PRODUCT_SEARCH_PATH,
            [
                ("app_key", credentials.app_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("shop_cipher", shop_cipher.as_str()),
            ],
            body,
            self.search_body_signing,
        )?;

        let url = format!("{}{}", self.open_api_base_url, signed.path);
        let request = self
            .http_client
            .request(Method::POST, url)
            .query(&signed.query_pairs())
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header(CONTENT_TYPE, "application/json")
            .body(signed.body.clone());

        let response = self.http_client.send(request).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received product search response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.revoke(format!("HTTP {}", status.as_u16())).await);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntegrationError::Api { code: i64::from(status.as_u16()), message });
        }

        let envelope: ApiEnvelope<SearchData> = parse_envelope(response).await?;
        if REVOKED_TOKEN_CODES.contains(&envelope.code) {
            return Err(self.revoke(envelope.message).await);
        }
        if envelope.code != 0 {
            warn!(
                code = envelope.code,
                request_id = ?envelope.request_id,
                "product search rejected"
            );
            return Err(IntegrationError::Api { code: envelope.code, message: envelope.message });
        }

        let products: Vec<Product> = envelope
            .data
            .unwrap_or_default()
            .products
            .iter()
            .map(map_wire_product)
            .filter(|product| filters.accepts(product))
            .collect();

        info!(count = products.len(), "product search complete");
        Ok(products)
    }

    /// Exchange an authorization code for tokens and store them together
    /// with the app credential that obtained them.
    ///
    /// Sent exactly once. Any failure is `AuthExchange` and leaves the OAuth
    /// state in `FAILED`.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        app_key: &str,
        app_secret: &str,
    ) -> Result<TokenGrant, IntegrationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(IntegrationError::AuthExchange("authorization code is empty".into()));
        }

        let credentials = self.credentials.resolve().await.credentials;
        self.expire_stale_session(&credentials);
        self.flow
            .lock()
            .receive_code()
            .map_err(|e| IntegrationError::AuthExchange(e.to_string()))?;

        let result = self
            .request_grant(
                TOKEN_GET_PATH,
                &[
                    ("app_key", app_key),
                    ("app_secret", app_secret),
                    ("auth_code", code),
                    ("grant_type", "authorized_code"),
                ],
            )
            .await;

        let stored = match result {
            Ok(grant) => {
                let patch = CredentialsPatch {
                    app_key: Some(app_key.to_string()),
                    app_secret: Some(app_secret.to_string()),
                    ..CredentialsPatch::from(&grant)
                };
                self.credentials.persist(patch).await.map(|_| grant).map_err(IntegrationError::from)
            }
            Err(err) => Err(err),
        };

        let mut flow = self.flow.lock();
        match stored {
            Ok(grant) => {
                flow.complete().map_err(|e| IntegrationError::AuthExchange(e.to_string()))?;
                info!(expires_at = %grant.expires_at, "authorization code exchanged");
                Ok(grant)
            }
            Err(err) => {
                warn!(error = %err, "authorization code exchange failed");
                // Only fails if another caller already moved the flow on.
                let _ = flow.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Trade the stored refresh token for a new grant and store it.
    pub async fn refresh_access_token(&self) -> Result<TokenGrant, IntegrationError> {
        let credentials = self.credentials.resolve().await.credentials;
        let Some(refresh_token) = credentials.refresh_token.as_deref().filter(|t| !t.is_empty())
        else {
            return Err(IntegrationError::Unauthenticated("no refresh token stored".into()));
        };
        if !credentials.is_complete() {
            return Err(IntegrationError::Unauthenticated(
                "app credentials are not configured".into(),
            ));
        }

        let grant = self
            .request_grant(
                TOKEN_REFRESH_PATH,
                &[
                    ("app_key", credentials.app_key.as_str()),
                    ("app_secret", credentials.app_secret.as_str()),
                    ("refresh_token", refresh_token),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await?;

        let stored = self.credentials.store_tokens(&grant).await?;
        *self.flow.lock() = AuthFlow::from_credentials(&stored, Utc::now());
        info!(expires_at = %grant.expires_at, "access token refreshed");
        Ok(grant)
    }

    /// Drop the stored tokens and return to `NOT_AUTHORIZED`.
    pub async fn logout(&self) -> Result<(), IntegrationError> {
        self.credentials.clear_tokens().await?;
        self.flow.lock().logout();
        info!("seller logged out");
        Ok(())
    }

    /// Unsigned token endpoint call. Never retried.
    async fn request_grant(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<TokenGrant, IntegrationError> {
        let url = format!("{}{}", self.auth_base_url, path);
        let request = self.http_client.request(Method::GET, url).query(params);

        let response = self
            .http_client
            .send_once(request)
            .await
            .map_err(|e| IntegrationError::AuthExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IntegrationError::AuthExchange(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        let envelope: ApiEnvelope<TokenData> = parse_envelope(response)
            .await
            .map_err(|e| IntegrationError::AuthExchange(e.to_string()))?;
        if envelope.code != 0 {
            return Err(IntegrationError::AuthExchange(envelope.message));
        }

        match envelope.data {
            Some(data) if !data.access_token.is_empty() => Ok(grant_from(data, Utc::now())),
            _ => Err(IntegrationError::AuthExchange("token response has no access_token".into())),
        }
    }

    fn expire_stale_session(&self, credentials: &Credentials) {
        if self.flow.lock().expire_stale(credentials, Utc::now()) {
            info!("stored access token expired, seller must authorize again");
        }
    }

    async fn revoke(&self, reason: String) -> IntegrationError {
        warn!(reason = %reason, "access token revoked by partner API");
        if let Err(err) = self.credentials.clear_tokens().await {
            warn!(error = %err, "failed to clear revoked tokens");
        }
        self.flow.lock().revoke();
        IntegrationError::TokenRevoked(reason)
    }
}

async fn parse_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiEnvelope<T>, IntegrationError> {
    let text = response
        .text()
        .await
        .map_err(|e| IntegrationError::Transport(format!("failed to read response body: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| IntegrationError::InvalidResponse(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hmac::{Hmac, Mac};
    use serde_json::json;
    use sha2::Sha256;
    use vioshop_core::InMemoryStore;
    use vioshop_domain::{Credentials, Region};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const APP_KEY: &str = "app-key";
    const APP_SECRET: &str = "app-secret";

    fn defaults() -> Credentials {
        Credentials {
            app_key: APP_KEY.into(),
            app_secret: APP_SECRET.into(),
            region: Region::BR,
            ..Credentials::default()
        }
    }

    fn test_client(server: &MockServer) -> (TikTokShopClient, Arc<CredentialStore>) {
        test_client_with(server, true)
    }

    fn test_client_with(
        server: &MockServer,
        search_signs_body: bool,
    ) -> (TikTokShopClient, Arc<CredentialStore>) {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");
        let config = PartnerConfig {
            open_api_base_url: server.uri(),
            auth_base_url: server.uri(),
            search_signs_body,
            ..PartnerConfig::default()
        };
        let store = Arc::new(CredentialStore::new(Arc::new(InMemoryStore::new()), defaults()));
        (TikTokShopClient::new(http_client, store.clone(), &config), store)
    }

    async fn authorize(store: &CredentialStore) {
        store
            .store_tokens(&TokenGrant::new("live-token", "refresh-1", 3600, Utc::now()))
            .await
            .unwrap();
    }

    fn expected_sign(query: &[(String, String)], body: &[u8]) -> String {
        let mut params: Vec<_> = query.iter().filter(|(k, _)| k != "sign").collect();
        params.sort();
        let mut message = format!("{APP_SECRET}{PRODUCT_SEARCH_PATH}");
        for (key, value) in params {
            message.push_str(key);
            message.push_str(value);
        }
        let mut mac = Hmac::<Sha256>::new_from_slice(APP_SECRET.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        mac.update(body);
        mac.update(APP_SECRET.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn search_response() -> serde_json::Value {
        json!({
            "code": 0,
            "message": "Success",
            "request_id": "req-1",
            "data": {
                "products": [
                    {
                        "id": "p-1",
                        "title": "Serum",
                        "main_images": [{ "url_list": ["https://img/p1.jpg"] }],
                        "price": { "sale_price": "59.90", "currency": "BRL" },
                        "commission": { "rate": "25" },
                        "sales": 12
                    },
                    {
                        "id": "p-2",
                        "title": "Brush",
                        "price": { "sale_price": "9.90", "currency": "BRL" },
                        "commission": { "rate": 5 }
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn search_without_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _) = test_client(&server);
        let result = client.search_products(&ProductFilters::keywords("lamp")).await;

        assert!(matches!(result, Err(IntegrationError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn search_signs_request_and_maps_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRODUCT_SEARCH_PATH))
            .and(header(ACCESS_TOKEN_HEADER, "live-token"))
            .and(query_param("app_key", APP_KEY))
            .and(query_param("shop_cipher", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;

        let products = client.search_products(&ProductFilters::keywords("serum")).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "p-1");
        assert_eq!(products[0].commission_rate, 25.0);
        assert_eq!(products[1].commission_rate, 5.0);

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        let query: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let sign = query.iter().find(|(k, _)| k == "sign").map(|(_, v)| v.clone()).unwrap();
        assert_eq!(sign, expected_sign(&query, &request.body));

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body, json!({ "page_size": 20, "status": "ACTIVATE", "title": "serum" }));
    }

    #[tokio::test]
    async fn search_can_leave_body_out_of_signature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRODUCT_SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client_with(&server, false);
        authorize(&store).await;
        client.search_products(&ProductFilters::keywords("serum")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let request = &requests[0];
        assert!(!request.body.is_empty());
        let query: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let sign = query.iter().find(|(k, _)| k == "sign").map(|(_, v)| v.clone()).unwrap();
        assert_eq!(sign, expected_sign(&query, b""));
        assert_ne!(sign, expected_sign(&query, &request.body));
    }

    #[tokio::test]
    async fn expired_session_can_authorize_again() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(TOKEN_GET_PATH))
            .and(query_param("auth_code", "code-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "success",
                "data": {
                    "access_token": "fresh-token",
                    "refresh_token": "fresh-refresh",
                    "access_token_expire_in": 3600
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;
        assert_eq!(client.restore_session().await, AuthState::Authorized);

        // The stored token lapses while the session is running.
        let issued = Utc::now() - chrono::Duration::hours(2);
        store.store_tokens(&TokenGrant::new("old-token", "refresh-1", 3600, issued)).await.unwrap();

        let result = client.search_products(&ProductFilters::default()).await;
        assert!(matches!(result, Err(IntegrationError::Unauthenticated(_))));
        assert_eq!(client.auth_state(), AuthState::NotAuthorized);

        client.begin_authorization(None).await.unwrap();
        assert_eq!(client.auth_state(), AuthState::Authorizing);

        let grant =
            client.exchange_authorization_code("code-2", APP_KEY, APP_SECRET).await.unwrap();
        assert_eq!(grant.access_token, "fresh-token");
        assert_eq!(client.auth_state(), AuthState::Authorized);
    }

    #[tokio::test]
    async fn exchange_after_expiry_skips_consent_step() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_GET_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "success",
                "data": { "access_token": "tok-3", "access_token_expire_in": 3600 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;
        client.restore_session().await;
        let issued = Utc::now() - chrono::Duration::hours(2);
        store.store_tokens(&TokenGrant::new("old-token", "refresh-1", 3600, issued)).await.unwrap();

        client.exchange_authorization_code("code-3", APP_KEY, APP_SECRET).await.unwrap();
        assert_eq!(client.auth_state(), AuthState::Authorized);
    }

    #[tokio::test]
    async fn search_applies_min_commission_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_response()))
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;

        let filters =
            ProductFilters { min_commission_rate: Some(10.0), ..ProductFilters::default() };
        let products = client.search_products(&filters).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p-1");
    }

    #[tokio::test]
    async fn search_surfaces_envelope_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 36009004,
                "message": "Invalid shop_cipher"
            })))
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;

        let result = client.search_products(&ProductFilters::default()).await;
        assert!(matches!(
            result,
            Err(IntegrationError::Api { code: 36009004, ref message })
                if message == "Invalid shop_cipher"
        ));
        assert!(store.resolve().await.credentials.access_token.is_some());
    }

    #[tokio::test]
    async fn revoked_token_clears_tokens_and_resets_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 105002,
                "message": "access token is invalid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;
        assert_eq!(client.restore_session().await, AuthState::Authorized);

        let result = client.search_products(&ProductFilters::default()).await;
        assert!(matches!(result, Err(IntegrationError::TokenRevoked(_))));
        assert_eq!(client.auth_state(), AuthState::NotAuthorized);
        assert!(store.resolve().await.credentials.access_token.is_none());
    }

    #[tokio::test]
    async fn http_401_is_treated_as_revocation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;

        let result = client.search_products(&ProductFilters::default()).await;
        assert!(matches!(result, Err(IntegrationError::TokenRevoked(_))));

        // No token left, so the next search fails locally.
        let again = client.search_products(&ProductFilters::default()).await;
        assert!(matches!(again, Err(IntegrationError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn exchange_stores_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_GET_PATH))
            .and(query_param("app_key", "k2"))
            .and(query_param("app_secret", "s2"))
            .and(query_param("auth_code", "code-1"))
            .and(query_param("grant_type", "authorized_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "message": "success",
                "data": {
                    "access_token": "tok",
                    "refresh_token": "ref",
                    "access_token_expire_in": 3600,
                    "seller_name": "Loja Teste"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        let grant = client.exchange_authorization_code("code-1", "k2", "s2").await.unwrap();
        assert_eq!(grant.expires_in, 3600);

        let resolved = store.resolve().await;
        assert_eq!(resolved.credentials.access_token.as_deref(), Some("tok"));
        assert_eq!(resolved.credentials.refresh_token.as_deref(), Some("ref"));
        assert_eq!(resolved.credentials.app_key, "k2");
        assert_eq!(resolved.credentials.seller_name.as_deref(), Some("Loja Teste"));
        assert!(!resolved.is_using_defaults);
        assert_eq!(client.auth_state(), AuthState::Authorized);
    }

    #[tokio::test]
    async fn failed_exchange_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_GET_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 36004004,
                "message": "auth code is expired"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        client.begin_authorization(Some("s")).await.unwrap();

        let result = client.exchange_authorization_code("stale", APP_KEY, APP_SECRET).await;
        assert!(matches!(
            result,
            Err(IntegrationError::AuthExchange(ref message)) if message == "auth code is expired"
        ));
        assert_eq!(client.auth_state(), AuthState::Failed);
        assert_eq!(
            client.last_auth_error().as_deref(),
            Some("Authorization code exchange failed: auth code is expired")
        );
        assert!(store.resolve().await.credentials.access_token.is_none());
    }

    #[tokio::test]
    async fn exchange_server_error_is_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let http_client =
            HttpClient::builder().max_attempts(3).base_backoff(Duration::ZERO).build().unwrap();
        let config = PartnerConfig { auth_base_url: server.uri(), ..PartnerConfig::default() };
        let store = Arc::new(CredentialStore::new(Arc::new(InMemoryStore::new()), defaults()));
        let client = TikTokShopClient::new(http_client, store, &config);

        let result = client.exchange_authorization_code("code", APP_KEY, APP_SECRET).await;
        assert!(matches!(result, Err(IntegrationError::AuthExchange(_))));
    }

    #[tokio::test]
    async fn refresh_replaces_stored_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_REFRESH_PATH))
            .and(query_param("refresh_token", "refresh-1"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {
                    "access_token": "fresh",
                    "refresh_token": "refresh-2",
                    "access_token_expire_in": 7200
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, store) = test_client(&server);
        authorize(&store).await;

        client.refresh_access_token().await.unwrap();
        let credentials = store.resolve().await.credentials;
        assert_eq!(credentials.access_token.as_deref(), Some("fresh"));
        assert_eq!(credentials.refresh_token.as_deref(), Some("refresh-2"));
        assert_eq!(client.auth_state(), AuthState::Authorized);
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_is_unauthenticated() {
        let server = MockServer::start().await;
        let (client, _) = test_client(&server);
        let result = client.refresh_access_token().await;
        assert!(matches!(result, Err(IntegrationError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn logout_clears_tokens_but_keeps_app_credentials() {
        let server = MockServer::start().await;
        let (client, store) = test_client(&server);
        store
            .persist(CredentialsPatch { app_key: Some("custom".into()), ..Default::default() })
            .await
            .unwrap();
        authorize(&store).await;
        client.restore_session().await;

        client.logout().await.unwrap();

        let credentials = store.resolve().await.credentials;
        assert_eq!(credentials.app_key, "custom");
        assert!(credentials.access_token.is_none());
        assert_eq!(client.auth_state(), AuthState::NotAuthorized);
    }

    #[tokio::test]
    async fn begin_authorization_builds_regional_url() {
        let server = MockServer::start().await;
        let (client, store) = test_client(&server);
        store
            .persist(CredentialsPatch { region: Some(Region::US), ..Default::default() })
            .await
            .unwrap();

        let url = client.begin_authorization(Some("nonce")).await.unwrap();
        assert_eq!(
            url,
            "https://services.us.tiktokshop.com/open/authorize?app_key=app-key&state=nonce"
        );
        assert_eq!(client.auth_state(), AuthState::Authorizing);
    }
}

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use vioshop_domain::VioShopError;

use crate::errors::InfraError;

/// Shared HTTP client for partner and media calls.
///
/// [`HttpClient::send`] retries transport failures and 5xx responses with a
/// doubling backoff. [`HttpClient::send_once`] performs exactly one attempt and
/// is used for calls that must not be repeated (job submission, OAuth grants).
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn new() -> Result<Self, VioShopError> {
        Self::builder().build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder`, retrying transient failures up to the configured
    /// attempt count.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, VioShopError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let cloned = builder.try_clone().ok_or_else(|| {
                VioShopError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            match self.execute(cloned, attempt).await {
                Ok(response) if response.status().is_server_error() && attempt < attempts => {
                    self.sleep_with_backoff(attempt).await;
                }
                Ok(response) => return Ok(response),
                Err(err) if attempt < attempts && should_retry_error(&err) => {
                    self.sleep_with_backoff(attempt).await;
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }
        }
    }

    /// Execute `builder` exactly once.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, VioShopError> {
        self.execute(builder, 1).await.map_err(|err| InfraError::from(err).into())
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        attempt: usize,
    ) -> Result<Response, reqwest::Error> {
        let request = builder.build()?;
        let method = request.method().clone();
        // Query strings carry secrets on the token endpoints.
        let path = request.url().path().to_string();
        debug!(attempt, %method, %path, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(attempt, %method, %path, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                let err = err.without_url();
                debug!(attempt, %method, %path, error = %err, "HTTP request failed");
                Err(err)
            }
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(250),
            user_agent: Some(concat!("vioshop/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts made by [`HttpClient::send`] (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, VioShopError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(InfraError::from)?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fast_client(attempts: usize) -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(attempts)
            .build()
            .expect("http client")
    }

    /// Responds with 500 for the first `failures` calls, then 200.
    fn flaky(failures: usize) -> impl Fn(&wiremock::Request) -> ResponseTemplate {
        let calls = Arc::new(AtomicUsize::new(0));
        move |_req: &wiremock::Request| {
            if calls.fetch_add(1, Ordering::SeqCst) < failures {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200)
            }
        }
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(flaky(2)).expect(3).mount(&server).await;

        let client = fast_client(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn returns_last_server_error_when_attempts_run_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(flaky(5)).expect(2).mount(&server).await;

        let client = fast_client(2);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn send_once_never_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(flaky(1)).expect(1).mount(&server).await;

        let client = fast_client(3);
        let response = client
            .send_once(client.request(Method::POST, server.uri()).body("{}"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = fast_client(2);
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;

        match result {
            Err(VioShopError::Network(msg)) => assert!(msg.to_lowercase().contains("http")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_request_error_omits_query_secrets() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = fast_client(1);
        let request = client
            .request(Method::GET, format!("http://{addr}/token"))
            .query(&[("app_secret", "top-secret")]);
        let err = client.send_once(request).await.unwrap_err();

        assert!(!err.to_string().contains("top-secret"));
    }
}

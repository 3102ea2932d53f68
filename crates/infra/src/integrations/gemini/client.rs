/// Generative Language API client for video jobs and script text
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;
use vioshop_core::{CredentialProvider, MediaProvider};
use vioshop_domain::constants::DEFAULT_RATE_LIMIT_RETRY_SECS;
use vioshop_domain::{
    GenerationOptions, IntegrationError, MediaAsset, MediaConfig, OperationHandle, PollStatus,
};

use super::types::{
    Content, ErrorBody, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Operation, PredictInstance, PredictParameters, PredictRequest, TextPart,
};
use crate::http::HttpClient;

const API_KEY_HEADER: &str = "x-goog-api-key";
const API_VERSION: &str = "v1beta";
const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// gRPC status codes used inside operation errors.
const GRPC_NOT_FOUND: i64 = 5;
const GRPC_RESOURCE_EXHAUSTED: i64 = 8;

/// Media provider backed by the Generative Language REST API.
///
/// The API key is read from the [`CredentialProvider`] on every request, so a
/// key re-selected after an entitlement failure is used by the retry.
pub struct GeminiClient {
    http_client: HttpClient,
    credentials: Arc<dyn CredentialProvider>,
    api_base_url: String,
    video_model: String,
    text_model: String,
}

impl GeminiClient {
    pub fn new(
        http_client: HttpClient,
        credentials: Arc<dyn CredentialProvider>,
        config: &MediaConfig,
    ) -> Self {
        Self {
            http_client,
            credentials,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            video_model: config.video_model.clone(),
            text_model: config.text_model.clone(),
        }
    }

    /// Generate text with the configured text model.
    ///
    /// # Errors
    /// Classified like every other call; an empty candidate list is
    /// `InvalidResponse`.
    pub async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, IntegrationError> {
        let key = self.api_key().await?;
        let url = format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.api_base_url, self.text_model
        );
        let payload = GenerateContentRequest {
            contents: [Content { parts: [TextPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature },
        };

        let request = self
            .http_client
            .request(Method::POST, url)
            .header(API_KEY_HEADER, key)
            .json(&payload);
        let response = self.http_client.send_once(request).await?;
        let response = ensure_success(response).await?;

        let body: GenerateContentResponse = parse_json(response).await?;

        body.text()
            .ok_or_else(|| IntegrationError::InvalidResponse("model returned no text".into()))
    }

    async fn api_key(&self) -> Result<String, IntegrationError> {
        self.credentials
            .current_key()
            .await
            .ok_or_else(|| IntegrationError::Unauthenticated("no media API key selected".into()))
    }
}

#[async_trait]
impl MediaProvider for GeminiClient {
    async fn submit(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<OperationHandle, IntegrationError> {
        let key = self.api_key().await?;
        let url = format!(
            "{}/{API_VERSION}/models/{}:predictLongRunning",
            self.api_base_url, self.video_model
        );
        let payload = PredictRequest {
            instances: [PredictInstance { prompt }],
            parameters: PredictParameters {
                aspect_ratio: options.aspect_ratio.as_str(),
                resolution: options.resolution.as_str(),
                number_of_videos: options.number_of_videos.max(1),
            },
        };

        let request = self
            .http_client
            .request(Method::POST, url)
            .header(API_KEY_HEADER, key)
            .json(&payload);
        let response = ensure_success(self.http_client.send_once(request).await?).await?;

        let operation: Operation = parse_json(response).await?;
        if operation.name.is_empty() {
            return Err(IntegrationError::InvalidResponse("operation has no name".into()));
        }

        info!(operation = %operation.name, model = %self.video_model, "video generation submitted");
        Ok(OperationHandle::new(operation.name))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<PollStatus, IntegrationError> {
        let key = self.api_key().await?;
        let url = format!("{}/{API_VERSION}/{}", self.api_base_url, handle.as_str());

        let request = self.http_client.request(Method::GET, url).header(API_KEY_HEADER, key);
        let response = ensure_success(self.http_client.send(request).await?).await?;

        let operation: Operation = parse_json(response).await?;
        debug!(operation = %handle, done = operation.done, "polled video operation");

        if let Some(status) = &operation.error {
            return match classify(status.code, status.status.as_deref(), &status.message, None) {
                err @ (IntegrationError::Entitlement(_) | IntegrationError::RateLimit { .. }) => {
                    Err(err)
                }
                _ => Ok(PollStatus::failed(status.code, status.message.clone())),
            };
        }

        if !operation.done {
            return Ok(PollStatus::pending());
        }

        Ok(match operation.video_uri() {
            Some(uri) => PollStatus::completed(uri),
            None => PollStatus { done: true, ..PollStatus::default() },
        })
    }

    async fn fetch_result(&self, uri: &str) -> Result<MediaAsset, IntegrationError> {
        let key = self.api_key().await?;
        let mut url = Url::parse(uri)
            .map_err(|e| IntegrationError::InvalidResponse(format!("invalid result URI: {e}")))?;
        url.query_pairs_mut().append_pair("key", &key);

        let request = self.http_client.request(Method::GET, url);
        let response = ensure_success(self.http_client.send(request).await?).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| IntegrationError::Transport(format!("failed to download asset: {e}")))?;

        info!(len = bytes.len(), "video asset downloaded");
        Ok(MediaAsset { bytes: bytes.to_vec(), content_type, source_uri: uri.to_string() })
    }
}

/// Pass a 2xx response through, classify anything else.
async fn ensure_success(response: Response) -> Result<Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    let (rpc_status, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error.status, body.error.message),
        Err(_) => (None, text),
    };

    Err(classify(Some(i64::from(status.as_u16())), rpc_status.as_deref(), &message, retry_after))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, IntegrationError> {
    let text = response
        .text()
        .await
        .map_err(|e| IntegrationError::Transport(format!("failed to read response body: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| IntegrationError::InvalidResponse(format!("Failed to parse response: {e}")))
}

/// Map an HTTP or RPC error onto the integration taxonomy.
///
/// Entitlement is checked first: the API reports a model the key may not use
/// as "not found".
fn classify(
    code: Option<i64>,
    rpc_status: Option<&str>,
    message: &str,
    retry_after: Option<Duration>,
) -> IntegrationError {
    let lower = message.to_ascii_lowercase();

    if matches!(code, Some(404) | Some(GRPC_NOT_FOUND))
        || rpc_status == Some("NOT_FOUND")
        || message.contains(ENTITY_NOT_FOUND)
    {
        return IntegrationError::Entitlement(message.to_string());
    }

    if matches!(code, Some(429) | Some(GRPC_RESOURCE_EXHAUSTED))
        || rpc_status == Some("RESOURCE_EXHAUSTED")
        || lower.contains("quota")
        || message.contains("RESOURCE_EXHAUSTED")
    {
        return IntegrationError::RateLimit {
            retry_after: retry_after
                .unwrap_or(Duration::from_secs(DEFAULT_RATE_LIMIT_RETRY_SECS)),
            message: message.to_string(),
        };
    }

    match code {
        Some(401) | Some(403) => IntegrationError::Unauthenticated(message.to_string()),
        _ => IntegrationError::Api { code: code.unwrap_or_default(), message: message.to_string() },
    }
}

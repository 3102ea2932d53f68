/// Generative Language API integration
///
/// Long-running video generation (`predictLongRunning`), operation polling,
/// authenticated result download and plain text generation for scripts.
///
/// # Usage
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tokio_util::sync::CancellationToken;
/// use vioshop_core::{MediaJobRunner, PollPolicy};
/// use vioshop_domain::{GenerationOptions, MediaConfig};
/// use vioshop_infra::credentials::StaticKeyProvider;
/// use vioshop_infra::http::HttpClient;
/// use vioshop_infra::integrations::gemini::GeminiClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MediaConfig::default();
/// let keys = Arc::new(StaticKeyProvider::new(Some("api-key".into())));
/// let client = Arc::new(GeminiClient::new(HttpClient::new()?, keys.clone(), &config));
///
/// let runner = MediaJobRunner::new(client, keys, PollPolicy::from(&config));
/// let cancel = CancellationToken::new();
/// let options = GenerationOptions::default();
/// let asset = runner.generate("A ring light on a desk", &options, &cancel).await?;
/// println!("Downloaded {} bytes", asset.bytes.len());
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - **404 or "Requested entity was not found"**: `Entitlement`, handled by
///   the job runner's single reselection retry
/// - **429 / quota / `RESOURCE_EXHAUSTED`**: `RateLimit`, `Retry-After` or 60s
/// - **401/403 or no key selected**: `Unauthenticated`
/// - **Operation finished with an error**: reported as a failed `PollStatus`
pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::{ApiStatus, Operation};

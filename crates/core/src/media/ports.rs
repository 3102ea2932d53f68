//! Port interfaces for the generative-media provider and its credential

use async_trait::async_trait;
use vioshop_domain::{GenerationOptions, IntegrationError, MediaAsset, OperationHandle, PollStatus};

/// Trait for an asynchronous submit/poll/fetch media API
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Submit a generation request and return the operation handle
    async fn submit(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<OperationHandle, IntegrationError>;

    /// Check the status of a submitted operation
    async fn poll(&self, handle: &OperationHandle) -> Result<PollStatus, IntegrationError>;

    /// Download the finished asset
    async fn fetch_result(&self, uri: &str) -> Result<MediaAsset, IntegrationError>;
}

/// Capability that supplies (and can re-select) the media API credential.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The credential currently selected, if any
    async fn current_key(&self) -> Option<String>;

    async fn has_key(&self) -> bool {
        self.current_key().await.is_some()
    }

    /// Ask the user to select a (different) credential.
    ///
    /// Returns `Ok(true)` when a credential was selected and a retry makes
    /// sense, `Ok(false)` when the user declined.
    async fn prompt_for_key(&self) -> Result<bool, IntegrationError>;
}

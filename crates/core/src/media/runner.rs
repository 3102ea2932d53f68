//! Submit, poll and fetch driver for media jobs

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use vioshop_domain::constants::MAX_CREDENTIAL_RESELECTIONS;
use vioshop_domain::{GenerationOptions, IntegrationError, MediaAsset, MediaConfig, MediaJobState};

use super::job::MediaJob;
use super::ports::{CredentialProvider, MediaProvider};

/// Bounds for the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each poll.
    pub interval: Duration,
    /// Maximum number of polls before giving up.
    pub max_polls: u32,
    /// Optional wall-clock bound measured from the start of polling.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&MediaConfig::default())
    }
}

impl From<&MediaConfig> for PollPolicy {
    fn from(config: &MediaConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_polls: config.max_polls.max(1),
            max_wait: config.max_wait(),
        }
    }
}

/// Runs media jobs against a [`MediaProvider`].
pub struct MediaJobRunner {
    provider: Arc<dyn MediaProvider>,
    credentials: Arc<dyn CredentialProvider>,
    policy: PollPolicy,
}

impl MediaJobRunner {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        credentials: Arc<dyn CredentialProvider>,
        policy: PollPolicy,
    ) -> Self {
        Self { provider, credentials, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Generate an asset: submit, poll until done, fetch.
    ///
    /// An [`IntegrationError::Entitlement`] failure prompts the credential
    /// provider for a new key and retries the whole generation, at most
    /// `MAX_CREDENTIAL_RESELECTIONS` times. Any other error, or a declined
    /// prompt, is returned as is.
    #[instrument(skip(self, prompt, cancel), fields(prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        cancel: &CancellationToken,
    ) -> Result<MediaAsset, IntegrationError> {
        let mut reselections_left = MAX_CREDENTIAL_RESELECTIONS;

        loop {
            match self.generate_once(prompt, options, cancel).await {
                Err(err) if err.triggers_reselection() && reselections_left > 0 => {
                    reselections_left -= 1;
                    warn!(error = %err, "media credential lacks entitlement, requesting reselection");
                    if !self.credentials.prompt_for_key().await? {
                        return Err(err);
                    }
                }
                other => return other,
            }
        }
    }

    /// Submit a new job. Never retried.
    pub async fn submit(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<MediaJob, IntegrationError> {
        if !self.credentials.has_key().await {
            return Err(IntegrationError::Unauthenticated("no media API key selected".into()));
        }

        let handle = self.provider.submit(prompt, options).await?;
        info!(operation = %handle, "media job submitted");
        Ok(MediaJob::submitted(handle))
    }

    /// Poll `job` until it finishes, the policy bound is hit or `cancel` fires.
    ///
    /// Returns the result URI of a `DONE` job. Cancellation stops polling but
    /// leaves the provider-side operation alone.
    pub async fn run_job(
        &self,
        job: &mut MediaJob,
        cancel: &CancellationToken,
    ) -> Result<String, IntegrationError> {
        job.start_polling();
        let started = Instant::now();

        loop {
            let waited = started.elapsed();
            let over_wait = self.policy.max_wait.is_some_and(|max| waited >= max);
            if job.polls() >= self.policy.max_polls || over_wait {
                let err = IntegrationError::Timeout { polls: job.polls(), waited };
                job.fail(err.clone());
                return Err(err);
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(job)),
                () = tokio::time::sleep(self.policy.interval) => {}
            }

            let status = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(job)),
                status = self.provider.poll(job.handle()) => status,
            };

            match status {
                Ok(status) => match job.record_poll(status) {
                    MediaJobState::Done => {
                        info!(operation = %job.handle(), polls = job.polls(), "media job done");
                        return job.result_uri().map(str::to_string).ok_or_else(|| {
                            IntegrationError::InvalidResponse("missing result URI".into())
                        });
                    }
                    MediaJobState::Failed => {
                        return Err(job.last_error().cloned().unwrap_or_else(|| {
                            IntegrationError::InvalidResponse("job failed without error".into())
                        }));
                    }
                    MediaJobState::Submitted | MediaJobState::Polling => {}
                },
                Err(err) => {
                    job.fail(err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// Download the asset for a finished job.
    pub async fn fetch(&self, uri: &str) -> Result<MediaAsset, IntegrationError> {
        self.provider.fetch_result(uri).await
    }

    async fn generate_once(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        cancel: &CancellationToken,
    ) -> Result<MediaAsset, IntegrationError> {
        if cancel.is_cancelled() {
            return Err(IntegrationError::Cancelled);
        }

        let mut job = self.submit(prompt, options).await?;
        let uri = self.run_job(&mut job, cancel).await?;
        self.fetch(&uri).await
    }
}

fn cancelled(job: &mut MediaJob) -> IntegrationError {
    info!(operation = %job.handle(), polls = job.polls(), "media job polling cancelled");
    job.fail(IntegrationError::Cancelled);
    IntegrationError::Cancelled
}

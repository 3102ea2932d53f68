//! Media job state machine

use std::time::{Duration, Instant};

use tracing::debug;
use vioshop_domain::{IntegrationError, MediaJobState, OperationHandle, PollStatus};

/// One submitted generation, owned by the caller that submitted it.
///
/// `result_uri` is only set in `Done`, `last_error` only in `Failed`.
#[derive(Debug, Clone)]
pub struct MediaJob {
    state: MediaJobState,
    handle: OperationHandle,
    result_uri: Option<String>,
    last_error: Option<IntegrationError>,
    polls: u32,
    submitted_at: Instant,
}

impl MediaJob {
    pub fn submitted(handle: OperationHandle) -> Self {
        Self {
            state: MediaJobState::Submitted,
            handle,
            result_uri: None,
            last_error: None,
            polls: 0,
            submitted_at: Instant::now(),
        }
    }

    pub fn state(&self) -> MediaJobState {
        self.state
    }

    pub fn handle(&self) -> &OperationHandle {
        &self.handle
    }

    pub fn result_uri(&self) -> Option<&str> {
        self.result_uri.as_deref()
    }

    pub fn last_error(&self) -> Option<&IntegrationError> {
        self.last_error.as_ref()
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn elapsed(&self) -> Duration {
        self.submitted_at.elapsed()
    }

    /// `SUBMITTED -> POLLING`. No-op in any other state.
    pub fn start_polling(&mut self) {
        if self.state == MediaJobState::Submitted {
            self.state = MediaJobState::Polling;
        }
    }

    /// Apply one poll result and return the new state.
    pub fn record_poll(&mut self, status: PollStatus) -> MediaJobState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.state = MediaJobState::Polling;
        self.polls += 1;

        if !status.done {
            debug!(operation = %self.handle, polls = self.polls, "media job still running");
            return self.state;
        }

        match (status.result_uri, status.error) {
            (_, Some(failure)) => self.fail(IntegrationError::Api {
                code: failure.code.unwrap_or_default(),
                message: failure.message,
            }),
            (Some(uri), None) if !uri.is_empty() => {
                self.result_uri = Some(uri);
                self.state = MediaJobState::Done;
            }
            _ => self.fail(IntegrationError::InvalidResponse(
                "operation finished without a result URI".into(),
            )),
        }
        self.state
    }

    /// Move to `FAILED` with `error`. Ignored once terminal.
    pub fn fail(&mut self, error: IntegrationError) {
        if self.state.is_terminal() {
            return;
        }
        debug!(operation = %self.handle, error = %error, "media job failed");
        self.state = MediaJobState::Failed;
        self.last_error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> MediaJob {
        MediaJob::submitted(OperationHandle::new("operations/abc"))
    }

    #[test]
    fn pending_polls_stay_in_polling() {
        let mut job = job();
        assert_eq!(job.state(), MediaJobState::Submitted);
        job.start_polling();

        assert_eq!(job.record_poll(PollStatus::pending()), MediaJobState::Polling);
        assert_eq!(job.record_poll(PollStatus::pending()), MediaJobState::Polling);
        assert_eq!(job.polls(), 2);
        assert!(job.result_uri().is_none());
    }

    #[test]
    fn completion_sets_result_uri() {
        let mut job = job();
        job.start_polling();
        assert_eq!(job.record_poll(PollStatus::completed("https://x/v.mp4")), MediaJobState::Done);
        assert_eq!(job.result_uri(), Some("https://x/v.mp4"));
        assert!(job.last_error().is_none());
    }

    #[test]
    fn provider_error_fails_job() {
        let mut job = job();
        job.start_polling();
        let state = job.record_poll(PollStatus::failed(Some(3), "unsafe prompt"));
        assert_eq!(state, MediaJobState::Failed);
        assert!(matches!(
            job.last_error(),
            Some(IntegrationError::Api { code: 3, message }) if message == "unsafe prompt"
        ));
        assert!(job.result_uri().is_none());
    }

    #[test]
    fn done_without_uri_is_invalid_response() {
        let mut job = job();
        job.start_polling();
        let status = PollStatus { done: true, ..PollStatus::default() };
        assert_eq!(job.record_poll(status), MediaJobState::Failed);
        assert!(matches!(job.last_error(), Some(IntegrationError::InvalidResponse(_))));
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut job = job();
        job.start_polling();
        job.record_poll(PollStatus::completed("uri"));
        job.fail(IntegrationError::Cancelled);
        assert_eq!(job.state(), MediaJobState::Done);
        assert_eq!(job.record_poll(PollStatus::pending()), MediaJobState::Done);
        assert_eq!(job.polls(), 1);
    }
}

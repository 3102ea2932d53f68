//! Asynchronous generative-media jobs
//!
//! A generation runs as submit, then a bounded polling loop, then a single
//! fetch of the finished asset. [`MediaJobRunner`] drives that sequence over
//! the [`MediaProvider`] port and owns the one sanctioned automatic retry:
//! after an entitlement failure the user may reselect a credential through
//! [`CredentialProvider`], and the generation is retried at most once.

pub mod job;
pub mod ports;
pub mod prompts;
pub mod runner;

pub use job::MediaJob;
pub use ports::{CredentialProvider, MediaProvider};
pub use prompts::{business_description_prompt, script_prompt, video_prompt};
pub use runner::{MediaJobRunner, PollPolicy};

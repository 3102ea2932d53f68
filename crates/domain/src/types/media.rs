//! Generative-media job types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "1080p")]
    FullHd,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hd => "720p",
            Self::FullHd => "1080p",
        }
    }
}

/// Options sent with a media generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub number_of_videos: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Portrait,
            resolution: Resolution::Hd,
            number_of_videos: 1,
        }
    }
}

/// Opaque operation name returned by the provider on submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal failure reported by the provider inside a poll response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub code: Option<i64>,
    pub message: String,
}

/// Result of a single poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStatus {
    pub done: bool,
    pub result_uri: Option<String>,
    pub error: Option<ProviderFailure>,
}

impl PollStatus {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn completed(uri: impl Into<String>) -> Self {
        Self { done: true, result_uri: Some(uri.into()), error: None }
    }

    pub fn failed(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            done: true,
            result_uri: None,
            error: Some(ProviderFailure { code, message: message.into() }),
        }
    }
}

/// Lifecycle of a media job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaJobState {
    Submitted,
    Polling,
    Done,
    Failed,
}

/// Output language for generated copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl_domain_status_conversions!(Language {
    Pt => "pt",
    En => "en",
});

impl_domain_status_conversions!(MediaJobState {
    Submitted => "submitted",
    Polling => "polling",
    Done => "done",
    Failed => "failed",
});

impl MediaJobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Binary asset downloaded from a completed job.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub source_uri: String,
}

impl fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaAsset")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("source_uri", &self.source_uri)
            .finish()
    }
}

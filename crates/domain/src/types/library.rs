//! Saved video projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pitch {
    Low,
    #[default]
    Neutral,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intonation {
    Neutral,
    Excited,
    #[default]
    Persuasive,
    Energetic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub pitch: Pitch,
    pub speed: Speed,
    pub intonation: Intonation,
}

/// A configured (and possibly generated) product video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProject {
    pub id: String,
    pub product_id: String,
    pub avatar_id: String,
    pub voice_id: String,
    pub scene_id: String,
    pub script: String,
    pub voice_config: VoiceConfig,
    pub generated_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VideoProject {
    pub fn new(
        product_id: impl Into<String>,
        avatar_id: impl Into<String>,
        voice_id: impl Into<String>,
        scene_id: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            avatar_id: avatar_id.into(),
            voice_id: voice_id.into(),
            scene_id: scene_id.into(),
            script: script.into(),
            voice_config: VoiceConfig::default(),
            generated_url: None,
            created_at: Utc::now(),
        }
    }
}

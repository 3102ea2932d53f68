//! Script and video generation commands

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;
use vioshop_core::media::{business_description_prompt, script_prompt, video_prompt};
use vioshop_domain::constants::{DESCRIPTION_TEMPERATURE, SCRIPT_TEMPERATURE};
use vioshop_domain::{GenerationOptions, IntegrationError, Language, MediaAsset, Product};

use super::finish;
use crate::context::AppContext;

/// Write a short sales script for `product`.
pub async fn generate_script(
    ctx: &AppContext,
    product: &Product,
    category: Option<&str>,
) -> Result<String, IntegrationError> {
    let start = Instant::now();
    let prompt = script_prompt(product, category);
    let result = ctx.media_client.generate_text(&prompt, SCRIPT_TEMPERATURE).await;
    finish("media::generate_script", start, &result);
    result
}

/// Write the partner agency's profile description in `language`.
pub async fn generate_business_description(
    ctx: &AppContext,
    language: Language,
) -> Result<String, IntegrationError> {
    let start = Instant::now();
    let prompt = business_description_prompt(language);
    let result = ctx.media_client.generate_text(prompt, DESCRIPTION_TEMPERATURE).await;
    finish("media::generate_business_description", start, &result);
    result
}

/// Render a video from `script` and download it.
///
/// Runs the full submit, poll and fetch cycle, including the single retry
/// after a credential reselection. Cancelling `cancel` stops polling.
pub async fn generate_asset(
    ctx: &AppContext,
    script: &str,
    options: &GenerationOptions,
    cancel: &CancellationToken,
) -> Result<MediaAsset, IntegrationError> {
    let start = Instant::now();
    let result = ctx.media.generate(&video_prompt(script), options, cancel).await;
    if let Ok(asset) = &result {
        info!(len = asset.bytes.len(), "video generated");
    }
    finish("media::generate_asset", start, &result);
    result
}

//! Saved partner credential commands

use std::time::Instant;

use tracing::info;
use vioshop_domain::{Credentials, CredentialsPatch, ResolvedCredentials, Result};

use super::finish;
use crate::context::AppContext;
use crate::utils::log_command_execution;

/// Stored credentials merged over the configured defaults.
pub async fn get_saved_credentials(ctx: &AppContext) -> ResolvedCredentials {
    let start = Instant::now();
    let resolved = ctx.credentials.resolve().await;
    log_command_execution("credentials::get_saved_credentials", start.elapsed(), true);
    resolved
}

/// Merge `patch` into the stored record and re-derive the OAuth state from
/// the result.
pub async fn save_credentials(ctx: &AppContext, patch: CredentialsPatch) -> Result<Credentials> {
    let command_name = "credentials::save_credentials";
    let start = Instant::now();

    let result = ctx.credentials.persist(patch).await;
    if result.is_ok() {
        ctx.partner.restore_session().await;
    }

    finish(command_name, start, &result);
    result
}

/// Forget every stored override, tokens included.
pub async fn clear_credentials(ctx: &AppContext) -> Result<()> {
    let command_name = "credentials::clear_credentials";
    let start = Instant::now();

    let result = ctx.credentials.clear().await;
    if result.is_ok() {
        let state = ctx.partner.restore_session().await;
        info!(auth_state = %state, "credentials reverted to defaults");
    }

    finish(command_name, start, &result);
    result
}

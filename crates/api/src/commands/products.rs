//! Partner API commands: seller authorization and product search

use std::time::Instant;

use vioshop_domain::{IntegrationError, Product, ProductFilters, TokenGrant};

use super::finish;
use crate::context::AppContext;

/// Consent URL for the configured app. `state` is echoed on the redirect.
pub async fn build_authorization_url(
    ctx: &AppContext,
    state: Option<&str>,
) -> Result<String, IntegrationError> {
    let start = Instant::now();
    let result = ctx.partner.begin_authorization(state).await;
    finish("products::build_authorization_url", start, &result);
    result
}

pub async fn search_products(
    ctx: &AppContext,
    filters: &ProductFilters,
) -> Result<Vec<Product>, IntegrationError> {
    let start = Instant::now();
    let result = ctx.partner.search_products(filters).await;
    finish("products::search_products", start, &result);
    result
}

/// Trade the code from the consent redirect for tokens.
pub async fn exchange_authorization_code(
    ctx: &AppContext,
    code: &str,
    app_key: &str,
    app_secret: &str,
) -> Result<TokenGrant, IntegrationError> {
    let start = Instant::now();
    let result = ctx.partner.exchange_authorization_code(code, app_key, app_secret).await;
    finish("products::exchange_authorization_code", start, &result);
    result
}

pub async fn refresh_access_token(ctx: &AppContext) -> Result<TokenGrant, IntegrationError> {
    let start = Instant::now();
    let result = ctx.partner.refresh_access_token().await;
    finish("products::refresh_access_token", start, &result);
    result
}

pub async fn logout(ctx: &AppContext) -> Result<(), IntegrationError> {
    let start = Instant::now();
    let result = ctx.partner.logout().await;
    finish("products::logout", start, &result);
    result
}

//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Partner commerce API
pub const DEFAULT_OPEN_API_BASE_URL: &str = "https://open-api.tiktokglobalshop.com";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://auth.tiktok-shops.com";
pub const PRODUCT_SEARCH_PATH: &str = "/product/202309/products/search";
pub const TOKEN_GET_PATH: &str = "/api/v2/token/get";
pub const TOKEN_REFRESH_PATH: &str = "/api/v2/token/refresh";
pub const ACCESS_TOKEN_HEADER: &str = "x-tts-access-token";
pub const PRODUCT_SEARCH_PAGE_SIZE: u32 = 20;
pub const PRODUCT_VIEW_URL: &str = "https://shop.tiktok.com/view/product";

/// Commission rate (percent) assumed when the partner payload omits one.
///
/// The product search endpoint does not carry affiliate commission data, so
/// this is an approximation rather than a provider value.
pub const DEFAULT_COMMISSION_RATE: f64 = 20.0;

/// Envelope codes the partner API uses for expired or invalid access tokens.
pub const REVOKED_TOKEN_CODES: &[i64] = &[105_001, 105_002];

// Generative media API
pub const DEFAULT_MEDIA_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_MAX_POLLS: u32 = 60;
pub const DEFAULT_RATE_LIMIT_RETRY_SECS: u64 = 60;
pub const SCRIPT_TEMPERATURE: f32 = 0.85;
pub const DESCRIPTION_TEMPERATURE: f32 = 1.0;
pub const VIDEO_PROMPT_SCRIPT_CHARS: usize = 150;

/// Automatic retries allowed after the user reselects a media credential.
pub const MAX_CREDENTIAL_RESELECTIONS: u32 = 1;

// Local key-value storage keys
pub const API_CONFIG_KEY: &str = "vioshop_api_config";
pub const SAVED_PRODUCTS_KEY: &str = "vioshop_saved_products";
pub const VIDEO_HISTORY_KEY: &str = "vioshop_video_history";
pub const MEDIA_API_KEY_KEY: &str = "vioshop_media_api_key";

// Keychain
pub const KEYCHAIN_SERVICE_NAME: &str = "vioshop";

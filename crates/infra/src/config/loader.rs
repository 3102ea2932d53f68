//! Configuration loader
//!
//! Builds an [`AppConfig`] from an optional config file and environment
//! overrides.
//!
//! ## Loading Strategy
//! 1. Load the file at the explicit path, or the first probed config file
//! 2. Fall back to [`AppConfig::default`] when no file exists
//! 3. Apply `VIOSHOP_*` environment overrides on top
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `VIOSHOP_APP_KEY`, `VIOSHOP_APP_SECRET`: default partner credentials
//! - `VIOSHOP_REGION`: default partner region (e.g. `BR`, `US`)
//! - `VIOSHOP_OPEN_API_BASE_URL`, `VIOSHOP_AUTH_BASE_URL`: partner endpoints
//! - `VIOSHOP_SEARCH_SIGNS_BODY`: sign the product search body (true/false)
//! - `VIOSHOP_MEDIA_API_KEY` (or `GEMINI_API_KEY`): media API key
//! - `VIOSHOP_MEDIA_BASE_URL`: media API endpoint
//! - `VIOSHOP_VIDEO_MODEL`, `VIOSHOP_TEXT_MODEL`: model identifiers
//! - `VIOSHOP_POLL_INTERVAL_SECS`, `VIOSHOP_MAX_POLLS`, `VIOSHOP_MAX_WAIT_SECS`:
//!   media job polling bounds
//! - `VIOSHOP_STORAGE_BACKEND`: `file`, `keychain` or `memory`
//! - `VIOSHOP_STORAGE_PATH`: store file for the `file` backend
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./vioshop.toml`, `./vioshop.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use vioshop_domain::{AppConfig, Region, Result, StorageBackend, VioShopError};

const CONFIG_FILE_NAMES: [&str; 4] = ["vioshop.toml", "vioshop.json", "config.toml", "config.json"];

/// Load configuration from the probed config file (or defaults) plus
/// environment overrides.
///
/// # Errors
/// Returns `VioShopError::Config` if a config file is malformed, an override
/// has an invalid value, or the merged configuration fails validation.
pub fn load() -> Result<AppConfig> {
    load_with_path(None)
}

/// Like [`load`], but reads `path` instead of probing when it is given.
///
/// # Errors
/// Returns `VioShopError::Config` if `path` does not exist or any step of
/// [`load`] fails.
pub fn load_with_path(path: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                AppConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from defaults plus environment overrides only.
///
/// # Errors
/// Returns `VioShopError::Config` for invalid override values.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `VioShopError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) if p.exists() => p,
        Some(p) => {
            return Err(VioShopError::Config(format!("Config file not found: {}", p.display())))
        }
        None => probe_config_paths().ok_or_else(|| {
            VioShopError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VioShopError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VioShopError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VioShopError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VioShopError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Return the first existing config file in the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
        roots.push(cwd.join("../.."));
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Apply every `VIOSHOP_*` variable that is set onto `config`.
///
/// # Errors
/// Returns `VioShopError::Config` when a variable holds an unparseable value.
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    let partner = &mut config.partner;
    if let Some(value) = env_var("VIOSHOP_APP_KEY") {
        partner.app_key = value;
    }
    if let Some(value) = env_var("VIOSHOP_APP_SECRET") {
        partner.app_secret = value;
    }
    if let Some(region) = env_parse::<Region>("VIOSHOP_REGION")? {
        partner.region = region;
    }
    if let Some(value) = env_var("VIOSHOP_OPEN_API_BASE_URL") {
        partner.open_api_base_url = value;
    }
    if let Some(value) = env_var("VIOSHOP_AUTH_BASE_URL") {
        partner.auth_base_url = value;
    }
    partner.search_signs_body = env_bool("VIOSHOP_SEARCH_SIGNS_BODY", partner.search_signs_body);

    let media = &mut config.media;
    if let Some(key) = env_var("VIOSHOP_MEDIA_API_KEY").or_else(|| env_var("GEMINI_API_KEY")) {
        media.api_key = Some(key);
    }
    if let Some(value) = env_var("VIOSHOP_MEDIA_BASE_URL") {
        media.api_base_url = value;
    }
    if let Some(value) = env_var("VIOSHOP_VIDEO_MODEL") {
        media.video_model = value;
    }
    if let Some(value) = env_var("VIOSHOP_TEXT_MODEL") {
        media.text_model = value;
    }
    if let Some(secs) = env_parse::<u64>("VIOSHOP_POLL_INTERVAL_SECS")? {
        media.poll_interval_secs = secs;
    }
    if let Some(polls) = env_parse::<u32>("VIOSHOP_MAX_POLLS")? {
        media.max_polls = polls;
    }
    if let Some(secs) = env_parse::<u64>("VIOSHOP_MAX_WAIT_SECS")? {
        media.max_wait_secs = Some(secs);
    }

    let storage = &mut config.storage;
    if let Some(backend) = env_parse::<StorageBackend>("VIOSHOP_STORAGE_BACKEND")? {
        storage.backend = backend;
    }
    if let Some(value) = env_var("VIOSHOP_STORAGE_PATH") {
        storage.path = value;
    }

    Ok(())
}

/// Non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Returns `default` if the variable is not set.
fn env_bool(key: &str, default: bool) -> bool {
    env_var(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| VioShopError::Config(format!("Invalid value for {key} ({raw}): {e}")))
        })
        .transpose()
}

//! Configuration loading
//!
//! Reads [`vioshop_domain::AppConfig`] from a config file and `VIOSHOP_*`
//! environment variables.

pub mod loader;

pub use loader::{
    apply_env_overrides, load, load_from_env, load_from_file, load_with_path, probe_config_paths,
};

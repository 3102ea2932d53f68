//! # VioShop Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client
//! - TikTok Shop and Generative Language API clients
//! - File, keychain and in-memory key-value stores
//! - Media API key providers
//! - Configuration loading (file + environment)
//!
//! ## Architecture
//! - Implements traits defined in `vioshop-core`
//! - Depends on `vioshop-domain` and `vioshop-core`
//! - Contains all "impure" code (network, filesystem, OS keychain)

pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod storage;

// Re-export commonly used items
pub use credentials::{KeyPrompt, StaticKeyProvider, StoredKeyProvider};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::gemini::GeminiClient;
pub use integrations::tiktok::TikTokShopClient;
pub use storage::{open_store, FileStore, KeychainStore};

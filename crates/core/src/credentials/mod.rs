//! Credential storage and configuration resolution
//!
//! [`CredentialStore`] owns the single persisted credentials record and
//! resolves the effective configuration by merging it over compiled-in
//! defaults.

pub mod store;

pub use store::CredentialStore;

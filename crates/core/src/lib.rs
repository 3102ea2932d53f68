//! # VioShop Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Request signing for the partner Open API
//! - Credential storage and configuration resolution
//! - The OAuth flow and media job state machines
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `vioshop-domain`
//! - No HTTP, filesystem or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod credentials;
pub mod library;
pub mod media;
pub mod signing;
pub mod storage;

// Re-export specific items to avoid ambiguity
pub use auth::AuthFlow;
pub use credentials::CredentialStore;
pub use library::Library;
pub use media::{CredentialProvider, MediaJob, MediaJobRunner, MediaProvider, PollPolicy};
pub use signing::{BodySigning, RequestSigner, SignedRequest};
pub use storage::{InMemoryStore, KeyValueStore};

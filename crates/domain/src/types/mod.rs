//! Domain types and models

pub mod auth;
pub mod credentials;
pub mod library;
pub mod media;
pub mod product;

pub use auth::AuthState;
pub use credentials::{Credentials, CredentialsPatch, Region, ResolvedCredentials, TokenGrant};
pub use library::{Intonation, Pitch, Speed, VideoProject, VoiceConfig};
pub use media::{
    AspectRatio, GenerationOptions, Language, MediaAsset, MediaJobState, OperationHandle, PollStatus,
    ProviderFailure, Resolution,
};
pub use product::{Price, Product, ProductFilters};

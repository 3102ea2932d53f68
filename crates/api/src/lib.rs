//! # VioShop App
//!
//! Application layer - context wiring and the command surface.
//!
//! This crate contains:
//! - Command functions (credentials, products, media, library)
//! - Application context (dependency injection)
//! - Tracing setup and command logging
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Callers (a UI shell, a CLI) hold one `AppContext` and invoke commands

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::init_tracing;

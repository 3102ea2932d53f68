//! Local key-value storage port
//!
//! Credentials, saved products and video history all persist through this
//! port. The backing (file, OS keychain, memory) is chosen by the
//! application; the core only sees [`KeyValueStore`].

pub mod memory;
pub mod ports;

pub use memory::InMemoryStore;
pub use ports::KeyValueStore;

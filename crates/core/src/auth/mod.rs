//! Partner OAuth flow state machine
//!
//! ```text
//! NOT_AUTHORIZED -> AUTHORIZING -> EXCHANGING -> AUTHORIZED
//!                                             \-> FAILED
//! ```
//!
//! `AUTHORIZED` holds until an explicit logout or a detected token
//! revocation, both of which return to `NOT_AUTHORIZED`.

pub mod flow;

pub use flow::AuthFlow;

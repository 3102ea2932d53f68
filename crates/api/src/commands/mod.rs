//! Command functions - the local configuration and generation surface
//!
//! Every command takes the [`AppContext`](crate::AppContext), delegates to
//! one service and logs its outcome with
//! [`log_command_execution`](crate::utils::log_command_execution).

mod credentials;
mod library;
mod media;
mod products;

use std::fmt::Display;
use std::time::Instant;

use tracing::warn;

pub use credentials::*;
pub use library::*;
pub use media::*;
pub use products::*;

use crate::utils::{error_label, log_command_execution, ErrorLabel};

/// Log the outcome of `result` for `command` started at `start`.
fn finish<T, E>(command: &str, start: Instant, result: &Result<T, E>)
where
    E: ErrorLabel + Display,
{
    if let Err(err) = result {
        warn!(command, error_type = error_label(err), error = %err, "command failed");
    }
    log_command_execution(command, start.elapsed(), result.is_ok());
}

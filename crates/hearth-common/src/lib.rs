//! # Hearth Common
//!
//! Shared types, utilities, and common functionality for Hearth Bot.
//!
//! This crate provides the snowflake id newtypes, the application-wide error
//! type, color parsing and the logging bootstrap used by every other crate in
//! the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::HearthError;
pub use logging::{init_logging, LogGuard, LoggingConfig};
pub use types::*;
pub use utils::*;

//! # Hearth Bot
//!
//! Multi-tenant Discord community automation bot.
//!
//! This is the main binary crate that wires settings, logging, the tenant
//! configuration store and the Poise framework together and runs the client
//! until it is shut down.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;

pub use bot::*;
pub use error::*;

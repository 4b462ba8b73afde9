//! # Hearth Commands
//!
//! Discord front end for Hearth Bot using the Poise framework.
//!
//! Slash commands translate into calls on the rule books, the configuration
//! store and the giveaway engine. The event handler feeds every guild message
//! through the rule matcher and answers giveaway join buttons. Nothing here
//! holds state of its own.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod about;
pub mod autoreply;
pub mod board;
pub mod channel_auto;
pub mod config;
pub mod events;
pub mod framework;
pub mod giveaway;
pub mod ids;
pub mod render;

pub use board::{SerenityBoard, JOIN_BUTTON_ID};
pub use framework::*;

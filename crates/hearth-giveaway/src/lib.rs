//! # Hearth Giveaway
//!
//! Timed giveaway contests for Hearth Bot.
//!
//! A giveaway is announced through an [`AnnouncementBoard`], collects
//! distinct entrants until its timer fires or a moderator ends it, then
//! draws winners uniformly at random. Resolution happens exactly once no
//! matter how the timer and manual ends race. Running giveaways live only in
//! memory and are lost on restart.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod duration;
pub mod engine;
pub mod error;
pub mod instance;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use board::{Announcement, AnnouncementBoard, ResultNotice};
pub use duration::parse_duration;
pub use engine::{GiveawayEngine, JoinOutcome, Resolution, StartRequest, StartedGiveaway};
pub use error::{BoardError, GiveawayError};
pub use instance::{draw_winners, GiveawayInstance, GiveawayState};

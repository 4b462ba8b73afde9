//! # Hearth Rules
//!
//! Rule evaluation and editing for Hearth Bot.
//!
//! Two rule kinds live in each tenant's configuration: auto-replies, where
//! the first matching rule in list order answers, and channel-auto rules,
//! where every rule watching the channel fires. Messages in a tenant's poem
//! channel are relayed instead of being matched.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod book;
pub mod error;
pub mod evaluate;
pub mod matcher;
pub mod pagination;

pub use book::{
    AutoReplyBook, AutoReplyPatch, ChannelAutoBook, ChannelAutoPatch, RuleBook, RuleRef,
    StoredRule,
};
pub use error::RuleError;
pub use evaluate::*;
pub use matcher::{match_trigger, MessageActions, RuleMatcher};
pub use pagination::{paginate, Page, PAGE_SIZE};

//! Giveaway and announcement board errors.

use hearth_common::{HearthError, MessageId};
use hearth_config::ConfigError;
use thiserror::Error;

/// Failures reported by an [`AnnouncementBoard`](crate::AnnouncementBoard).
#[derive(Debug, Error)]
pub enum BoardError {
    /// The channel or announcement message was deleted.
    #[error("The channel or message no longer exists")]
    Gone,

    /// The chat service failed for another reason.
    #[error("Chat request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Giveaway errors.
#[derive(Debug, Error)]
pub enum GiveawayError {
    /// The duration text could not be understood.
    #[error(
        "Invalid duration '{input}'. Use a whole number followed by s, m, h, d or w \
         (for example 30s, 10m, 2h, 1d, 1w); a bare number means minutes"
    )]
    InvalidDuration {
        /// The rejected text.
        input: String,
    },

    /// Fewer than one winner was requested.
    #[error("A giveaway needs at least one winner")]
    InvalidWinners,

    /// The prize was blank.
    #[error("The prize cannot be empty")]
    EmptyPrize,

    /// No active giveaway is announced by this message in this tenant.
    #[error("No active giveaway for message {0}")]
    NotFound(MessageId),

    /// Tenant defaults could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading tenant defaults off the async runtime failed.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The announcement could not be published.
    #[error("Could not publish the giveaway: {0}")]
    Board(#[from] BoardError),
}

impl GiveawayError {
    pub(crate) fn invalid_duration(input: &str) -> Self {
        Self::InvalidDuration {
            input: input.to_string(),
        }
    }
}

impl From<GiveawayError> for HearthError {
    fn from(err: GiveawayError) -> Self {
        match err {
            GiveawayError::InvalidDuration { .. } => Self::validation_field(err.to_string(), "duration"),
            GiveawayError::InvalidWinners => Self::validation_field(err.to_string(), "winners"),
            GiveawayError::EmptyPrize => Self::validation_field(err.to_string(), "prize"),
            GiveawayError::NotFound(_) => Self::not_found(err.to_string()),
            GiveawayError::Config(source) => source.into(),
            GiveawayError::Task(source) => Self::with_source("Giveaway could not be started", source),
            GiveawayError::Board(source) => Self::discord_with_source("Announcement failed", source),
        }
    }
}

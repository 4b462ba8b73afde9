//! Application-wide error types using thiserror.

use hearth_common::HearthError;
use hearth_config::SettingsError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Process settings could not be loaded or are invalid.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<BotError> for HearthError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::Settings(source) => source.into(),
            BotError::Discord(source) => Self::discord_with_source("Discord client failed", source),
            BotError::Logging(message) => Self::Generic { message, source: None },
        }
    }
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

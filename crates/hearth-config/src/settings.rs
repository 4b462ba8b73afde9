//! Process settings: how the bot itself is started.
//!
//! Settings come from an optional YAML file, then environment variables
//! (including a `.env` file), and are validated before the client starts.

use hearth_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the settings file.
pub const SETTINGS_PATH_VAR: &str = "HEARTH_SETTINGS_PATH";

/// Settings file used when [`SETTINGS_PATH_VAR`] is unset.
pub const DEFAULT_SETTINGS_FILE: &str = "hearth.yaml";

/// Tenant document used when nothing else is configured.
pub const DEFAULT_CONFIG_FILE: &str = "hearth_config.json";

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O error when reading the settings file.
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Environment variable parsing error.
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Offending variable.
        var: String,
        /// Parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A required setting is missing or empty.
    #[error("Missing required setting: {0}")]
    Missing(String),
}

impl From<SettingsError> for hearth_common::HearthError {
    fn from(err: SettingsError) -> Self {
        Self::config_with_source("Invalid process settings", err)
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `hearth_giveaway=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Write daily-rotated files here instead of stdout.
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

/// Everything needed to start the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Discord bot token.
    pub discord_token: String,
    /// Path of the tenant configuration document.
    pub config_path: PathBuf,
    /// Logging settings.
    pub logging: LogSettings,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            logging: LogSettings::default(),
        }
    }
}

impl BotSettings {
    /// Loads settings from the settings file if one exists, then the
    /// process environment, then validates them.
    pub fn load() -> Result<Self, SettingsError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {err}");
            }
        }

        let mut settings = match env::var(SETTINGS_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Self::from_file(DEFAULT_SETTINGS_FILE)?
            }
            Err(_) => Self::default(),
        };

        settings.apply_overrides(|var| env::var(var).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a YAML file without applying overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.discord_token = token;
        }

        if let Some(path) = lookup("HEARTH_CONFIG_PATH") {
            self.config_path = PathBuf::from(path);
        }

        if let Some(level) = lookup("HEARTH_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(json) = lookup("HEARTH_LOG_JSON") {
            self.logging.json = json
                .trim()
                .parse()
                .map_err(|e| SettingsError::EnvParse {
                    var: "HEARTH_LOG_JSON".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(directory) = lookup("HEARTH_LOG_DIR") {
            self.logging.directory = Some(PathBuf::from(directory)).filter(|dir| !dir.as_os_str().is_empty());
        }

        Ok(())
    }

    /// Checks that the bot can start with these settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.discord_token.trim().is_empty() {
            return Err(SettingsError::Missing(
                "discord_token (or DISCORD_TOKEN)".to_string(),
            ));
        }

        if self.config_path.as_os_str().is_empty() {
            return Err(SettingsError::Missing(
                "config_path (or HEARTH_CONFIG_PATH)".to_string(),
            ));
        }

        Ok(())
    }

    /// The logging bootstrap configuration these settings describe.
    #[must_use]
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level.clone(),
            json_format: self.logging.json,
            directory: self.logging.directory.clone(),
            ..LoggingConfig::default()
        }
    }
}

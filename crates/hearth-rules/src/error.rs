//! Errors raised while reading or editing rules.

use hearth_common::HearthError;
use hearth_config::ConfigError;
use thiserror::Error;

/// Rule errors.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A 1-based rule position outside the list.
    #[error("There is no rule #{index} (the list has {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of rules in the list.
        len: usize,
    },

    /// No rule carries the given id.
    #[error("No rule with id '{id}'")]
    UnknownId {
        /// Requested id.
        id: String,
    },

    /// The rule would be unusable.
    #[error("{0}")]
    Validation(String),

    /// The configuration store failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RuleError {
    /// Whether the rule addressed by the caller does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. } | Self::UnknownId { .. })
    }
}

impl From<RuleError> for HearthError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::IndexOutOfRange { .. } | RuleError::UnknownId { .. } => {
                Self::not_found(err.to_string())
            }
            RuleError::Validation(message) => Self::validation(message),
            RuleError::Config(source) => source.into(),
        }
    }
}

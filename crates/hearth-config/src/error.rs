//! Errors raised by the configuration store.

use hearth_common::{HearthError, TenantId};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration store errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be written.
    #[error("Failed to persist configuration to {}: {source}", path.display())]
    Persistence {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A partial update would leave the tenant record malformed.
    #[error("Invalid configuration for tenant {tenant}: {source}")]
    Validation {
        /// Tenant being updated.
        tenant: TenantId,
        /// Why the merged record was rejected.
        #[source]
        source: serde_json::Error,
    },

    /// The existing file could not be read, so it must not be replaced.
    #[error("Refusing to overwrite {}: the existing file could not be read", path.display())]
    Unreadable {
        /// File left untouched.
        path: PathBuf,
    },
}

impl ConfigError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfigError> for HearthError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { .. } => Self::validation(err.to_string()),
            ConfigError::Persistence { .. } | ConfigError::Unreadable { .. } => {
                Self::persistence_with_source("Configuration could not be saved", err)
            }
            other => Self::config_with_source("Configuration could not be read", other),
        }
    }
}

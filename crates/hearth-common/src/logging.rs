//! Structured logging infrastructure for Hearth

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "`hearth_giveaway=trace`")
    pub level: String,
    /// Whether to emit one JSON object per line
    pub json_format: bool,
    /// Optional directory for daily-rotated log files instead of stdout
    pub directory: Option<PathBuf>,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            directory: None,
            include_targets: true,
        }
    }
}

/// Keeps the background log writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    // RUST_LOG wins over the configured level when set
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .or_else(|_| EnvFilter::try_new("info"))?;

    let (writer, worker) = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::daily(directory, "hearth.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.json_format, writer) {
        (true, Some(writer)) => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()?,
        (true, None) => registry
            .with(fmt::layer().json().with_target(config.include_targets))
            .try_init()?,
        (false, Some(writer)) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(config.include_targets)
                    .with_writer(writer),
            )
            .try_init()?,
        (false, None) => registry
            .with(fmt::layer().with_target(config.include_targets))
            .try_init()?,
    }

    Ok(LogGuard { _worker: worker })
}

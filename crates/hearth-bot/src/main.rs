//! Main entry point for Hearth Bot.

use anyhow::{Context, Result};
use hearth_bot::{BotError, HearthBot};
use hearth_common::init_logging;
use hearth_config::BotSettings;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = BotSettings::load().context("Failed to load bot settings")?;

    let _log_guard = init_logging(&settings.logging_config())
        .map_err(|err| BotError::Logging(err.to_string()))
        .context("Failed to initialize logging")?;

    info!("Starting Hearth Bot v{}", env!("CARGO_PKG_VERSION"));

    let bot = HearthBot::new(settings);
    if let Err(err) = bot.start().await {
        error!("Bot stopped with an error: {}", err);
        return Err(err).context("Discord client failed");
    }

    Ok(())
}

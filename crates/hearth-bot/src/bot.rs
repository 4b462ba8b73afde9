//! Core bot logic using the Poise framework.

use crate::error::BotResult;
use hearth_commands::{create_framework, Data, Error};
use hearth_config::{BotSettings, ConfigStore};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Gateway intents the bot needs: guild messages with their content, and
/// component interactions.
#[must_use]
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Main bot structure.
#[derive(Debug)]
pub struct HearthBot {
    settings: BotSettings,
    store: Arc<ConfigStore>,
}

impl HearthBot {
    /// Creates a new bot instance.
    pub fn new(settings: BotSettings) -> Self {
        let store = Arc::new(ConfigStore::new(settings.config_path.clone()));
        Self { settings, store }
    }

    /// The tenant configuration store shared by every handler.
    #[must_use]
    pub const fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Starts the bot and runs until the client stops or Ctrl-C is pressed.
    pub async fn start(&self) -> BotResult<()> {
        let store = Arc::clone(&self.store);
        info!(path = %store.path().display(), "Using tenant configuration file");

        let framework = create_framework()
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Bot connected as: {}", ready.user.name);
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Slash commands registered globally");
                    Ok::<_, Error>(Data::new(store, Arc::clone(&ctx.http)))
                })
            })
            .build();

        let mut client = serenity::ClientBuilder::new(&self.settings.discord_token, intents())
            .framework(framework)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {:?}", err);
                return;
            }
            info!("Received shutdown signal, starting graceful shutdown");
            shard_manager.shutdown_all().await;
        });

        client.start().await?;
        info!("Hearth Bot has shut down");
        Ok(())
    }
}

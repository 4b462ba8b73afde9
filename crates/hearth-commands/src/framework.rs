//! Poise framework setup and command registration logic.

use crate::board::SerenityBoard;
use hearth_common::{HearthError, TenantId};
use hearth_config::ConfigStore;
use hearth_giveaway::GiveawayEngine;
use hearth_rules::{AutoReplyBook, ChannelAutoBook, RuleMatcher};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Application data accessible in all commands.
pub struct Data {
    /// Tenant configuration store.
    pub store: Arc<ConfigStore>,
    /// Evaluates rules against incoming messages.
    pub matcher: RuleMatcher,
    /// Auto-reply rule editing.
    pub replies: AutoReplyBook,
    /// Channel-auto rule editing.
    pub channels: ChannelAutoBook,
    /// Running giveaways.
    pub engine: GiveawayEngine<SerenityBoard>,
}

impl Data {
    /// Wires every service to one store, announcing giveaways through `http`.
    pub fn new(store: Arc<ConfigStore>, http: Arc<serenity::Http>) -> Self {
        Self {
            matcher: RuleMatcher::new(Arc::clone(&store)),
            replies: AutoReplyBook::new(Arc::clone(&store)),
            channels: ChannelAutoBook::new(Arc::clone(&store)),
            engine: GiveawayEngine::new(Arc::clone(&store), Arc::new(SerenityBoard::new(http))),
            store,
        }
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("store", &self.store.path())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Application error type for commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shown when a command fails for a reason the user cannot fix.
pub const GENERIC_FAILURE: &str = "Something went wrong while running this command.";

/// Every slash command the bot registers.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        crate::about::about(),
        crate::autoreply::autoreply(),
        crate::channel_auto::channelauto(),
        crate::config::config(),
        crate::giveaway::giveaway(),
    ]
}

/// Creates a new Poise framework.
pub fn create_framework() -> poise::FrameworkBuilder<Data, Error> {
    poise::Framework::builder().options(poise::FrameworkOptions {
        commands: commands(),
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::events::event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    })
}

/// The tenant a command was invoked in.
pub fn tenant_of(ctx: Context<'_>) -> Result<TenantId, Error> {
    ctx.guild_id()
        .map(crate::ids::tenant)
        .ok_or_else(|| HearthError::validation("This command only works inside a server").into())
}

/// Sends an ephemeral text reply.
pub async fn reply_ephemeral(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

/// Text to show the user for a command error they can act on, or `None`
/// when the failure is internal.
#[must_use]
pub fn user_message(error: &(dyn std::error::Error + Send + Sync + 'static)) -> Option<String> {
    error.downcast_ref::<HearthError>()?.user_message().cloned()
}

/// Global error handler for the framework
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let text = if let Some(text) = user_message(error.as_ref()) {
                debug!(command = %ctx.command().qualified_name, "Rejected: {}", text);
                text
            } else {
                error!(command = %ctx.command().qualified_name, "Command failed: {:?}", error);
                GENERIC_FAILURE.to_string()
            };
            if let Err(err) = reply_ephemeral(ctx, text).await {
                warn!("Could not report command error: {}", err);
            }
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error in event handler for {:?}: {:?}", event.snake_case_name(), error);
        }
        error => {
            if let Err(err) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", err);
            }
        }
    }
}

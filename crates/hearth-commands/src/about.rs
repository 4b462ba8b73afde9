//! About command implementation using Poise's command macro.

use crate::framework::{Context, Error};

/// Text shown by `/about`.
#[must_use]
pub fn about_text() -> String {
    format!(
        "**Hearth Bot v{}**\n\
         Community automation: poem relays, auto-replies, channel rules and giveaways.\n\
         Built with Rust and the Poise framework.",
        env!("CARGO_PKG_VERSION")
    )
}

/// Shows information about the bot.
#[poise::command(slash_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(about_text()).await?;
    Ok(())
}

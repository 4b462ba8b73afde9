//! Giveaway commands.

use crate::framework::{reply_ephemeral, tenant_of, Context, Error};
use crate::ids;
use crate::render::resolution_reply;
use hearth_common::{discord_timestamp, HearthError, MessageId};
use hearth_giveaway::StartRequest;
use poise::serenity_prelude as serenity;
use tracing::info;

/// Giveaway management.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD",
    subcommands("start", "end"),
    subcommand_required
)]
pub async fn giveaway(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Start a giveaway with a join button.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn start(
    ctx: Context<'_>,
    #[description = "What is being given away"] prize: String,
    #[description = "How long entries stay open, e.g. 30m, 2h, 1d (bare number = minutes)"]
    duration: Option<String>,
    #[description = "Number of winners"]
    #[min = 1]
    winners: Option<u32>,
    #[description = "Channel to announce in"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    ctx.defer_ephemeral().await?;

    let request = StartRequest {
        tenant,
        origin_channel: ids::channel(ctx.channel_id()),
        channel: channel.map(|channel| ids::channel(channel.id)),
        host: ids::user(ctx.author().id),
        prize,
        duration,
        winners,
    };

    let started = ctx
        .data()
        .engine
        .start(request)
        .await
        .map_err(HearthError::from)?;

    info!(
        tenant = %tenant,
        host = %ctx.author().id,
        message = %started.message_id,
        "Giveaway command completed"
    );
    reply_ephemeral(
        ctx,
        format!(
            "Giveaway for **{}** started in {}. It ends {}.",
            started.announcement.prize,
            started.channel.mention(),
            discord_timestamp(started.announcement.ends_at, 'R')
        ),
    )
    .await
}

/// End a running giveaway now and draw its winners.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn end(
    ctx: Context<'_>,
    #[description = "Message id of the giveaway announcement"] message_id: String,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let message_id: MessageId = message_id
        .parse()
        .map_err(|err: hearth_common::IdParseError| {
            HearthError::validation_field(err.to_string(), "message_id")
        })?;

    ctx.defer_ephemeral().await?;
    let resolution = ctx
        .data()
        .engine
        .end_now(tenant, message_id)
        .await
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, resolution_reply(&resolution)).await
}

//! Channel-auto rule management commands.

use crate::framework::{reply_ephemeral, tenant_of, Context, Error};
use crate::ids;
use crate::render::{channel_auto_line, page_body, page_footer};
use hearth_common::HearthError;
use hearth_config::{dedup_reactions, ChannelAutoRule};
use hearth_rules::ChannelAutoPatch;
use poise::serenity_prelude as serenity;

/// Splits a reaction list typed by a user. Spaces and commas both separate
/// entries; duplicates and blanks are dropped.
#[must_use]
pub fn parse_reactions(input: &str) -> Vec<String> {
    dedup_reactions(input.split(|c: char| c == ',' || c.is_whitespace()))
}

/// Channel-auto rule management.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD",
    subcommands("list", "add", "edit", "remove", "toggle", "test"),
    subcommand_required
)]
pub async fn channelauto(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// List channel rules.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Page number"]
    #[min = 1]
    page: Option<u32>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let index = page.unwrap_or(1).saturating_sub(1) as usize;
    let page = ctx
        .data()
        .channels
        .list(tenant, index)
        .map_err(HearthError::from)?;

    let embed = serenity::CreateEmbed::new()
        .title("Channel rules")
        .description(page_body(
            &page,
            "No channel rules yet. Add one with /channelauto add.",
            channel_auto_line,
        ))
        .footer(serenity::CreateEmbedFooter::new(page_footer(&page)));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Reply and/or react to every message posted in a channel.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Channel to watch"] channel: serenity::GuildChannel,
    #[description = "Reply text"] reply: Option<String>,
    #[description = "Reactions, separated by spaces"] reactions: Option<String>,
    #[description = "Mention the author in the reply"] mention: Option<bool>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = ChannelAutoRule {
        channel_id: Some(ids::channel(channel.id)),
        reply: reply.unwrap_or_default(),
        reactions: reactions.as_deref().map(parse_reactions).unwrap_or_default(),
        mention: mention.unwrap_or(false),
        ..ChannelAutoRule::default()
    };

    let (position, rule) = ctx
        .data()
        .channels
        .add(tenant, rule)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Added {}", channel_auto_line(position, &rule))).await
}

/// Change fields of a channel rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn edit(
    ctx: Context<'_>,
    #[description = "Rule number from /channelauto list"]
    #[min = 1]
    number: u32,
    #[description = "New channel"] channel: Option<serenity::GuildChannel>,
    #[description = "New reply text; a single '-' clears it"] reply: Option<String>,
    #[description = "New reactions; a single '-' clears them"] reactions: Option<String>,
    #[description = "Mention the author in the reply"] mention: Option<bool>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let clear = |value: String| if value.trim() == "-" { String::new() } else { value };
    let patch = ChannelAutoPatch {
        channel_id: channel.map(|channel| ids::channel(channel.id)),
        reply: reply.map(clear),
        reactions: reactions.map(|value| parse_reactions(&clear(value))),
        mention,
    };

    let rule = ctx
        .data()
        .channels
        .edit(tenant, number as usize, patch)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Updated {}", channel_auto_line(number as usize, &rule))).await
}

/// Delete a channel rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Rule number from /channelauto list"]
    #[min = 1]
    number: u32,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = ctx
        .data()
        .channels
        .remove(tenant, number as usize)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Removed {}", channel_auto_line(number as usize, &rule))).await
}

/// Enable or disable a channel rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn toggle(
    ctx: Context<'_>,
    #[description = "Rule number from /channelauto list"]
    #[min = 1]
    number: u32,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = ctx
        .data()
        .channels
        .toggle(tenant, number as usize)
        .map_err(HearthError::from)?;
    let state = if rule.enabled { "enabled" } else { "disabled" };
    reply_ephemeral(ctx, format!("Channel rule #{number} is now {state}")).await
}

/// Show which rules would fire in a channel, without sending anything.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn test(
    ctx: Context<'_>,
    #[description = "Channel to check"] channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let hits = ctx
        .data()
        .matcher
        .test_channel_auto(tenant, ids::channel(channel.id))
        .map_err(HearthError::from)?;

    let answer = if hits.is_empty() {
        format!("No rule fires in {}.", ids::channel(channel.id).mention())
    } else {
        hits.iter()
            .map(|(position, rule)| channel_auto_line(*position, rule))
            .collect::<Vec<_>>()
            .join("\n")
    };
    reply_ephemeral(ctx, answer).await
}

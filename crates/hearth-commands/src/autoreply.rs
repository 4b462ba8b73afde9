//! Auto-reply management commands with Poise's built-in subcommand support.

use crate::framework::{reply_ephemeral, tenant_of, Context, Error};
use crate::render::{auto_reply_line, page_body, page_footer};
use hearth_common::HearthError;
use hearth_config::{AutoReplyRule, DeliveryMode, MatchType};
use hearth_rules::{AutoReplyPatch, PAGE_SIZE};
use poise::serenity_prelude as serenity;

/// How a trigger is compared with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum MatchChoice {
    /// Trigger appears anywhere.
    #[name = "contains"]
    Contains,
    /// Whole message equals the trigger.
    #[name = "exact"]
    Exact,
    /// Message starts with the trigger.
    #[name = "starts with"]
    StartsWith,
    /// Message ends with the trigger.
    #[name = "ends with"]
    EndsWith,
}

impl From<MatchChoice> for MatchType {
    fn from(choice: MatchChoice) -> Self {
        match choice {
            MatchChoice::Contains => Self::Contains,
            MatchChoice::Exact => Self::Exact,
            MatchChoice::StartsWith => Self::StartsWith,
            MatchChoice::EndsWith => Self::EndsWith,
        }
    }
}

/// How a reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ModeChoice {
    /// As a reply to the triggering message.
    #[name = "reply"]
    Reply,
    /// As a new message in the channel.
    #[name = "send"]
    Send,
}

impl From<ModeChoice> for DeliveryMode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::Reply => Self::Reply,
            ModeChoice::Send => Self::Send,
        }
    }
}

/// Auto-reply rule management.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD",
    subcommands("list", "add", "edit", "remove", "toggle", "test"),
    subcommand_required
)]
pub async fn autoreply(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// List auto-reply rules in evaluation order.
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
        .replies
        .list(tenant, index)
        .map_err(HearthError::from)?;

    let embed = serenity::CreateEmbed::new()
        .title("Auto-replies")
        .description(page_body(
            &page,
            "No auto-replies yet. Add one with /autoreply add.",
            auto_reply_line,
        ))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} · {PAGE_SIZE} per page",
            page_footer(&page)
        )));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Add an auto-reply rule at the end of the list.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Text to look for"] trigger: String,
    #[description = "What to answer"] reply: String,
    #[description = "How the trigger is compared (default: contains)"] match_type: Option<MatchChoice>,
    #[description = "Reply to the message or send a new one (default: reply)"] mode: Option<ModeChoice>,
    #[description = "Mention the author"] mention: Option<bool>,
    #[description = "Match case exactly"] case_sensitive: Option<bool>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = AutoReplyRule {
        trigger,
        reply,
        match_type: match_type.map(MatchType::from).unwrap_or_default(),
        mode: mode.map(DeliveryMode::from).unwrap_or_default(),
        mention: mention.unwrap_or(false),
        case_sensitive: case_sensitive.unwrap_or(false),
        ..AutoReplyRule::default()
    };

    let (position, rule) = ctx
        .data()
        .replies
        .add(tenant, rule)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Added {}", auto_reply_line(position, &rule))).await
}

/// Change fields of an auto-reply rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn edit(
    ctx: Context<'_>,
    #[description = "Rule number from /autoreply list"]
    #[min = 1]
    number: u32,
    #[description = "New trigger"] trigger: Option<String>,
    #[description = "New reply"] reply: Option<String>,
    #[description = "New comparison"] match_type: Option<MatchChoice>,
    #[description = "New delivery mode"] mode: Option<ModeChoice>,
    #[description = "Mention the author"] mention: Option<bool>,
    #[description = "Match case exactly"] case_sensitive: Option<bool>,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let patch = AutoReplyPatch {
        trigger,
        reply,
        match_type: match_type.map(MatchType::from),
        mode: mode.map(DeliveryMode::from),
        mention,
        case_sensitive,
    };

    let rule = ctx
        .data()
        .replies
        .edit(tenant, number as usize, patch)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Updated {}", auto_reply_line(number as usize, &rule))).await
}

/// Delete an auto-reply rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Rule number from /autoreply list"]
    #[min = 1]
    number: u32,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = ctx
        .data()
        .replies
        .remove(tenant, number as usize)
        .map_err(HearthError::from)?;
    reply_ephemeral(ctx, format!("Removed auto-reply `{}`", rule.trigger)).await
}

/// Enable or disable an auto-reply rule.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn toggle(
    ctx: Context<'_>,
    #[description = "Rule number from /autoreply list"]
    #[min = 1]
    number: u32,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let rule = ctx
        .data()
        .replies
        .toggle(tenant, number as usize)
        .map_err(HearthError::from)?;
    let state = if rule.enabled { "enabled" } else { "disabled" };
    reply_ephemeral(ctx, format!("Auto-reply #{number} is now {state}")).await
}

/// Show which rule would answer a message, without sending anything.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn test(
    ctx: Context<'_>,
    #[description = "Message text to try"] text: String,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let hit = ctx
        .data()
        .matcher
        .test_auto_reply(tenant, &text)
        .map_err(HearthError::from)?;

    let answer = match hit {
        Some((position, rule)) => format!("Would answer with {}", auto_reply_line(position, &rule)),
        None => "No auto-reply matches that text.".to_string(),
    };
    reply_ephemeral(ctx, answer).await
}

//! Config subcommands with Poise's built-in subcommand support.

use crate::framework::{reply_ephemeral, tenant_of, Context, Error};
use crate::render::config_summary;
use hearth_common::{parse_color, parse_snowflake, HearthError};
use hearth_config::TenantConfig;
use poise::serenity_prelude as serenity;
use serde_json::{Map, Value};

/// Reads a value typed after `/config set`.
///
/// Mentions become id strings, JSON literals keep their type, ids too large
/// for a count stay strings, and anything else is plain text.
#[must_use]
pub fn parse_setting_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('<') {
        if let Ok(id) = parse_snowflake(trimmed) {
            return Value::String(id.to_string());
        }
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Number(number)) if number.as_u64().is_some_and(|n| n > u64::from(u32::MAX)) => {
            Value::String(number.to_string())
        }
        Ok(Value::String(_)) | Err(_) => Value::String(trimmed.to_string()),
        Ok(value) => value,
    }
}

/// Builds the partial update for `key = value`. A dotted key such as
/// `giveaway.duration` replaces one field of a section and keeps the rest.
pub fn build_partial(current: &TenantConfig, key: &str, value: Value) -> Result<Map<String, Value>, HearthError> {
    let mut partial = Map::new();
    let Some((section, field)) = key.split_once('.') else {
        partial.insert(key.to_string(), value);
        return Ok(partial);
    };

    let unknown = || HearthError::validation_field(format!("Unknown setting section '{section}'"), "key");
    let mut document = serde_json::to_value(current)?;
    let mut section_value = document
        .get_mut(section)
        .map(Value::take)
        .ok_or_else(unknown)?;
    let fields = section_value.as_object_mut().ok_or_else(unknown)?;
    fields.insert(field.to_string(), value);

    partial.insert(section.to_string(), section_value);
    Ok(partial)
}

/// Configuration management commands.
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD",
    subcommands("view", "set"),
    subcommand_required
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// View current configuration.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let config = ctx
        .data()
        .store
        .get_tenant(tenant)
        .map_err(HearthError::from)?;

    let fields = config_summary(&config)
        .into_iter()
        .map(|(name, value)| (name, value, false));
    let embed = serenity::CreateEmbed::new()
        .title("Server configuration")
        .colour(parse_color(&config.embed_color))
        .fields(fields);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Change one setting, e.g. `embedColor red` or `giveaway.duration 2h`.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Setting name, e.g. embedColor or giveaway.winners"] key: String,
    #[description = "New value"] value: String,
) -> Result<(), Error> {
    let tenant = tenant_of(ctx)?;
    let store = &ctx.data().store;
    let key = key.trim();
    if key.is_empty() {
        return Err(HearthError::validation_field("The setting name cannot be empty", "key").into());
    }

    let current = store.get_tenant(tenant).map_err(HearthError::from)?;
    let partial = build_partial(&current, key, parse_setting_value(&value))?;
    store
        .update_tenant(tenant, partial)
        .map_err(HearthError::from)?;

    reply_ephemeral(ctx, format!("`{key}` updated.")).await
}

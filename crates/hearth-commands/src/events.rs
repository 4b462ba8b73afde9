//! Gateway event handling: rule delivery and giveaway join buttons.

use crate::board::JOIN_BUTTON_ID;
use crate::framework::{Data, Error};
use crate::ids;
use crate::render::join_reply;
use hearth_common::{HearthError, MessageEvent};
use hearth_config::DeliveryMode;
use hearth_rules::{AutoReplyAction, ChannelAutoAction, PoemRelay};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

/// Converts a gateway message into the event the rule matcher consumes.
#[must_use]
pub fn message_event(message: &serenity::Message) -> MessageEvent {
    MessageEvent {
        tenant: message.guild_id.map(ids::tenant),
        channel: ids::channel(message.channel_id),
        author: ids::user(message.author.id),
        author_is_bot: message.author.bot,
        text: message.content.clone(),
    }
}

/// Central event handler for Discord events
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "Connected as {} to {} guilds",
                data_about_bot.user.name,
                data_about_bot.guilds.len()
            );
        }
        serenity::FullEvent::Message { new_message } => {
            on_message(ctx, data, new_message).await?;
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } if component.data.custom_id == JOIN_BUTTON_ID => {
            on_join(ctx, data, component).await?;
        }
        _ => {}
    }
    Ok(())
}

async fn on_message(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) -> Result<(), Error> {
    let event = message_event(message);
    let matcher = data.matcher.clone();
    let actions = tokio::task::spawn_blocking(move || matcher.on_message(&event))
        .await?
        .map_err(HearthError::from)?;
    if actions.is_empty() {
        return Ok(());
    }

    if let Some(poem) = &actions.poem {
        relay_poem(ctx, message, poem).await?;
        return Ok(());
    }
    if let Some(action) = &actions.auto_reply {
        deliver_auto_reply(ctx, message, action).await;
    }
    for action in &actions.channel_auto {
        deliver_channel_auto(ctx, message, action).await;
    }
    Ok(())
}

async fn add_reactions(ctx: &serenity::Context, message: &serenity::Message, reactions: &[String]) {
    for emoji in reactions {
        let reaction = match serenity::ReactionType::try_from(emoji.as_str()) {
            Ok(reaction) => reaction,
            Err(err) => {
                warn!(emoji = %emoji, "Skipping unusable reaction: {}", err);
                continue;
            }
        };
        if let Err(err) = message.react(&ctx.http, reaction).await {
            warn!(emoji = %emoji, message = %message.id, "Could not add reaction: {}", err);
        }
    }
}

async fn relay_poem(
    ctx: &serenity::Context,
    message: &serenity::Message,
    poem: &PoemRelay,
) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .description(format!("**{}**", poem.content))
        .colour(poem.color)
        .thumbnail(message.author.face())
        .footer(serenity::CreateEmbedFooter::new(message.author.display_name()));

    let relayed = message
        .channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await?;
    add_reactions(ctx, &relayed, &poem.reactions).await;

    if let Some(url) = &poem.image_url {
        if let Err(err) = message.channel_id.say(&ctx.http, url).await {
            warn!(channel = %message.channel_id, "Could not post poem image: {}", err);
        }
    }

    message.delete(&ctx.http).await?;
    info!(
        channel = %message.channel_id,
        author = %message.author.id,
        "Poem relayed"
    );
    Ok(())
}

async fn deliver_auto_reply(
    ctx: &serenity::Context,
    message: &serenity::Message,
    action: &AutoReplyAction,
) {
    let sent = match action.mode {
        DeliveryMode::Reply => message.reply(&ctx.http, &action.content).await,
        DeliveryMode::Send => message.channel_id.say(&ctx.http, &action.content).await,
    };
    match sent {
        Ok(_) => debug!(rule = %action.rule_id, "Auto-reply delivered"),
        Err(err) => warn!(rule = %action.rule_id, "Could not deliver auto-reply: {}", err),
    }
}

async fn deliver_channel_auto(
    ctx: &serenity::Context,
    message: &serenity::Message,
    action: &ChannelAutoAction,
) {
    add_reactions(ctx, message, &action.reactions).await;

    if let Some(reply) = &action.reply {
        if let Err(err) = message.channel_id.say(&ctx.http, reply).await {
            warn!(rule = %action.rule_id, "Could not deliver channel rule reply: {}", err);
        }
    }
}

async fn on_join(
    ctx: &serenity::Context,
    data: &Data,
    component: &serenity::ComponentInteraction,
) -> Result<(), Error> {
    let outcome = data
        .engine
        .join(
            ids::message(component.message.id),
            ids::user(component.user.id),
            component.user.bot,
        )
        .await;

    let response = serenity::CreateInteractionResponseMessage::new()
        .content(join_reply(outcome))
        .ephemeral(true);
    component
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}

//! Giveaway announcements rendered as Discord embeds.

use crate::ids::{to_serenity_channel, to_serenity_message};
use async_trait::async_trait;
use hearth_common::{discord_timestamp, ChannelId, MessageId};
use hearth_giveaway::{Announcement, AnnouncementBoard, BoardError, ResultNotice};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Custom id of the join button on every announcement.
pub const JOIN_BUTTON_ID: &str = "giveaway_join";

/// Embed title for an announcement.
#[must_use]
pub fn announcement_title(announcement: &Announcement) -> String {
    if announcement.ended {
        format!("{} Giveaway Ended", announcement.emoji)
    } else {
        format!("{} Giveaway", announcement.emoji)
    }
}

/// Embed fields as `(name, value, inline)`.
#[must_use]
pub fn announcement_fields(announcement: &Announcement) -> Vec<(String, String, bool)> {
    let time_label = if announcement.ended { "Ended" } else { "Ends" };
    vec![
        ("Hosted by".to_string(), announcement.host.mention(), true),
        ("Winners".to_string(), announcement.winners.to_string(), true),
        ("Entries".to_string(), announcement.entries.to_string(), true),
        (
            time_label.to_string(),
            format!(
                "{}\n({})",
                discord_timestamp(announcement.ends_at, 'F'),
                discord_timestamp(announcement.ends_at, 'R')
            ),
            false,
        ),
    ]
}

/// The full announcement embed.
#[must_use]
pub fn announcement_embed(announcement: &Announcement) -> serenity::CreateEmbed {
    let footer = if announcement.ended {
        "This giveaway is over".to_string()
    } else {
        format!("Click {} to enter", announcement.emoji)
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(announcement_title(announcement))
        .description(format!("**Prize:** {}", announcement.prize))
        .colour(announcement.color)
        .fields(announcement_fields(announcement))
        .footer(serenity::CreateEmbedFooter::new(footer));

    if let Some(url) = &announcement.image_url {
        embed = embed.image(url);
    }
    embed
}

/// The join button, disabled once the giveaway ended.
#[must_use]
pub fn join_row(announcement: &Announcement) -> serenity::CreateActionRow {
    let button = serenity::CreateButton::new(JOIN_BUTTON_ID)
        .label("Enter")
        .style(serenity::ButtonStyle::Primary)
        .emoji(serenity::ReactionType::Unicode(announcement.emoji.clone()))
        .disabled(announcement.ended);
    serenity::CreateActionRow::Buttons(vec![button])
}

fn is_gone(err: &::serenity::Error) -> bool {
    matches!(
        err,
        ::serenity::Error::Http(http)
            if http.status_code().is_some_and(|status| status.as_u16() == 404)
    )
}

fn board_error(err: ::serenity::Error) -> BoardError {
    if is_gone(&err) {
        BoardError::Gone
    } else {
        BoardError::Transport(Box::new(err))
    }
}

/// Announcement board backed by the Discord REST API.
#[derive(Clone)]
pub struct SerenityBoard {
    http: Arc<serenity::Http>,
}

impl std::fmt::Debug for SerenityBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerenityBoard")
            .field("http", &"<Http>")
            .finish()
    }
}

impl SerenityBoard {
    /// Creates a board posting through `http`.
    pub const fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AnnouncementBoard for SerenityBoard {
    async fn publish(
        &self,
        channel: ChannelId,
        announcement: &Announcement,
    ) -> Result<MessageId, BoardError> {
        let builder = serenity::CreateMessage::new()
            .embed(announcement_embed(announcement))
            .components(vec![join_row(announcement)]);

        let sent = to_serenity_channel(channel)
            .send_message(&self.http, builder)
            .await
            .map_err(board_error)?;
        Ok(crate::ids::message(sent.id))
    }

    async fn refresh(
        &self,
        channel: ChannelId,
        message: MessageId,
        announcement: &Announcement,
    ) -> Result<(), BoardError> {
        let builder = serenity::EditMessage::new()
            .embed(announcement_embed(announcement))
            .components(vec![join_row(announcement)]);

        to_serenity_channel(channel)
            .edit_message(&self.http, to_serenity_message(message), builder)
            .await
            .map(|_| ())
            .map_err(board_error)
    }

    async fn announce(
        &self,
        channel: ChannelId,
        message: MessageId,
        notice: &ResultNotice,
    ) -> Result<(), BoardError> {
        let channel = to_serenity_channel(channel);
        let builder = serenity::CreateMessage::new()
            .content(notice.render())
            .reference_message((channel, to_serenity_message(message)))
            .allowed_mentions(serenity::CreateAllowedMentions::new().all_users(true));

        channel
            .send_message(&self.http, builder)
            .await
            .map(|_| ())
            .map_err(board_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hearth_common::UserId;

    fn announcement(ended: bool) -> Announcement {
        Announcement {
            prize: "Nitro".to_string(),
            host: UserId(5),
            winners: 2,
            entries: 7,
            ends_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            emoji: "🎉".to_string(),
            color: 0x5865F2,
            image_url: None,
            ended,
        }
    }

    #[test]
    fn test_title_reflects_state() {
        assert_eq!(announcement_title(&announcement(false)), "🎉 Giveaway");
        assert_eq!(announcement_title(&announcement(true)), "🎉 Giveaway Ended");
    }

    #[test]
    fn test_fields() {
        let fields = announcement_fields(&announcement(false));
        assert_eq!(fields[0], ("Hosted by".to_string(), "<@5>".to_string(), true));
        assert_eq!(fields[1].1, "2");
        assert_eq!(fields[2].1, "7");
        assert_eq!(fields[3].0, "Ends");
        assert!(fields[3].1.starts_with("<t:1767268800:F>"));

        assert_eq!(announcement_fields(&announcement(true))[3].0, "Ended");
    }
}

//! Where giveaway announcements are shown.

use crate::error::BoardError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_common::{ChannelId, MessageId, UserId};

/// Everything an announcement displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// What is being given away.
    pub prize: String,
    /// Who started the giveaway.
    pub host: UserId,
    /// Number of winners to draw.
    pub winners: u32,
    /// Current number of entrants.
    pub entries: usize,
    /// When entries close.
    pub ends_at: DateTime<Utc>,
    /// Decorative emoji.
    pub emoji: String,
    /// Embed color.
    pub color: u32,
    /// Optional image.
    pub image_url: Option<String>,
    /// Whether the giveaway is over; ended announcements have no join control.
    pub ended: bool,
}

/// The outcome posted when a giveaway resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultNotice {
    /// What was given away.
    pub prize: String,
    /// Who started the giveaway.
    pub host: UserId,
    /// Winners in draw order; empty when nobody entered.
    pub winners: Vec<UserId>,
}

impl ResultNotice {
    /// Text for the channel, mentioning every winner.
    #[must_use]
    pub fn render(&self) -> String {
        if self.winners.is_empty() {
            return format!("No valid entries for **{}**, so there is no winner.", self.prize);
        }

        let mentions: Vec<String> = self.winners.iter().map(|winner| winner.mention()).collect();
        format!(
            "Congratulations {}! You won **{}**!",
            mentions.join(", "),
            self.prize
        )
    }
}

/// Publishes and updates giveaway announcements.
///
/// Implementations return [`BoardError::Gone`] when the channel or message
/// was deleted, so the engine can discard the giveaway quietly.
#[async_trait]
pub trait AnnouncementBoard: Send + Sync + 'static {
    /// Posts a new announcement with a join control and returns its message.
    async fn publish(
        &self,
        channel: ChannelId,
        announcement: &Announcement,
    ) -> Result<MessageId, BoardError>;

    /// Re-renders an existing announcement.
    async fn refresh(
        &self,
        channel: ChannelId,
        message: MessageId,
        announcement: &Announcement,
    ) -> Result<(), BoardError>;

    /// Posts the result in the announcement's channel.
    async fn announce(
        &self,
        channel: ChannelId,
        message: MessageId,
        notice: &ResultNotice,
    ) -> Result<(), BoardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_text() {
        let mut notice = ResultNotice {
            prize: "Nitro".to_string(),
            host: UserId(1),
            winners: vec![UserId(2), UserId(3)],
        };
        assert_eq!(notice.render(), "Congratulations <@2>, <@3>! You won **Nitro**!");

        notice.winners.clear();
        assert!(notice.render().contains("No valid entries"));
    }
}

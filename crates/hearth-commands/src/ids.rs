//! Conversions between serenity ids and the workspace's own id types.

use hearth_common::{ChannelId, MessageId, TenantId, UserId};
use poise::serenity_prelude as serenity;

/// The tenant a guild maps to.
#[must_use]
pub fn tenant(guild: serenity::GuildId) -> TenantId {
    TenantId(guild.get())
}

/// Our id for a serenity channel.
#[must_use]
pub fn channel(channel: serenity::ChannelId) -> ChannelId {
    ChannelId(channel.get())
}

/// Our id for a serenity user.
#[must_use]
pub fn user(user: serenity::UserId) -> UserId {
    UserId(user.get())
}

/// Our id for a serenity message.
#[must_use]
pub fn message(message: serenity::MessageId) -> MessageId {
    MessageId(message.get())
}

/// The serenity id for a stored channel. Stored ids are never zero.
#[must_use]
pub fn to_serenity_channel(channel: ChannelId) -> serenity::ChannelId {
    serenity::ChannelId::new(channel.get())
}

/// The serenity id for a stored message. Stored ids are never zero.
#[must_use]
pub fn to_serenity_message(message: MessageId) -> serenity::MessageId {
    serenity::MessageId::new(message.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_value() {
        let ours = channel(serenity::ChannelId::new(42));
        assert_eq!(ours, ChannelId(42));
        assert_eq!(to_serenity_channel(ours).get(), 42);
        assert_eq!(to_serenity_message(MessageId(7)).get(), 7);
        assert_eq!(tenant(serenity::GuildId::new(9)), TenantId(9));
    }
}

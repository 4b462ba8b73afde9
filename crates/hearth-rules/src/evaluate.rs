//! Pure evaluation of a tenant's rules against one message.
//!
//! Auto-replies are first-match-wins in stored order. Channel-auto rules all
//! fire. The two policies differ on purpose and must not be unified.

use crate::matcher::match_trigger;
use hearth_common::{parse_color, MessageEvent, UserId};
use hearth_config::{DeliveryMode, TenantConfig};
use tracing::debug;

/// What to send in response to an auto-reply match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoReplyAction {
    /// 1-based position of the rule that matched.
    pub position: usize,
    /// Id of the rule that matched.
    pub rule_id: String,
    /// Message content, mention included.
    pub content: String,
    /// New message or reply to the trigger.
    pub mode: DeliveryMode,
}

/// What one channel-auto rule does to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAutoAction {
    /// 1-based position of the rule.
    pub position: usize,
    /// Id of the rule.
    pub rule_id: String,
    /// Reply content, mention included; `None` for reaction-only rules.
    pub reply: Option<String>,
    /// Reactions to add to the message.
    pub reactions: Vec<String>,
}

/// Reposts a message from the poem channel as an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemRelay {
    /// Text of the original message.
    pub content: String,
    /// Embed color.
    pub color: u32,
    /// Reactions to add to the relayed embed.
    pub reactions: Vec<String>,
    /// Image posted after the embed.
    pub image_url: Option<String>,
}

fn with_mention(author: UserId, mention: bool, text: &str) -> String {
    if mention {
        format!("{} {text}", author.mention())
    } else {
        text.to_string()
    }
}

/// Finds the first enabled, complete auto-reply rule matching the message.
#[must_use]
pub fn evaluate_auto_reply(config: &TenantConfig, event: &MessageEvent) -> Option<AutoReplyAction> {
    config
        .auto_replies
        .iter()
        .enumerate()
        .filter(|(_, rule)| {
            rule.enabled && !rule.trigger.trim().is_empty() && !rule.reply.trim().is_empty()
        })
        .find(|(_, rule)| {
            match_trigger(&event.text, &rule.trigger, rule.match_type, rule.case_sensitive)
        })
        .map(|(index, rule)| {
            debug!(rule = %rule.id, position = index + 1, "Auto-reply matched");
            AutoReplyAction {
                position: index + 1,
                rule_id: rule.id.clone(),
                content: with_mention(event.author, rule.mention, &rule.reply),
                mode: rule.mode,
            }
        })
}

/// Every enabled channel-auto rule watching the message's channel.
#[must_use]
pub fn evaluate_channel_auto(config: &TenantConfig, event: &MessageEvent) -> Vec<ChannelAutoAction> {
    config
        .channel_auto
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.enabled && rule.channel_id == Some(event.channel))
        .map(|(index, rule)| ChannelAutoAction {
            position: index + 1,
            rule_id: rule.id.clone(),
            reply: Some(rule.reply.trim())
                .filter(|reply| !reply.is_empty())
                .map(|reply| with_mention(event.author, rule.mention, reply)),
            reactions: rule.reactions.clone(),
        })
        .collect()
}

/// The relay for a message posted in the tenant's poem channel.
#[must_use]
pub fn evaluate_poem(config: &TenantConfig, event: &MessageEvent) -> Option<PoemRelay> {
    if config.poem_channel != Some(event.channel) || event.text.trim().is_empty() {
        return None;
    }

    let image_url = Some(config.image_url.trim())
        .filter(|url| config.show_image && !url.is_empty())
        .map(str::to_string);

    Some(PoemRelay {
        content: event.text.clone(),
        color: parse_color(&config.embed_color),
        reactions: if config.auto_react {
            hearth_config::dedup_reactions(&config.react_emojis)
        } else {
            Vec::new()
        },
        image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_common::test_utils::discord_fixtures::{message, test_channel_id, test_user_id};
    use hearth_common::ChannelId;
    use hearth_config::{AutoReplyRule, ChannelAutoRule, MatchType};

    fn reply_rule(id: &str, trigger: &str, reply: &str) -> AutoReplyRule {
        AutoReplyRule {
            id: id.to_string(),
            trigger: trigger.to_string(),
            reply: reply.to_string(),
            ..AutoReplyRule::default()
        }
    }

    #[test]
    fn test_first_match_wins() {
        let config = TenantConfig {
            auto_replies: vec![reply_rule("a", "hi", "one"), reply_rule("b", "hi there", "two")],
            ..TenantConfig::default()
        };

        let action = evaluate_auto_reply(&config, &message("hi there")).unwrap();
        assert_eq!(action.position, 1);
        assert_eq!(action.rule_id, "a");
        assert_eq!(action.content, "one");
        assert_eq!(action.mode, DeliveryMode::Reply);
    }

    #[test]
    fn test_disabled_and_incomplete_rules_are_skipped() {
        let mut disabled = reply_rule("a", "hi", "one");
        disabled.enabled = false;
        let config = TenantConfig {
            auto_replies: vec![
                disabled,
                reply_rule("b", "   ", "blank trigger"),
                reply_rule("c", "hi", ""),
                reply_rule("d", "hi", "four"),
            ],
            ..TenantConfig::default()
        };

        let action = evaluate_auto_reply(&config, &message("hi")).unwrap();
        assert_eq!(action.rule_id, "d");
        assert_eq!(action.position, 4);
    }

    #[test]
    fn test_mention_and_send_mode() {
        let mut rule = reply_rule("a", "hello", "welcome!");
        rule.mention = true;
        rule.mode = DeliveryMode::Send;
        rule.match_type = MatchType::Exact;
        let config = TenantConfig {
            auto_replies: vec![rule],
            ..TenantConfig::default()
        };

        let action = evaluate_auto_reply(&config, &message("  HELLO ")).unwrap();
        assert_eq!(action.content, format!("<@{}> welcome!", test_user_id()));
        assert_eq!(action.mode, DeliveryMode::Send);
        assert!(evaluate_auto_reply(&config, &message("hello you")).is_none());
    }

    #[test]
    fn test_all_channel_rules_fire() {
        let config = TenantConfig {
            channel_auto: vec![
                ChannelAutoRule {
                    id: "x".to_string(),
                    channel_id: Some(test_channel_id()),
                    reply: "Thanks!".to_string(),
                    mention: true,
                    ..ChannelAutoRule::default()
                },
                ChannelAutoRule {
                    id: "y".to_string(),
                    channel_id: Some(test_channel_id()),
                    reactions: vec!["👍".to_string()],
                    ..ChannelAutoRule::default()
                },
                ChannelAutoRule {
                    id: "z".to_string(),
                    channel_id: Some(ChannelId(1)),
                    reply: "elsewhere".to_string(),
                    ..ChannelAutoRule::default()
                },
            ],
            ..TenantConfig::default()
        };

        let actions = evaluate_channel_auto(&config, &message("anything"));
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].reply, Some(format!("<@{}> Thanks!", test_user_id())));
        assert_eq!(actions[1].reply, None);
        assert_eq!(actions[1].reactions, vec!["👍"]);
    }

    #[test]
    fn test_poem_relay() {
        let mut config = TenantConfig {
            poem_channel: Some(test_channel_id()),
            auto_react: true,
            image_url: "https://example.com/divider.png".to_string(),
            ..TenantConfig::default()
        };

        let relay = evaluate_poem(&config, &message("Roses are red")).unwrap();
        assert_eq!(relay.content, "Roses are red");
        assert_eq!(relay.color, 0x9B59B6);
        assert_eq!(relay.reactions, vec!["❤️", "🔥"]);
        assert_eq!(relay.image_url.as_deref(), Some("https://example.com/divider.png"));

        config.show_image = false;
        config.auto_react = false;
        let relay = evaluate_poem(&config, &message("Violets are blue")).unwrap();
        assert!(relay.reactions.is_empty());
        assert!(relay.image_url.is_none());

        assert!(evaluate_poem(&config, &message("   ")).is_none());
        config.poem_channel = None;
        assert!(evaluate_poem(&config, &message("Roses")).is_none());
    }
}

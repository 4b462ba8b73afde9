//! Trigger matching and the per-message entry point.

use crate::error::RuleError;
use crate::evaluate::{
    evaluate_auto_reply, evaluate_channel_auto, evaluate_poem, AutoReplyAction,
    ChannelAutoAction, PoemRelay,
};
use hearth_common::{ChannelId, MessageEvent, TenantId};
use hearth_config::{AutoReplyRule, ChannelAutoRule, ConfigStore, MatchType};
use std::sync::Arc;
use tracing::debug;

/// Compares message text with a trigger. Both sides are trimmed, and
/// compared case-insensitively unless `case_sensitive` is set.
#[must_use]
pub fn match_trigger(text: &str, trigger: &str, match_type: MatchType, case_sensitive: bool) -> bool {
    let (text, trigger) = if case_sensitive {
        (text.trim().to_string(), trigger.trim().to_string())
    } else {
        (text.trim().to_lowercase(), trigger.trim().to_lowercase())
    };

    match match_type {
        MatchType::Contains => text.contains(&trigger),
        MatchType::Exact => text == trigger,
        MatchType::StartsWith => text.starts_with(&trigger),
        MatchType::EndsWith => text.ends_with(&trigger),
    }
}

/// Everything the front end should do in response to one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageActions {
    /// Repost as a poem; when present the message is consumed and no other
    /// rule runs.
    pub poem: Option<PoemRelay>,
    /// The auto-reply to deliver, if any rule matched.
    pub auto_reply: Option<AutoReplyAction>,
    /// Every channel-auto rule that fired.
    pub channel_auto: Vec<ChannelAutoAction>,
}

impl MessageActions {
    /// Whether nothing needs doing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poem.is_none() && self.auto_reply.is_none() && self.channel_auto.is_empty()
    }
}

/// Evaluates stored rules against incoming messages.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    store: Arc<ConfigStore>,
}

impl RuleMatcher {
    /// Creates a matcher reading rules from `store`.
    pub const fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Decides how to respond to a message. Bot authors and messages outside
    /// a tenant produce no actions.
    pub fn on_message(&self, event: &MessageEvent) -> Result<MessageActions, RuleError> {
        if event.author_is_bot {
            return Ok(MessageActions::default());
        }
        let Some(tenant) = event.tenant else {
            return Ok(MessageActions::default());
        };

        let config = self.store.get_tenant(tenant)?;

        if let Some(poem) = evaluate_poem(&config, event) {
            debug!(tenant = %tenant, channel = %event.channel, "Relaying poem");
            return Ok(MessageActions {
                poem: Some(poem),
                ..MessageActions::default()
            });
        }

        Ok(MessageActions {
            poem: None,
            auto_reply: evaluate_auto_reply(&config, event),
            channel_auto: evaluate_channel_auto(&config, event),
        })
    }

    /// Reports which auto-reply rule would answer `text`, without
    /// delivering anything.
    pub fn test_auto_reply(
        &self,
        tenant: TenantId,
        text: &str,
    ) -> Result<Option<(usize, AutoReplyRule)>, RuleError> {
        let config = self.store.get_tenant(tenant)?;
        let sample = sample_event(tenant, ChannelId(u64::MAX), text);
        Ok(evaluate_auto_reply(&config, &sample).and_then(|action| {
            config
                .auto_replies
                .get(action.position - 1)
                .cloned()
                .map(|rule| (action.position, rule))
        }))
    }

    /// Reports which channel-auto rules would fire in `channel`, without
    /// delivering anything.
    pub fn test_channel_auto(
        &self,
        tenant: TenantId,
        channel: ChannelId,
    ) -> Result<Vec<(usize, ChannelAutoRule)>, RuleError> {
        let config = self.store.get_tenant(tenant)?;
        let sample = sample_event(tenant, channel, "");
        Ok(evaluate_channel_auto(&config, &sample)
            .into_iter()
            .filter_map(|action| {
                config
                    .channel_auto
                    .get(action.position - 1)
                    .cloned()
                    .map(|rule| (action.position, rule))
            })
            .collect())
    }
}

fn sample_event(tenant: TenantId, channel: ChannelId, text: &str) -> MessageEvent {
    MessageEvent {
        tenant: Some(tenant),
        channel,
        author: hearth_common::UserId(0),
        author_is_bot: false,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_contains_ignores_case_by_default() {
        assert!(match_trigger("Hello world", "hello", MatchType::Contains, false));
        assert!(!match_trigger("Hello world", "hello", MatchType::Contains, true));
    }

    #[test]
    fn test_exact_respects_case_sensitivity() {
        assert!(!match_trigger("Hello world", "hello", MatchType::Exact, true));
        assert!(match_trigger("  hello  ", "Hello", MatchType::Exact, false));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(match_trigger("good morning all", "good morning", MatchType::StartsWith, false));
        assert!(!match_trigger("well, good morning", "good morning", MatchType::StartsWith, false));
        assert!(match_trigger("see you later ", " LATER", MatchType::EndsWith, false));
    }

    #[test]
    fn test_non_ascii_case_folding() {
        assert!(match_trigger("ÉCOLE ouverte", "école", MatchType::StartsWith, false));
        assert!(match_trigger("السلام عليكم", "السلام", MatchType::StartsWith, true));
    }

    proptest! {
        #[test]
        fn prop_text_always_contains_itself(text in "\\PC{0,40}") {
            prop_assert!(match_trigger(&text, &text, MatchType::Contains, true));
            prop_assert!(match_trigger(&text, &text, MatchType::Exact, false));
        }

        #[test]
        fn prop_exact_implies_prefix_and_suffix(text in "[a-zA-Z ]{0,30}", case_sensitive: bool) {
            if match_trigger(&text, &text, MatchType::Exact, case_sensitive) {
                prop_assert!(match_trigger(&text, &text, MatchType::StartsWith, case_sensitive));
                prop_assert!(match_trigger(&text, &text, MatchType::EndsWith, case_sensitive));
            }
        }
    }
}

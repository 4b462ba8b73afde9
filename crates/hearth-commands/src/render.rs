//! Text shown in command responses.

use hearth_common::truncate_string;
use hearth_config::{AutoReplyRule, ChannelAutoRule, TenantConfig};
use hearth_giveaway::{JoinOutcome, Resolution};
use hearth_rules::Page;

const PREVIEW_CHARS: usize = 60;

fn state_marker(enabled: bool) -> &'static str {
    if enabled {
        "✅"
    } else {
        "⏸️"
    }
}

/// One line describing an auto-reply rule.
#[must_use]
pub fn auto_reply_line(position: usize, rule: &AutoReplyRule) -> String {
    let mut flags = vec![rule.match_type.as_str(), rule.mode.as_str()];
    if rule.case_sensitive {
        flags.push("case-sensitive");
    }
    if rule.mention {
        flags.push("mention");
    }
    format!(
        "{} **#{position}** `{}` → {} ({})",
        state_marker(rule.enabled),
        truncate_string(&rule.trigger, PREVIEW_CHARS),
        truncate_string(&rule.reply, PREVIEW_CHARS),
        flags.join(", ")
    )
}

/// One line describing a channel-auto rule.
#[must_use]
pub fn channel_auto_line(position: usize, rule: &ChannelAutoRule) -> String {
    let channel = rule
        .channel_id
        .map_or_else(|| "(no channel)".to_string(), |channel| channel.mention());
    let mut parts = Vec::new();
    if !rule.reply.trim().is_empty() {
        parts.push(truncate_string(&rule.reply, PREVIEW_CHARS));
    }
    if !rule.reactions.is_empty() {
        parts.push(format!("reacts {}", rule.reactions.join(" ")));
    }
    if rule.mention {
        parts.push("mention".to_string());
    }
    format!(
        "{} **#{position}** {channel}: {}",
        state_marker(rule.enabled),
        parts.join(" · ")
    )
}

/// A page of rules as a list body, or `empty` when there are none.
#[must_use]
pub fn page_body<T>(page: &Page<T>, empty: &str, line: impl Fn(usize, &T) -> String) -> String {
    if page.is_empty() {
        return empty.to_string();
    }
    page.entries
        .iter()
        .map(|(position, rule)| line(*position, rule))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Footer for a page, 1-based.
#[must_use]
pub fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "Page {}/{} · {} rule{}",
        page.page + 1,
        page.total_pages,
        page.total,
        if page.total == 1 { "" } else { "s" }
    )
}

/// Name/value pairs summarizing a tenant's configuration.
#[must_use]
pub fn config_summary(config: &TenantConfig) -> Vec<(String, String)> {
    let yes_no = |flag: bool| if flag { "on" } else { "off" };
    let poem_channel = config
        .poem_channel
        .map_or_else(|| "not set".to_string(), |channel| channel.mention());
    let giveaway_channel = config
        .giveaway
        .channel_id
        .map_or_else(|| "where the command is used".to_string(), |channel| channel.mention());
    let reactions = if config.react_emojis.is_empty() {
        "none".to_string()
    } else {
        config.react_emojis.join(" ")
    };

    vec![
        ("Poem channel".to_string(), poem_channel),
        ("Embed color".to_string(), config.embed_color.clone()),
        (
            "Image".to_string(),
            format!("{} {}", yes_no(config.show_image), config.image_url),
        ),
        (
            "Auto react".to_string(),
            format!("{} {reactions}", yes_no(config.auto_react)),
        ),
        (
            "Rules".to_string(),
            format!(
                "{} auto-replies, {} channel rules",
                config.auto_replies.len(),
                config.channel_auto.len()
            ),
        ),
        (
            "Giveaways".to_string(),
            format!(
                "{}, {} winner(s), {} in {}",
                config.giveaway.duration, config.giveaway.winners, config.giveaway.emoji, giveaway_channel
            ),
        ),
    ]
}

/// Ephemeral answer to a join button press.
#[must_use]
pub fn join_reply(outcome: JoinOutcome) -> String {
    match outcome {
        JoinOutcome::Joined { entries } => {
            format!("🎉 You joined the giveaway! There are now {entries} entries.")
        }
        JoinOutcome::AlreadyJoined => "You already joined this giveaway.".to_string(),
        JoinOutcome::NotFound => "This giveaway has ended.".to_string(),
        JoinOutcome::BotRejected => "Bots cannot join giveaways.".to_string(),
    }
}

/// Answer to a manual giveaway end.
#[must_use]
pub fn resolution_reply(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Drawn { winners, entries } => format!(
            "Giveaway ended with {entries} entries; {} winner(s) announced.",
            winners.len()
        ),
        Resolution::NoEntries => "Giveaway ended without any entries.".to_string(),
        Resolution::Discarded => {
            "The giveaway announcement is gone, so the giveaway was discarded.".to_string()
        }
        Resolution::AlreadyResolved => "That giveaway has already ended.".to_string(),
    }
}

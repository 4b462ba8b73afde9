//! Configuration schema definitions for a single tenant.
//!
//! Every struct here is camelCase on disk and tolerant of missing fields.
//! Keys the schema does not know about are collected into `extra` maps so a
//! typed read-modify-write never drops data written by other tools.

use hearth_common::{ChannelId, RoleId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Everything one tenant has configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantConfig {
    /// Channel whose messages are relayed as poem embeds.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub poem_channel: Option<ChannelId>,
    /// Embed color for relayed poems.
    pub embed_color: String,
    /// Whether the decorative image is posted after a relayed poem.
    pub show_image: bool,
    /// Decorative image posted after a relayed poem.
    pub image_url: String,
    /// Whether relayed poems receive reactions.
    pub auto_react: bool,
    /// Reactions added to relayed poems.
    pub react_emojis: Vec<String>,
    /// Ticket desk settings.
    pub tickets: TicketConfig,
    /// Pattern-triggered replies, evaluated in order.
    pub auto_replies: Vec<AutoReplyRule>,
    /// Channel-scoped automatic responses.
    pub channel_auto: Vec<ChannelAutoRule>,
    /// Defaults applied when a giveaway is started.
    pub giveaway: GiveawayDefaults,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Defaults for giveaways started in a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiveawayDefaults {
    /// Channel announcements go to when the host does not name one.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub channel_id: Option<ChannelId>,
    /// Duration text, e.g. `1h`.
    pub duration: String,
    /// Winner count.
    pub winners: u32,
    /// Emoji shown on the announcement and join button.
    pub emoji: String,
    /// Announcement embed color.
    pub color: String,
    /// Announcement image, empty for none.
    pub image_url: String,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How an auto-reply trigger is compared with message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MatchType {
    /// Trigger appears anywhere in the text.
    #[default]
    Contains,
    /// Text equals the trigger.
    Exact,
    /// Text begins with the trigger.
    StartsWith,
    /// Text ends with the trigger.
    EndsWith,
}

/// Error for unrecognized match type or delivery mode names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected text.
    pub value: String,
    /// Accepted names.
    pub expected: &'static str,
}

impl MatchType {
    /// Name as stored on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Exact => "exact",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
        }
    }
}

impl FromStr for MatchType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "exact" => Ok(Self::Exact),
            "startswith" | "starts_with" => Ok(Self::StartsWith),
            "endswith" | "ends_with" => Ok(Self::EndsWith),
            _ => Err(UnknownVariant {
                kind: "match type",
                value: s.to_string(),
                expected: "contains, exact, startswith, endswith",
            }),
        }
    }
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|err| {
            tracing::warn!("{err}; treating as contains");
            Self::Contains
        })
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an auto-reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DeliveryMode {
    /// Post a new message in the channel.
    Send,
    /// Reply to the triggering message.
    #[default]
    Reply,
}

impl DeliveryMode {
    /// Name as stored on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Reply => "reply",
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "send" => Ok(Self::Send),
            "reply" => Ok(Self::Reply),
            _ => Err(UnknownVariant {
                kind: "delivery mode",
                value: s.to_string(),
                expected: "send, reply",
            }),
        }
    }
}

impl From<String> for DeliveryMode {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|err| {
            tracing::warn!("{err}; treating as reply");
            Self::Reply
        })
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pattern-triggered reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoReplyRule {
    /// Stable identifier, assigned on first save.
    pub id: String,
    /// Text the message is compared with.
    pub trigger: String,
    /// Reply content.
    pub reply: String,
    /// Comparison policy.
    pub match_type: MatchType,
    /// Whether the reply is a new message or a reply.
    pub mode: DeliveryMode,
    /// Whether the reply starts with the author's mention.
    pub mention: bool,
    /// Whether comparison keeps letter case.
    pub case_sensitive: bool,
    /// Disabled rules are skipped.
    pub enabled: bool,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A response fired for every message in one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelAutoRule {
    /// Stable identifier, assigned on first save.
    pub id: String,
    /// Channel the rule watches.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub channel_id: Option<ChannelId>,
    /// Reply content, empty for reactions only.
    pub reply: String,
    /// Reactions added to each message, duplicates removed.
    #[serde(deserialize_with = "deserialize_reactions")]
    pub reactions: Vec<String>,
    /// Whether the reply starts with the author's mention.
    pub mention: bool,
    /// Disabled rules are skipped.
    pub enabled: bool,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads an optional id, treating `null` and blank strings as unset. Forms
/// that clear a channel picker write `""`.
fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Removes blank entries and duplicates while keeping first-seen order.
#[must_use]
pub fn dedup_reactions<I, S>(reactions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for reaction in reactions {
        let reaction = reaction.as_ref().trim();
        if !reaction.is_empty() && !unique.iter().any(|seen| seen == reaction) {
            unique.push(reaction.to_string());
        }
    }
    unique
}

fn deserialize_reactions<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup_reactions(raw))
}

/// Ticket desk settings. Only stored and defaulted here; the desk itself
/// lives outside this workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketConfig {
    /// Category new ticket channels are created under.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<ChannelId>,
    /// Channel ticket events are logged to.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub log_channel_id: Option<ChannelId>,
    /// Role pinged by the "ping admin" button.
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub admin_role_id: Option<RoleId>,
    /// Roles allowed to handle tickets.
    pub support_roles: Vec<RoleId>,
    /// Roles pinged when a ticket opens.
    pub ping_roles: Vec<RoleId>,
    /// Panel embed title.
    pub panel_title: String,
    /// Panel embed description.
    pub panel_description: String,
    /// Panel embed image.
    pub panel_image: String,
    /// Panel embed author name.
    pub panel_author_name: String,
    /// Panel embed author icon.
    pub panel_author_icon: String,
    /// Ticket embed color.
    pub embed_color: String,
    /// Placeholder of the ticket type dropdown.
    pub dropdown_placeholder: String,
    /// Placeholder of the in-ticket management menu.
    pub menu_placeholder: String,
    /// Last issued ticket number.
    pub ticket_counter: u64,
    /// Ticket types offered in the dropdown.
    pub ticket_options: Vec<TicketOption>,
    /// Button labels, emoji and styles.
    pub buttons: TicketButtons,
    /// Message templates.
    pub messages: TicketMessages,
    /// Management menu entries.
    pub menu_options: TicketMenuOptions,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One ticket type in the panel dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketOption {
    /// Dropdown label.
    pub label: String,
    /// Dropdown description.
    pub description: String,
    /// Dropdown emoji.
    pub emoji: String,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Labels, emoji and styles of the in-ticket buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct TicketButtons {
    pub close: String,
    pub close_emoji: String,
    pub close_style: String,
    pub claim: String,
    pub claim_emoji: String,
    pub claim_style: String,
    pub ping_admin: String,
    pub ping_admin_emoji: String,
    pub ping_admin_style: String,
    pub mention_member: String,
    pub mention_member_emoji: String,
    pub mention_member_style: String,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message templates used by the ticket desk. `@ADMIN` and `@MEMBER` are
/// substituted by the desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct TicketMessages {
    pub ticket_created_desc: String,
    pub ticket_created_success: String,
    pub ticket_by_label: String,
    pub by_emoji: String,
    pub reason_field_name: String,
    pub reason_label: String,
    pub modal_title: String,
    pub modal_placeholder: String,
    pub footer_text: String,
    pub claim_message: String,
    pub claim_emoji: String,
    pub ping_admin_message: String,
    pub mention_member_message: String,
    pub ticket_number_text: String,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the in-ticket management menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuOption {
    /// Menu label.
    pub label: String,
    /// Menu emoji.
    pub emoji: String,
    /// Menu description.
    pub description: String,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The management menu entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketMenuOptions {
    /// Rename the ticket channel.
    pub rename: MenuOption,
    /// Add a member to the ticket.
    pub add_user: MenuOption,
    /// Remove a member from the ticket.
    pub remove_user: MenuOption,
    /// Reset the menu selection.
    pub reset: MenuOption,
    /// Keys written by other tools, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

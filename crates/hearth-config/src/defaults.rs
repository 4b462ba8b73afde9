//! Default values for every tenant setting.
//!
//! These are also the templates the migrator backfills from, so adding a
//! field here is enough for existing tenants to receive it on next access.

use crate::schema::*;
use serde_json::Map;

/// Color of relayed poems when nothing is configured.
pub const DEFAULT_EMBED_COLOR: &str = "#9B59B6";

/// Color of giveaway announcements when nothing is configured.
pub const DEFAULT_GIVEAWAY_COLOR: &str = "#5865F2";

/// Giveaway duration when nothing is configured.
pub const DEFAULT_GIVEAWAY_DURATION: &str = "1h";

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            poem_channel: None,
            embed_color: DEFAULT_EMBED_COLOR.to_string(),
            show_image: true,
            image_url: String::new(),
            auto_react: false,
            react_emojis: vec!["❤️".to_string(), "🔥".to_string()],
            tickets: TicketConfig::default(),
            auto_replies: Vec::new(),
            channel_auto: Vec::new(),
            giveaway: GiveawayDefaults::default(),
            extra: Map::new(),
        }
    }
}

impl Default for GiveawayDefaults {
    fn default() -> Self {
        Self {
            channel_id: None,
            duration: DEFAULT_GIVEAWAY_DURATION.to_string(),
            winners: 1,
            emoji: "🎉".to_string(),
            color: DEFAULT_GIVEAWAY_COLOR.to_string(),
            image_url: String::new(),
            extra: Map::new(),
        }
    }
}

impl Default for AutoReplyRule {
    fn default() -> Self {
        Self {
            id: String::new(),
            trigger: String::new(),
            reply: String::new(),
            match_type: MatchType::Contains,
            mode: DeliveryMode::Reply,
            mention: false,
            case_sensitive: false,
            enabled: true,
            extra: Map::new(),
        }
    }
}

impl Default for ChannelAutoRule {
    fn default() -> Self {
        Self {
            id: String::new(),
            channel_id: None,
            reply: String::new(),
            reactions: Vec::new(),
            mention: false,
            enabled: true,
            extra: Map::new(),
        }
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            category_id: None,
            log_channel_id: None,
            admin_role_id: None,
            support_roles: Vec::new(),
            ping_roles: Vec::new(),
            panel_title: "Support Tickets".to_string(),
            panel_description: "Pick a ticket type below to open a private channel with the team."
                .to_string(),
            panel_image: String::new(),
            panel_author_name: "Ticket System".to_string(),
            panel_author_icon: String::new(),
            embed_color: DEFAULT_EMBED_COLOR.to_string(),
            dropdown_placeholder: "Select a ticket type".to_string(),
            menu_placeholder: "Manage this ticket".to_string(),
            ticket_counter: 0,
            ticket_options: vec![
                TicketOption {
                    label: "Support".to_string(),
                    description: "Get help from the team".to_string(),
                    emoji: "🎫".to_string(),
                    ..TicketOption::default()
                },
                TicketOption {
                    label: "Report".to_string(),
                    description: "Report a member or a problem".to_string(),
                    emoji: "⚠️".to_string(),
                    ..TicketOption::default()
                },
            ],
            buttons: TicketButtons::default(),
            messages: TicketMessages::default(),
            menu_options: TicketMenuOptions::default(),
            extra: Map::new(),
        }
    }
}

impl Default for TicketButtons {
    fn default() -> Self {
        Self {
            close: "Close".to_string(),
            close_emoji: "🔒".to_string(),
            close_style: "danger".to_string(),
            claim: "Claim".to_string(),
            claim_emoji: "✋".to_string(),
            claim_style: "success".to_string(),
            ping_admin: "Call staff".to_string(),
            ping_admin_emoji: "📢".to_string(),
            ping_admin_style: "secondary".to_string(),
            mention_member: "Mention member".to_string(),
            mention_member_emoji: "👤".to_string(),
            mention_member_style: "secondary".to_string(),
            extra: Map::new(),
        }
    }
}

impl Default for TicketMessages {
    fn default() -> Self {
        Self {
            ticket_created_desc: "Thanks for reaching out. The team will be with you shortly."
                .to_string(),
            ticket_created_success: "✅ Your ticket has been opened".to_string(),
            ticket_by_label: "Opened by".to_string(),
            by_emoji: "👤".to_string(),
            reason_field_name: "REASON:".to_string(),
            reason_label: "Reason".to_string(),
            modal_title: "Open a ticket".to_string(),
            modal_placeholder: "Tell us why you are opening this ticket".to_string(),
            footer_text: String::new(),
            claim_message: "This ticket has been claimed by".to_string(),
            claim_emoji: "✋".to_string(),
            ping_admin_message: "Staff has been called @ADMIN".to_string(),
            mention_member_message: "@MEMBER please take a look".to_string(),
            ticket_number_text: "Ticket".to_string(),
            extra: Map::new(),
        }
    }
}

impl Default for TicketMenuOptions {
    fn default() -> Self {
        Self {
            rename: MenuOption {
                label: "Rename ticket".to_string(),
                emoji: "✏️".to_string(),
                description: "Change the ticket channel name".to_string(),
                ..MenuOption::default()
            },
            add_user: MenuOption {
                label: "Add member".to_string(),
                emoji: "➕".to_string(),
                description: "Give a member access to this ticket".to_string(),
                ..MenuOption::default()
            },
            remove_user: MenuOption {
                label: "Remove member".to_string(),
                emoji: "➖".to_string(),
                description: "Remove a member from this ticket".to_string(),
                ..MenuOption::default()
            },
            reset: MenuOption {
                label: "Reset menu".to_string(),
                emoji: "🔄".to_string(),
                description: "Clear the current selection".to_string(),
                ..MenuOption::default()
            },
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_defaults() {
        let tenant = TenantConfig::default();
        assert_eq!(tenant.embed_color, "#9B59B6");
        assert!(tenant.show_image);
        assert!(!tenant.auto_react);
        assert_eq!(tenant.react_emojis, vec!["❤️", "🔥"]);
        assert!(tenant.auto_replies.is_empty());
        assert_eq!(tenant.giveaway.duration, "1h");
        assert_eq!(tenant.giveaway.winners, 1);
        assert_eq!(tenant.giveaway.color, "#5865F2");
    }

    #[test]
    fn test_new_rules_start_enabled() {
        assert!(AutoReplyRule::default().enabled);
        assert!(ChannelAutoRule::default().enabled);
    }

    #[test]
    fn test_ticket_defaults_have_every_label() {
        let tickets = TicketConfig::default();
        assert_eq!(tickets.ticket_counter, 0);
        assert!(!tickets.buttons.close.is_empty());
        assert!(!tickets.messages.reason_label.is_empty());
        assert!(!tickets.menu_options.add_user.label.is_empty());
        assert_eq!(tickets.ticket_options.len(), 2);
    }

    #[test]
    fn test_partial_ticket_entries_fill_blanks() {
        let tickets: TicketConfig = serde_json::from_value(serde_json::json!({
            "ticketOptions": [{"label": "Appeal"}],
            "menuOptions": {"rename": {"label": "Rename"}}
        }))
        .unwrap();
        assert_eq!(tickets.ticket_options[0].label, "Appeal");
        assert_eq!(tickets.ticket_options[0], TicketOption {
            label: "Appeal".to_string(),
            ..TicketOption::default()
        });
        assert!(tickets.menu_options.rename.emoji.is_empty());
        assert_eq!(tickets.menu_options.reset, TicketMenuOptions::default().reset);
    }
}

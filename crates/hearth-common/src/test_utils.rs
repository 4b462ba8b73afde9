//! Test utilities and shared test helpers for Hearth Bot.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, MessageEvent, TenantId, UserId};

    /// Create a test tenant ID.
    pub fn test_tenant_id() -> TenantId {
        TenantId(111_111_111_111_111_111)
    }

    /// Create a test channel ID.
    pub fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Create a test user ID.
    pub fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count)
            .map(|i| UserId(100_000_000_000_000_000 + i as u64))
            .collect()
    }

    /// A human-authored message in the test tenant and channel.
    pub fn message(text: &str) -> MessageEvent {
        MessageEvent {
            tenant: Some(test_tenant_id()),
            channel: test_channel_id(),
            author: test_user_id(),
            author_is_bot: false,
            text: text.to_string(),
        }
    }
}

/// Configuration documents in the shapes found on disk.
pub mod config_fixtures {
    /// A single-tenant document written before tenants existed.
    pub fn legacy_flat_json() -> &'static str {
        r##"{
    "poem_channel": 555000000000000001,
    "embed_color": "#FF0000",
    "show_image": false,
    "image_url": "https://example.com/banner.png",
    "auto_react": true,
    "react_emojis": ["🌹"],
    "tickets": {
        "category_id": 555000000000000002,
        "ticket_counter": 41,
        "buttons": {
            "close": "Close it"
        },
        "messages": {
            "reason_label": "Why?"
        }
    }
}"##
    }

    /// A multi-tenant document using the older `servers` key.
    pub fn servers_json() -> &'static str {
        r##"{
    "servers": {
        "111111111111111111": {
            "poem_channel": null,
            "embed_color": "#9B59B6",
            "tickets": {
                "category_id": null,
                "log_channel_id": null,
                "admin_role_id": null
            },
            "custom_widget": {"kept": true}
        }
    }
}"##
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::{ChannelId, UserId};
    use proptest::prelude::*;

    /// Strategy for generating valid Discord channel IDs.
    pub fn channel_id_strategy() -> impl Strategy<Value = ChannelId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(ChannelId)
    }

    /// Strategy for generating valid Discord user IDs.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(UserId)
    }
}

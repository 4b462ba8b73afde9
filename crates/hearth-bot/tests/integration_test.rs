//! Integration tests for hearth-bot crate.
//!
//! These cover startup wiring that does not need a Discord connection.

use hearth_bot::{BotError, HearthBot};
use hearth_common::test_utils::create_temp_dir;
use hearth_common::test_utils::discord_fixtures::test_tenant_id;
use hearth_common::HearthError;
use hearth_config::{BotSettings, SettingsError};

fn settings(dir: &tempfile::TempDir) -> BotSettings {
    BotSettings {
        discord_token: "token".to_string(),
        config_path: dir.path().join("hearth_config.json"),
        ..BotSettings::default()
    }
}

#[test]
fn test_bot_store_uses_configured_path() {
    let dir = create_temp_dir();
    let bot = HearthBot::new(settings(&dir));

    assert_eq!(bot.store().path(), dir.path().join("hearth_config.json"));
    let config = bot.store().get_tenant(test_tenant_id()).unwrap();
    assert_eq!(config.giveaway.winners, 1);
    assert!(dir.path().join("hearth_config.json").exists());
}

#[test]
fn test_missing_token_is_a_settings_error() {
    let dir = create_temp_dir();
    let mut settings = settings(&dir);
    settings.discord_token = "  ".to_string();

    let err = BotError::from(settings.validate().unwrap_err());
    assert!(matches!(err, BotError::Settings(SettingsError::Missing(_))));
    assert!(matches!(HearthError::from(err), HearthError::Config { .. }));
}

//! Integration tests for hearth-config crate.

use hearth_common::test_utils::config_fixtures::{legacy_flat_json, servers_json};
use hearth_common::test_utils::discord_fixtures::test_tenant_id;
use hearth_common::{ChannelId, TenantId};
use hearth_config::{AutoReplyRule, ConfigError, ConfigStore, TenantConfig};
use serde_json::{json, Map, Value};
use std::fs;
use std::sync::Arc;

fn partial(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn store_with(content: Option<&str>) -> (tempfile::TempDir, ConfigStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth_config.json");
    if let Some(content) = content {
        fs::write(&path, content).unwrap();
    }
    (dir, ConfigStore::new(path))
}

#[test]
fn test_update_color_leaves_tickets_unchanged() {
    let (_dir, store) = store_with(None);
    let before = store.get_tenant(test_tenant_id()).unwrap();

    let after = store
        .update_tenant(test_tenant_id(), partial(json!({"embedColor": "red"})))
        .unwrap();

    assert_eq!(after.embed_color, "red");
    assert_eq!(after.tickets, before.tickets);
    assert_eq!(store.get_tenant(test_tenant_id()).unwrap(), after);
}

#[test]
fn test_update_accepts_legacy_key_spelling() {
    let (_dir, store) = store_with(None);
    let after = store
        .update_tenant(test_tenant_id(), partial(json!({"embed_color": "#123456"})))
        .unwrap();

    assert_eq!(after.embed_color, "#123456");
    assert!(after.extra.is_empty());
}

#[test]
fn test_update_replaces_lists_wholesale() {
    let (_dir, store) = store_with(None);
    store
        .update_tenant(
            test_tenant_id(),
            partial(json!({"autoReplies": [
                {"trigger": "a", "reply": "1"},
                {"trigger": "b", "reply": "2"}
            ]})),
        )
        .unwrap();

    let after = store
        .update_tenant(
            test_tenant_id(),
            partial(json!({"autoReplies": [{"trigger": "c", "reply": "3"}]})),
        )
        .unwrap();

    let triggers: Vec<&str> = after.auto_replies.iter().map(|r| r.trigger.as_str()).collect();
    assert_eq!(triggers, vec!["c"]);
    assert!(!after.auto_replies[0].id.is_empty());
}

#[test]
fn test_legacy_document_is_adopted_with_values_preserved() {
    let (_dir, store) = store_with(Some(legacy_flat_json()));

    let config = store.get_tenant(test_tenant_id()).unwrap();
    assert_eq!(config.poem_channel, Some(ChannelId(555_000_000_000_000_001)));
    assert_eq!(config.embed_color, "#FF0000");
    assert!(!config.show_image);
    assert_eq!(config.image_url, "https://example.com/banner.png");
    assert!(config.auto_react);
    assert_eq!(config.react_emojis, vec!["🌹"]);
    assert_eq!(config.tickets.category_id, Some(ChannelId(555_000_000_000_000_002)));
    assert_eq!(config.tickets.ticket_counter, 41);
    assert_eq!(config.tickets.buttons.close, "Close it");
    assert_eq!(config.tickets.messages.reason_label, "Why?");
    assert!(!config.tickets.buttons.claim.is_empty());
    assert_eq!(config.giveaway.duration, "1h");

    // The upgraded shape is on disk and the legacy record is not adopted twice.
    let document: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert!(document.get("embed_color").is_none());
    assert!(document["tenants"][test_tenant_id().to_string()]["embedColor"].is_string());

    let other = store.get_tenant(TenantId(222)).unwrap();
    assert_eq!(other, TenantConfig::default());
}

#[test]
fn test_servers_document_keeps_unknown_keys() {
    let (_dir, store) = store_with(Some(servers_json()));

    let config = store.get_tenant(test_tenant_id()).unwrap();
    assert_eq!(config.extra.get("custom_widget"), Some(&json!({"kept": true})));
    assert!(!config.tickets.messages.modal_title.is_empty());

    store
        .update_tenant(test_tenant_id(), partial(json!({"autoReact": true})))
        .unwrap();

    let document: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert!(document.get("servers").is_none());
    let record = &document["tenants"][test_tenant_id().to_string()];
    assert_eq!(record["custom_widget"], json!({"kept": true}));
    assert_eq!(record["autoReact"], json!(true));
}

#[test]
fn test_corrupt_file_falls_back_to_empty_shell() {
    let (dir, store) = store_with(Some("{\"tenants\": {\"1\": "));

    let document = store.load();
    assert!(document.tenants.is_empty());
    assert!(document.legacy.is_none());

    assert_eq!(store.get_tenant(test_tenant_id()).unwrap(), TenantConfig::default());
    assert!(dir.path().join("hearth_config.json.corrupt").exists());
}

#[test]
fn test_atomic_save_leaves_no_temp_files() {
    let (dir, store) = store_with(None);
    for color in ["red", "blue", "green"] {
        store
            .update_tenant(test_tenant_id(), partial(json!({"embedColor": color})))
            .unwrap();
    }

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["hearth_config.json"]);
}

#[test]
fn test_ticket_config_written_back_only_when_incomplete() {
    let complete = serde_json::to_string(&json!({
        "tenants": { test_tenant_id().to_string(): TenantConfig::default() }
    }))
    .unwrap();
    let (_dir, store) = store_with(Some(&complete));

    store.get_ticket_config(test_tenant_id()).unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap(), complete);

    let incomplete = json!({"tenants": {test_tenant_id().to_string(): {"tickets": {"panelTitle": "Desk"}}}});
    fs::write(store.path(), incomplete.to_string()).unwrap();

    let tickets = store.get_ticket_config(test_tenant_id()).unwrap();
    assert_eq!(tickets.panel_title, "Desk");
    assert!(!tickets.buttons.ping_admin.is_empty());
    assert_ne!(fs::read_to_string(store.path()).unwrap(), incomplete.to_string());
}

#[test]
fn test_next_ticket_number_increments() {
    let (_dir, store) = store_with(None);
    assert_eq!(store.next_ticket_number(test_tenant_id()).unwrap(), 1);
    assert_eq!(store.next_ticket_number(test_tenant_id()).unwrap(), 2);
    assert_eq!(store.get_ticket_config(test_tenant_id()).unwrap().ticket_counter, 2);
}

#[test]
fn test_malformed_stored_values_fall_back_per_field() {
    let (_dir, store) = store_with(Some(
        r##"{"tenants": {"111111111111111111": {"poemChannel": "", "embedColor": "#222222", "giveaway": {"winners": "many"}}}}"##,
    ));

    let config = store.get_tenant(test_tenant_id()).unwrap();
    assert_eq!(config.poem_channel, None);
    assert_eq!(config.embed_color, "#222222");
    assert_eq!(config.giveaway.winners, 1);

    store
        .update_tenant(test_tenant_id(), partial(json!({"autoReact": true})))
        .unwrap();
    let err = store
        .update_tenant(test_tenant_id(), partial(json!({"giveaway": {"winners": "all"}})))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

#[test]
fn test_undecodable_file_keeps_other_tenants_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth_config.json");
    let mut bytes = br##"{"tenants":{"2":{"embedColor":"#111111"}},"note":""##.to_vec();
    bytes.extend_from_slice(&[0xC7, b'"', b'}']);
    fs::write(&path, &bytes).unwrap();

    let store = ConfigStore::new(&path);
    assert_eq!(store.get_tenant(TenantId(1)).unwrap(), TenantConfig::default());

    let copy = fs::read(dir.path().join("hearth_config.json.corrupt")).unwrap();
    assert_eq!(copy, bytes);
}

#[test]
fn test_unreadable_path_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth_config.json");
    fs::create_dir(&path).unwrap();
    let store = ConfigStore::new(&path);

    assert_eq!(store.get_tenant(test_tenant_id()).unwrap(), TenantConfig::default());
    let err = store
        .update_tenant(test_tenant_id(), partial(json!({"embedColor": "red"})))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Unreadable { .. }));
    assert!(path.is_dir());
}

#[test]
fn test_unknown_rule_keys_survive_typed_rewrite() {
    let (_dir, store) = store_with(Some(
        r#"{"tenants": {"111111111111111111": {"autoReplies": [{"id": "a", "trigger": "hi", "reply": "yo", "createdBy": "dashboard"}]}}}"#,
    ));

    store
        .modify_tenant(test_tenant_id(), |config| {
            config.auto_replies[0].enabled = false;
            config.tickets.menu_options.reset.label = "Start over".to_string();
            Ok::<_, ConfigError>(())
        })
        .unwrap();

    let document: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let rule = &document["tenants"][test_tenant_id().to_string()]["autoReplies"][0];
    assert_eq!(rule["createdBy"], json!("dashboard"));
    assert_eq!(rule["enabled"], json!(false));
}

#[test]
fn test_concurrent_writers_do_not_lose_updates() {
    let (_dir, store) = store_with(None);
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store
                    .modify_tenant(test_tenant_id(), |config| {
                        config.auto_replies.push(AutoReplyRule {
                            id: format!("rule-{n}"),
                            trigger: format!("t{n}"),
                            reply: "r".to_string(),
                            ..AutoReplyRule::default()
                        });
                        Ok::<_, ConfigError>(())
                    })
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_tenant(test_tenant_id()).unwrap().auto_replies.len(), 8);
}

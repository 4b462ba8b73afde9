//! Lazy migration of stored tenant records to the current schema.
//!
//! Records are migrated at the JSON value level rather than through the
//! typed schema, so that values the schema does not know about pass through
//! untouched. Three things happen to every record on access:
//!
//! 1. snake_case keys from the single-tenant format are renamed to their
//!    camelCase successors, unless the camelCase key already exists;
//! 2. missing fields are filled in from [`TenantConfig::default`], without
//!    replacing anything already present;
//! 3. rules without a stable id receive one.

use crate::schema::{AutoReplyRule, ChannelAutoRule, TenantConfig};
use serde::Serialize;
use serde_json::{Map, Value};

/// Key of the auto-reply rule list inside a tenant record.
pub const AUTO_REPLIES_KEY: &str = "autoReplies";

/// Key of the channel-auto rule list inside a tenant record.
pub const CHANNEL_AUTO_KEY: &str = "channelAuto";

/// Brings raw tenant records up to the current schema.
#[derive(Debug, Clone)]
pub struct DefaultingMigrator {
    tenant_template: Value,
    auto_reply_template: Value,
    channel_auto_template: Value,
}

impl Default for DefaultingMigrator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultingMigrator {
    /// Creates a migrator whose templates are the current schema defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tenant_template: template(&TenantConfig::default()),
            auto_reply_template: rule_template(&AutoReplyRule::default()),
            channel_auto_template: rule_template(&ChannelAutoRule::default()),
        }
    }

    /// A complete record for a tenant that has never been configured.
    #[must_use]
    pub fn fresh_tenant(&self) -> Value {
        self.tenant_template.clone()
    }

    /// Migrates one tenant record in place. Returns whether anything changed.
    pub fn migrate_tenant(&self, record: &mut Value) -> bool {
        if !record.is_object() {
            tracing::warn!("Tenant record is not an object, replacing it with defaults");
            *record = self.fresh_tenant();
            return true;
        }

        let mut changed = rename_legacy_keys(record, &self.tenant_template);
        changed |= backfill(record, &self.tenant_template);
        changed |= normalize_rules(record, AUTO_REPLIES_KEY, &self.auto_reply_template);
        changed |= normalize_rules(record, CHANNEL_AUTO_KEY, &self.channel_auto_template);
        changed
    }

    /// Maps a top-level key to its current spelling, so `embed_color` and
    /// `embedColor` address the same field.
    #[must_use]
    pub fn canonical_key(&self, key: &str) -> String {
        let camel = snake_to_camel(key);
        match &self.tenant_template {
            Value::Object(fields) if fields.contains_key(&camel) => camel,
            _ => key.to_string(),
        }
    }
}

/// Inserts every key of `defaults` missing from `target`, recursing into
/// nested objects. Existing values are never replaced, except a `null` where
/// the default is an object. Lists are treated as opaque values.
///
/// Returns whether anything was inserted.
pub fn backfill(target: &mut Value, defaults: &Value) -> bool {
    let (Value::Object(fields), Value::Object(template)) = (target, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default) in template {
        match fields.get_mut(key) {
            None => {
                fields.insert(key.clone(), default.clone());
                changed = true;
            }
            Some(existing) if existing.is_null() && default.is_object() => {
                *existing = default.clone();
                changed = true;
            }
            Some(existing) => changed |= backfill(existing, default),
        }
    }
    changed
}

/// Renames snake_case keys to the camelCase key `template` knows them by,
/// recursing into nested objects. Keys unknown to the template are left
/// alone, as are legacy keys whose successor is already present.
///
/// Returns whether anything was renamed.
pub fn rename_legacy_keys(target: &mut Value, template: &Value) -> bool {
    let (Value::Object(fields), Value::Object(schema)) = (target, template) else {
        return false;
    };

    let mut changed = false;
    let legacy: Vec<String> = fields.keys().filter(|key| key.contains('_')).cloned().collect();
    for key in legacy {
        let current = snake_to_camel(&key);
        if !schema.contains_key(&current) || fields.contains_key(&current) {
            continue;
        }
        if let Some(value) = fields.remove(&key) {
            fields.insert(current, value);
            changed = true;
        }
    }

    for (key, sub_schema) in schema {
        if let Some(child) = fields.get_mut(key) {
            changed |= rename_legacy_keys(child, sub_schema);
        }
    }
    changed
}

fn normalize_rules(record: &mut Value, key: &str, template: &Value) -> bool {
    let Some(Value::Array(rules)) = record.get_mut(key) else {
        return false;
    };

    let mut changed = false;
    for rule in rules.iter_mut().filter(|rule| rule.is_object()) {
        changed |= rename_legacy_keys(rule, template);
        changed |= backfill(rule, template);
        changed |= ensure_rule_id(rule);
    }
    changed
}

fn ensure_rule_id(rule: &mut Value) -> bool {
    let Value::Object(fields) = rule else {
        return false;
    };

    match fields.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => false,
        Some(Value::Number(number)) => {
            let id = number.to_string();
            fields.insert("id".to_string(), Value::String(id));
            true
        }
        _ => {
            fields.insert("id".to_string(), Value::String(new_rule_id()));
            true
        }
    }
}

/// Generates a fresh stable rule identifier.
#[must_use]
pub fn new_rule_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn template<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::error!("Failed to build configuration template: {err}");
        Value::Object(Map::new())
    })
}

fn rule_template<T: Serialize>(value: &T) -> Value {
    let mut rule = template(value);
    if let Value::Object(fields) = &mut rule {
        fields.remove("id");
    }
    rule
}

fn snake_to_camel(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !camel.is_empty();
        } else if upper_next {
            camel.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            camel.push(ch);
        }
    }
    camel
}

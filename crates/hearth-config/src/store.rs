//! The per-tenant configuration store.

use crate::error::ConfigError;
use crate::loader::{ConfigDocument, DocumentLoader};
use crate::migrate::DefaultingMigrator;
use crate::schema::{TenantConfig, TicketConfig};
use hearth_common::TenantId;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Persists one configuration record per tenant in a single JSON document.
///
/// Every operation re-reads the file, so edits made by other tools between
/// calls are picked up. Read-modify-write cycles inside this process are
/// serialized by one lock; writers in other processes remain
/// last-write-wins.
#[derive(Debug)]
pub struct ConfigStore {
    loader: DocumentLoader,
    migrator: DefaultingMigrator,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    /// Opens the store backed by the given file. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            loader: DocumentLoader::new(path),
            migrator: DefaultingMigrator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.loader.path()
    }

    /// Reads the whole document. See [`DocumentLoader::load`].
    #[must_use]
    pub fn load(&self) -> ConfigDocument {
        self.loader.load()
    }

    /// Returns the tenant's configuration, creating it with defaults if the
    /// tenant has never been seen and backfilling fields added since it was
    /// last written. Either case writes the document back; a failed write is
    /// logged and the in-memory result is still returned.
    ///
    /// Stored values of the wrong type read as their defaults; the file keeps
    /// them as written.
    pub fn get_tenant(&self, tenant: TenantId) -> Result<TenantConfig, ConfigError> {
        let _guard = self.write_lock.lock();
        let mut document = self.loader.load();

        if self.materialize(&mut document, tenant) {
            if let Err(err) = self.loader.save(&document) {
                error!(tenant = %tenant, error = %err, "Failed to persist migrated tenant configuration");
            }
        }

        let (config, _) = self.decode(tenant, document.tenants.get(&tenant.to_string()));
        Ok(config)
    }

    /// Merges `partial` into the tenant's record at the top level. Values
    /// replace what was stored wholesale, lists included. Legacy key
    /// spellings are accepted. Nothing is written if a supplied value is not
    /// valid for its field; malformed values already stored under other keys
    /// are left as they are.
    pub fn update_tenant(
        &self,
        tenant: TenantId,
        partial: Map<String, Value>,
    ) -> Result<TenantConfig, ConfigError> {
        let _guard = self.write_lock.lock();
        let mut document = self.loader.load();
        self.materialize(&mut document, tenant);

        let key = tenant.to_string();
        let mut record = document.tenants.get(&key).cloned().unwrap_or(Value::Null);
        let mut touched = Vec::with_capacity(partial.len());
        if let Value::Object(fields) = &mut record {
            for (field, value) in partial {
                let field = self.migrator.canonical_key(&field);
                touched.push(field.clone());
                fields.insert(field, value);
            }
        }
        self.migrator.migrate_tenant(&mut record);

        let config = match TenantConfig::deserialize(&record) {
            Ok(config) => config,
            Err(source) => {
                let (config, rejected) = self.salvage(tenant, &record);
                if rejected
                    .iter()
                    .any(|path| path.first().is_some_and(|field| touched.contains(field)))
                {
                    return Err(ConfigError::Validation { tenant, source });
                }
                config
            }
        };

        document.tenants.insert(key, record);
        self.loader.save(&document)?;
        info!(tenant = %tenant, "Tenant configuration updated");
        Ok(config)
    }

    /// Runs a typed read-modify-write of one tenant under the store lock.
    ///
    /// The document is only written when `modify` succeeds. Stored values
    /// that could not be read are written back unchanged unless `modify`
    /// replaced them.
    pub fn modify_tenant<R, E, F>(&self, tenant: TenantId, modify: F) -> Result<R, E>
    where
        F: FnOnce(&mut TenantConfig) -> Result<R, E>,
        E: From<ConfigError>,
    {
        let _guard = self.write_lock.lock();
        let mut document = self.loader.load();
        self.materialize(&mut document, tenant);

        let key = tenant.to_string();
        let (mut config, rejected) = self.decode(tenant, document.tenants.get(&key));
        let before = if rejected.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&config).map_err(ConfigError::from)?)
        };

        let result = modify(&mut config)?;

        let mut record = serde_json::to_value(&config).map_err(ConfigError::from)?;
        if let (Some(before), Some(stored)) = (before, document.tenants.get(&key)) {
            for path in &rejected {
                if value_at(&record, path) != value_at(&before, path) {
                    warn!(tenant = %tenant, field = %path.join("."), "Replacing malformed stored value");
                    continue;
                }
                if let Some(raw) = value_at(stored, path) {
                    insert_at(&mut record, path, raw.clone());
                }
            }
        }
        self.migrator.migrate_tenant(&mut record);
        document.tenants.insert(key, record);
        self.loader.save(&document)?;
        debug!(tenant = %tenant, "Tenant configuration modified");
        Ok(result)
    }

    /// Returns the tenant's ticket settings with every field present,
    /// writing the document back only if something had to be filled in.
    pub fn get_ticket_config(&self, tenant: TenantId) -> Result<TicketConfig, ConfigError> {
        self.get_tenant(tenant).map(|config| config.tickets)
    }

    /// Increments and persists the tenant's ticket counter.
    pub fn next_ticket_number(&self, tenant: TenantId) -> Result<u64, ConfigError> {
        self.modify_tenant(tenant, |config| {
            config.tickets.ticket_counter = config.tickets.ticket_counter.saturating_add(1);
            Ok::<_, ConfigError>(config.tickets.ticket_counter)
        })
    }

    /// Ensures the tenant has a current record in `document`, adopting a
    /// pending single-tenant record first. Returns whether the document
    /// changed.
    fn materialize(&self, document: &mut ConfigDocument, tenant: TenantId) -> bool {
        let key = tenant.to_string();
        let mut changed = false;

        if !document.tenants.contains_key(&key) {
            let record = if let Some(legacy) = document.legacy.take() {
                info!(tenant = %tenant, "Adopting single-tenant configuration");
                Value::Object(legacy)
            } else {
                info!(tenant = %tenant, "Initializing tenant configuration with defaults");
                self.migrator.fresh_tenant()
            };
            document.tenants.insert(key.clone(), record);
            changed = true;
        }

        if let Some(record) = document.tenants.get_mut(&key) {
            if self.migrator.migrate_tenant(record) {
                debug!(tenant = %tenant, "Backfilled tenant configuration");
                changed = true;
            }
        }
        changed
    }

    /// Decodes a stored record. A record that does not decode as a whole is
    /// salvaged field by field; see [`Self::salvage`].
    fn decode(&self, tenant: TenantId, record: Option<&Value>) -> (TenantConfig, Vec<FieldPath>) {
        let record = record.unwrap_or(&Value::Null);
        match TenantConfig::deserialize(record) {
            Ok(config) => (config, Vec::new()),
            Err(err) => {
                warn!(tenant = %tenant, error = %err, "Stored tenant configuration is malformed");
                self.salvage(tenant, record)
            }
        }
    }

    /// Rebuilds a configuration from the defaults, taking every stored value
    /// that decodes. Objects are descended into so one bad nested value only
    /// costs that value. Returns the key paths that kept their default.
    fn salvage(&self, tenant: TenantId, record: &Value) -> (TenantConfig, Vec<FieldPath>) {
        let mut accepted = self.migrator.fresh_tenant();
        let mut rejected = Vec::new();
        accept_valid(&mut accepted, &mut Vec::new(), record, &mut rejected);

        for path in &rejected {
            warn!(tenant = %tenant, field = %path.join("."), "Ignoring malformed stored value, using the default");
        }

        let config = TenantConfig::deserialize(&accepted).unwrap_or_else(|err| {
            error!(tenant = %tenant, error = %err, "Defaults do not decode, using built-in configuration");
            TenantConfig::default()
        });
        (config, rejected)
    }
}

/// Key path into a tenant record, e.g. `["giveaway", "winners"]`.
type FieldPath = Vec<String>;

fn accept_valid(accepted: &mut Value, path: &mut FieldPath, incoming: &Value, rejected: &mut Vec<FieldPath>) {
    let Value::Object(fields) = incoming else {
        return;
    };

    for (key, value) in fields {
        path.push(key.clone());
        let mut trial = accepted.clone();
        if insert_at(&mut trial, path, value.clone()) && TenantConfig::deserialize(&trial).is_ok() {
            *accepted = trial;
        } else if value.is_object() && value_at(accepted, path).is_some_and(Value::is_object) {
            accept_valid(accepted, path, value, rejected);
        } else {
            rejected.push(path.clone());
        }
        path.pop();
    }
}

fn value_at<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(key))
}

fn insert_at(root: &mut Value, path: &[String], value: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };
    let parent = parents.iter().try_fold(root, |node, key| node.get_mut(key));
    match parent {
        Some(Value::Object(fields)) => {
            fields.insert(last.clone(), value);
            true
        }
        _ => false,
    }
}

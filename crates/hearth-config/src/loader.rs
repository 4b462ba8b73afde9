//! Loading and atomic persistence of the multi-tenant document.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Key of the tenant map in the persisted document.
pub const TENANTS_KEY: &str = "tenants";

/// Older multi-tenant files used this key for the tenant map.
const LEGACY_TENANTS_KEY: &str = "servers";

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    /// Raw tenant records keyed by tenant id.
    pub tenants: Map<String, Value>,
    /// A flat single-tenant record waiting to be adopted by the first tenant
    /// that gets initialized. Only ever present while `tenants` is empty.
    pub legacy: Option<Map<String, Value>>,
    /// Top-level keys other than the tenant map, kept verbatim.
    pub extra: Map<String, Value>,
    /// Set when the file exists but could neither be read nor copied aside.
    /// Such a document is never saved, so the file on disk stays intact.
    pub unreadable: bool,
}

impl ConfigDocument {
    /// Interprets a parsed document, upgrading older shapes.
    ///
    /// Returns `None` when the value cannot be a configuration document.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut root) = value else {
            return None;
        };

        let current = root.remove(TENANTS_KEY);
        let older = root.remove(LEGACY_TENANTS_KEY);

        if current.is_none() && older.is_none() {
            if root.is_empty() {
                return Some(Self::default());
            }
            info!("Found single-tenant configuration, it will be adopted by the first tenant");
            return Some(Self {
                legacy: Some(root),
                ..Self::default()
            });
        }

        let mut tenants = match current {
            Some(Value::Object(tenants)) => tenants,
            None | Some(Value::Null) => Map::new(),
            Some(_) => return None,
        };

        match older {
            Some(Value::Object(servers)) => {
                debug!(count = servers.len(), "Merging tenants stored under 'servers'");
                for (id, record) in servers {
                    if !tenants.contains_key(&id) {
                        tenants.insert(id, record);
                    }
                }
            }
            None | Some(Value::Null) => {}
            Some(_) => return None,
        }

        Some(Self {
            tenants,
            legacy: None,
            extra: root,
            unreadable: false,
        })
    }

    /// Renders the document in its current shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(TENANTS_KEY.to_string(), Value::Object(self.tenants.clone()));
        for (key, value) in &self.extra {
            root.insert(key.clone(), value.clone());
        }
        Value::Object(root)
    }
}

/// Reads and writes the document at one path.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    path: PathBuf,
}

impl DocumentLoader {
    /// Creates a loader for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this loader reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document. Never fails: a missing file yields an empty
    /// document, and an unreadable or corrupt one is logged, copied aside to
    /// `<file>.corrupt` and replaced by an empty document. If the copy cannot
    /// be made, the document is marked [`unreadable`](ConfigDocument::unreadable).
    #[must_use]
    pub fn load(&self) -> ConfigDocument {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No configuration file yet");
                return ConfigDocument::default();
            }
            Err(err) => return self.quarantine(&err.to_string()),
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => return self.quarantine(&err.to_string()),
        };

        if content.trim().is_empty() {
            return ConfigDocument::default();
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => ConfigDocument::from_value(value)
                .unwrap_or_else(|| self.quarantine("unexpected document shape")),
            Err(err) => self.quarantine(&err.to_string()),
        }
    }

    /// Writes the document atomically: the new content goes to a temporary
    /// file in the same directory which then replaces the target.
    pub fn save(&self, document: &ConfigDocument) -> Result<(), ConfigError> {
        if document.unreadable {
            return Err(ConfigError::Unreadable {
                path: self.path.clone(),
            });
        }

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| ConfigError::persistence(&self.path, err))?;

        let mut rendered = serde_json::to_string_pretty(&document.to_value())?;
        rendered.push('\n');

        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|err| ConfigError::persistence(&self.path, err))?;
        temp_file
            .write_all(rendered.as_bytes())
            .and_then(|()| temp_file.as_file().sync_all())
            .map_err(|err| ConfigError::persistence(&self.path, err))?;
        temp_file
            .persist(&self.path)
            .map_err(|err| ConfigError::persistence(&self.path, err.error))?;

        debug!(
            path = %self.path.display(),
            tenants = document.tenants.len(),
            "Configuration saved"
        );
        Ok(())
    }

    fn corrupt_copy_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn quarantine(&self, reason: &str) -> ConfigDocument {
        let copy = self.corrupt_copy_path();
        match fs::copy(&self.path, &copy) {
            Ok(_) => {
                error!(
                    path = %self.path.display(),
                    copy = %copy.display(),
                    reason,
                    "Configuration is corrupt, continuing with an empty document"
                );
                ConfigDocument::default()
            }
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    reason,
                    error = %err,
                    "Configuration could not be read or copied aside, refusing to overwrite it"
                );
                ConfigDocument {
                    unreadable: true,
                    ..ConfigDocument::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_is_empty_shell() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(dir.path().join("absent.json"));
        assert_eq!(loader.load(), ConfigDocument::default());
        assert_eq!(loader.load().to_value(), json!({"tenants": {}}));
    }

    #[test]
    fn test_servers_key_is_accepted() {
        let document = ConfigDocument::from_value(json!({
            "servers": {"1": {"embedColor": "red"}},
            "tenants": {"2": {}},
            "dashboardVersion": 3
        }))
        .unwrap();

        assert_eq!(document.tenants.len(), 2);
        assert!(document.legacy.is_none());
        assert_eq!(document.extra.get("dashboardVersion"), Some(&json!(3)));

        let written = document.to_value();
        assert!(written.get("servers").is_none());
        assert_eq!(written["dashboardVersion"], json!(3));
    }

    #[test]
    fn test_flat_document_becomes_pending_legacy() {
        let document = ConfigDocument::from_value(json!({"embed_color": "#FF0000"})).unwrap();
        assert!(document.tenants.is_empty());
        assert_eq!(
            document.legacy.as_ref().and_then(|legacy| legacy.get("embed_color")),
            Some(&json!("#FF0000"))
        );
    }

    #[test]
    fn test_non_object_documents_are_rejected() {
        assert!(ConfigDocument::from_value(json!([1, 2])).is_none());
        assert!(ConfigDocument::from_value(json!({"tenants": []})).is_none());
    }

    #[test]
    fn test_corrupt_file_is_copied_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loader = DocumentLoader::new(&path);
        assert_eq!(loader.load(), ConfigDocument::default());

        let copy = dir.path().join("config.json.corrupt");
        assert_eq!(fs::read_to_string(copy).unwrap(), "{ not json");
    }

    #[test]
    fn test_invalid_utf8_is_copied_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut bytes = br##"{"tenants":{"2":{"embedColor":"#111111"}},"note":""##.to_vec();
        bytes.extend_from_slice(&[0xC7, b'"', b'}']);
        fs::write(&path, &bytes).unwrap();

        let document = DocumentLoader::new(&path).load();
        assert!(document.tenants.is_empty());
        assert!(!document.unreadable);
        assert_eq!(fs::read(dir.path().join("config.json.corrupt")).unwrap(), bytes);
    }

    #[test]
    fn test_unreadable_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::create_dir(&path).unwrap();

        let loader = DocumentLoader::new(&path);
        let document = loader.load();
        assert!(document.unreadable);
        assert!(matches!(
            loader.save(&document),
            Err(ConfigError::Unreadable { .. })
        ));
        assert!(path.is_dir());
    }

    #[test]
    fn test_save_keeps_non_ascii_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(dir.path().join("config.json"));
        let mut document = ConfigDocument::default();
        document
            .tenants
            .insert("1".to_string(), json!({"reactEmojis": ["❤️"], "name": "قصائد"}));

        loader.save(&document).unwrap();
        let raw = fs::read_to_string(loader.path()).unwrap();
        assert!(raw.contains("❤️"));
        assert!(raw.contains("قصائد"));
        assert_eq!(loader.load(), document);
    }
}

use crate::config::{CollectionConfig, Settings};
use crate::error::{AppError, Result};
use log;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LAST_USED_CONFIG_KEY: &str = "fileCollector.lastUsedConfig";

/// Durable key-value storage that survives process restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A single JSON object on disk, one member per key. The whole document is
/// rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(AppError::FileRead {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(AppError::StateStore(format!(
                "State file '{}' does not contain a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut document = self.read_document().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable state file: {}", e);
            Map::new()
        });
        document.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::StateStore(format!(
                    "Failed to create state directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let serialized = serde_json::to_string_pretty(&Value::Object(document))?;
        fs::write(&self.path, serialized).map_err(|e| {
            AppError::StateStore(format!(
                "Failed to write state file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        log::trace!("State key '{}' written to {}", key, self.path.display());
        Ok(())
    }
}

/// Holds the last-used filter snapshot and the live folder selection.
/// Only `save` touches durable storage.
pub struct ConfigStore<S: KeyValueStore> {
    store: S,
    settings: Settings,
    selected_folders: Vec<PathBuf>,
}

impl<S: KeyValueStore> ConfigStore<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store,
            settings,
            selected_folders: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the persisted last-used config, or defaults built from the
    /// settings when nothing usable is stored.
    pub fn load(&self) -> CollectionConfig {
        match self.store.get(LAST_USED_CONFIG_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<CollectionConfig>(value) {
                Ok(config) => {
                    log::debug!("Loaded last-used config: {:?}", config);
                    return config;
                }
                Err(e) => log::warn!("Ignoring malformed last-used config: {}", e),
            },
            Ok(None) => log::debug!("No last-used config persisted, using defaults."),
            Err(e) => log::warn!("Could not read last-used config, using defaults: {}", e),
        }
        self.settings.default_collection_config()
    }

    pub fn save(&mut self, config: &CollectionConfig) -> Result<()> {
        let value = serde_json::to_value(config)?;
        self.store.set(LAST_USED_CONFIG_KEY, value)?;
        log::debug!("Persisted last-used config: {:?}", config);
        Ok(())
    }

    pub fn set_selected_folders(&mut self, paths: Vec<PathBuf>) {
        log::debug!("Folder selection set to {} folder(s).", paths.len());
        self.selected_folders = paths;
    }

    pub fn selected_folders(&self) -> &[PathBuf] {
        &self.selected_folders
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_config() -> CollectionConfig {
        CollectionConfig::new(vec!["ts".into(), "tsx".into()], vec![PathBuf::from("/proj/a")])
            .with_exclude_patterns(vec!["**/node_modules/**".into()])
            .with_max_file_size_mb(1.5)
    }

    #[test]
    fn load_without_state_uses_settings_defaults() {
        let settings = Settings {
            default_extensions: vec!["rs".into()],
            ..Settings::default()
        };
        let store = ConfigStore::new(MemoryStore::new(), settings);
        let config = store.load();
        assert_eq!(config.extensions, vec!["rs"]);
        assert!(config.exclude_patterns.is_empty());
        assert_eq!(config.max_file_size_mb, 5.0);
        assert_eq!(config.selected_folders, None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = ConfigStore::new(MemoryStore::new(), Settings::default());
        let config = sample_config();
        store.save(&config).unwrap();
        assert_eq!(store.load(), config);
    }

    #[test]
    fn malformed_state_falls_back_to_defaults() {
        let mut kv = MemoryStore::new();
        kv.set(LAST_USED_CONFIG_KEY, json!({"extensions": 42})).unwrap();
        let store = ConfigStore::new(kv, Settings::default());
        assert_eq!(store.load(), Settings::default().default_collection_config());
    }

    #[test]
    fn folder_selection_is_not_persisted() {
        let mut store = ConfigStore::new(MemoryStore::new(), Settings::default());
        store.set_selected_folders(vec![PathBuf::from("/proj")]);
        assert_eq!(store.selected_folders(), &[PathBuf::from("/proj")]);
        assert!(store.inner().get(LAST_USED_CONFIG_KEY).unwrap().is_none());
    }

    #[test]
    fn json_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = ConfigStore::new(JsonFileStore::new(&path), Settings::default());
        store.save(&sample_config()).unwrap();

        let reopened = ConfigStore::new(JsonFileStore::new(&path), Settings::default());
        assert_eq!(reopened.load(), sample_config());
    }

    #[test]
    fn json_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = JsonFileStore::new(dir.path().join("state.json"));
        kv.set("other", json!(1)).unwrap();
        kv.set(LAST_USED_CONFIG_KEY, json!({"extensions": []})).unwrap();
        assert_eq!(kv.get("other").unwrap(), Some(json!(1)));
    }

    #[test]
    fn corrupt_state_file_is_reported_by_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2]").unwrap();
        let kv = JsonFileStore::new(&path);
        assert!(matches!(kv.get("x"), Err(AppError::StateStore(_))));

        let store = ConfigStore::new(kv, Settings::default());
        assert_eq!(store.load().extensions, vec!["js"]);
    }
}

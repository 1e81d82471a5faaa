//! TOML file-backed property store
//!
//! Scalars are top-level keys. Lists are sub-tables keyed by their item tag:
//!
//! ```toml
//! default_language = "en-GB"
//! spell_check_as_you_type = false
//!
//! [ignored_words]
//! ignore = ["rustc", "tokio"]
//! ```
//!
//! A file that cannot be read or parsed does not prevent the store from being
//! opened; the failure is remembered and every operation reports
//! [`StorageError::StorageUnavailable`] until [`TomlFileStore::reload`] succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::error::{IoOperation, StorageError, StorageResult};
use crate::store::PropertyStore;
use crate::value::PropertyValue;

#[derive(Debug)]
enum LoadState {
    Loaded { table: Table, dirty: bool },
    Failed(String),
}

/// Property store persisted as a TOML file
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    state: RwLock<LoadState>,
}

impl TomlFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load_state(&path);
        Self {
            path,
            state: RwLock::new(state),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store holds changes not yet flushed to disk
    pub fn is_dirty(&self) -> bool {
        matches!(&*self.state.read(), LoadState::Loaded { dirty: true, .. })
    }

    /// Re-read the backing file, discarding unsaved changes
    pub fn reload(&self) -> StorageResult<()> {
        let state = Self::load_state(&self.path);
        let result = match &state {
            LoadState::Failed(message) => Err(StorageError::storage_unavailable(
                self.path.display().to_string(),
                message.clone(),
            )),
            LoadState::Loaded { .. } => Ok(()),
        };
        *self.state.write() = state;
        result
    }

    fn load_state(path: &Path) -> LoadState {
        match Self::load_table(path) {
            Ok(table) => LoadState::Loaded {
                table,
                dirty: false,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Configuration file could not be loaded");
                LoadState::Failed(e.to_string())
            }
        }
    }

    fn load_table(path: &Path) -> StorageResult<Table> {
        if !path.exists() {
            debug!("No configuration file at {}, starting empty", path.display());
            return Ok(Table::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StorageError::io_error(path.to_path_buf(), IoOperation::Read, e))?;

        toml::from_str::<Table>(&content)
            .map_err(|e| StorageError::parse_error(path.to_path_buf(), "TOML", e.to_string()))
    }

    fn unavailable(&self, message: &str) -> StorageError {
        StorageError::storage_unavailable(self.path.display().to_string(), message)
    }

    fn with_table<T>(&self, f: impl FnOnce(&Table) -> StorageResult<T>) -> StorageResult<T> {
        match &*self.state.read() {
            LoadState::Loaded { table, .. } => f(table),
            LoadState::Failed(message) => Err(self.unavailable(message)),
        }
    }

    fn with_table_mut<T>(&self, f: impl FnOnce(&mut Table) -> T) -> StorageResult<T> {
        match &mut *self.state.write() {
            LoadState::Loaded { table, dirty } => {
                *dirty = true;
                Ok(f(table))
            }
            LoadState::Failed(message) => Err(self.unavailable(message)),
        }
    }
}

fn list_items(name: &str, array: &[Value]) -> StorageResult<Vec<String>> {
    array
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(StorageError::invalid_value(
                name,
                format!("list items must be strings, found {}", other.type_str()),
            )),
        })
        .collect()
}

impl PropertyStore for TomlFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn has_property(&self, name: &str) -> StorageResult<bool> {
        self.with_table(|table| Ok(table.contains_key(name)))
    }

    fn read_value(&self, name: &str) -> StorageResult<Option<PropertyValue>> {
        self.with_table(|table| match table.get(name) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(PropertyValue::Bool(*b))),
            Some(Value::String(s)) => Ok(Some(PropertyValue::Text(s.clone()))),
            Some(other) => Err(StorageError::invalid_value(
                name,
                format!("expected a boolean or string, found {}", other.type_str()),
            )),
        })
    }

    fn read_list(&self, name: &str, item_tag: &str) -> StorageResult<Vec<String>> {
        self.with_table(|table| match table.get(name) {
            None => Ok(Vec::new()),
            Some(Value::Table(list)) => match list.get(item_tag) {
                None => Ok(Vec::new()),
                Some(Value::Array(items)) => list_items(name, items),
                Some(other) => Err(StorageError::invalid_value(
                    name,
                    format!("'{}' must be an array, found {}", item_tag, other.type_str()),
                )),
            },
            // Accept a bare array for hand-written files
            Some(Value::Array(items)) => list_items(name, items),
            Some(other) => Err(StorageError::invalid_value(
                name,
                format!("expected a list table, found {}", other.type_str()),
            )),
        })
    }

    fn write_value(&self, name: &str, value: PropertyValue) -> StorageResult<()> {
        let value = match value {
            PropertyValue::Bool(b) => Value::Boolean(b),
            PropertyValue::Text(s) => Value::String(s),
        };
        self.with_table_mut(|table| {
            table.insert(name.to_string(), value);
        })
    }

    fn write_list(&self, name: &str, item_tag: &str, items: &[String]) -> StorageResult<()> {
        let mut list = Table::new();
        list.insert(
            item_tag.to_string(),
            Value::Array(items.iter().cloned().map(Value::String).collect()),
        );
        self.with_table_mut(|table| {
            table.insert(name.to_string(), Value::Table(list));
        })
    }

    fn remove_property(&self, name: &str) -> StorageResult<bool> {
        self.with_table_mut(|table| table.remove(name).is_some())
    }

    fn flush(&self) -> StorageResult<()> {
        let mut state = self.state.write();
        let (table, dirty) = match &mut *state {
            LoadState::Loaded { table, dirty } => (table, dirty),
            LoadState::Failed(message) => return Err(self.unavailable(message)),
        };

        if !*dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::io_error(parent.to_path_buf(), IoOperation::Write, e)
                })?;
            }
        }

        let content = toml::to_string_pretty(&*table)
            .map_err(|e| StorageError::internal(format!("Failed to serialize to TOML: {}", e)))?;
        fs::write(&self.path, content)
            .map_err(|e| StorageError::io_error(self.path.clone(), IoOperation::Write, e))?;

        *dirty = false;
        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PropertyStoreExt;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlFileStore::open(temp_dir.path().join("absent.toml"));

        assert!(!store.has_property("default_language").unwrap());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_reads_scalars_and_lists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("project.toml");
        fs::write(
            &path,
            r#"
default_language = "en-GB"
spell_check_as_you_type = false

[ignored_words]
ignore = ["rustc", "tokio"]
"#,
        )
        .unwrap();

        let store = TomlFileStore::open(&path);

        assert_eq!(
            store.read_scalar::<String>("default_language", None).unwrap(),
            "en-GB"
        );
        assert!(!store.read_scalar("spell_check_as_you_type", Some(true)).unwrap());
        assert_eq!(
            store.read_list("ignored_words", "ignore").unwrap(),
            vec!["rustc".to_string(), "tokio".to_string()]
        );
    }

    #[test]
    fn test_corrupt_file_reports_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "default_language = [unterminated").unwrap();

        let store = TomlFileStore::open(&path);
        let err = store.has_property("default_language").unwrap_err();

        assert!(matches!(err, StorageError::StorageUnavailable { .. }));
        assert!(store.write_value("x", PropertyValue::Bool(true)).is_err());
    }

    #[test]
    fn test_reload_recovers_after_fix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "= nope").unwrap();
        let store = TomlFileStore::open(&path);
        assert!(store.reload().is_err());

        fs::write(&path, "treat_underscore_as_separator = true").unwrap();
        store.reload().unwrap();

        assert!(store.has_property("treat_underscore_as_separator").unwrap());
    }

    #[test]
    fn test_flush_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tier.toml");

        let store = TomlFileStore::open(&path);
        store
            .write_scalar("ignore_character_class", Some(PropertyValue::from("NonLatin")))
            .unwrap();
        store
            .write_list(
                "spell_checked_xml_attributes",
                "spell_check",
                &["title".to_string()],
            )
            .unwrap();
        assert!(store.is_dirty());
        store.flush().unwrap();
        assert!(!store.is_dirty());

        let reopened = TomlFileStore::open(&path);
        assert_eq!(
            reopened.read_value("ignore_character_class").unwrap(),
            Some(PropertyValue::Text("NonLatin".to_string()))
        );
        assert_eq!(
            reopened
                .read_list("spell_checked_xml_attributes", "spell_check")
                .unwrap(),
            vec!["title".to_string()]
        );
    }

    #[test]
    fn test_remove_then_flush_drops_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tier.toml");
        fs::write(&path, "ignore_words_with_digits = false\n").unwrap();

        let store = TomlFileStore::open(&path);
        store.write_scalar("ignore_words_with_digits", None).unwrap();
        store.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("ignore_words_with_digits"));
    }

    #[test]
    fn test_wrong_scalar_type_is_value_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tier.toml");
        fs::write(&path, "default_language = 42\n").unwrap();

        let store = TomlFileStore::open(&path);
        let err = store.read_value("default_language").unwrap_err();
        assert!(err.is_value_error());
    }
}

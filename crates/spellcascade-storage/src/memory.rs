//! In-memory property store
//!
//! Backs tiers that have no file yet and serves as the store for tests.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::PropertyStore;
use crate::value::PropertyValue;

/// A value as held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Scalar(PropertyValue),
    List { item_tag: String, items: Vec<String> },
}

#[derive(Debug, Default)]
struct MemoryContents {
    values: HashMap<String, StoredValue>,
    unavailable: Option<String>,
}

/// Thread-safe in-memory implementation of [`PropertyStore`]
///
/// Uses RwLock for concurrent read access with exclusive write access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    contents: RwLock<MemoryContents>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::named("memory")
    }

    /// Create an empty store reported under `name` in diagnostics
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: RwLock::new(MemoryContents::default()),
        }
    }

    /// Builder-style scalar insertion
    pub fn with_value(self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.contents
            .write()
            .values
            .insert(name.to_string(), StoredValue::Scalar(value.into()));
        self
    }

    /// Builder-style list insertion
    pub fn with_list<I, S>(self, name: &str, item_tag: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contents.write().values.insert(
            name.to_string(),
            StoredValue::List {
                item_tag: item_tag.to_string(),
                items: items.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Make every subsequent operation fail as if the medium were unreadable.
    /// `None` restores normal operation.
    pub fn set_unavailable(&self, reason: Option<String>) {
        self.contents.write().unavailable = reason;
    }

    /// Number of properties currently defined
    pub fn len(&self) -> usize {
        self.contents.read().values.len()
    }

    /// Whether no property is defined
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self, contents: &MemoryContents) -> StorageResult<()> {
        match &contents.unavailable {
            Some(reason) => Err(StorageError::storage_unavailable(&self.name, reason.clone())),
            None => Ok(()),
        }
    }
}

impl PropertyStore for MemoryStore {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn has_property(&self, name: &str) -> StorageResult<bool> {
        let contents = self.contents.read();
        self.check_available(&contents)?;
        Ok(contents.values.contains_key(name))
    }

    fn read_value(&self, name: &str) -> StorageResult<Option<PropertyValue>> {
        let contents = self.contents.read();
        self.check_available(&contents)?;
        match contents.values.get(name) {
            None => Ok(None),
            Some(StoredValue::Scalar(value)) => Ok(Some(value.clone())),
            Some(StoredValue::List { .. }) => Err(StorageError::invalid_value(
                name,
                "expected a scalar, found a list",
            )),
        }
    }

    fn read_list(&self, name: &str, item_tag: &str) -> StorageResult<Vec<String>> {
        let contents = self.contents.read();
        self.check_available(&contents)?;
        match contents.values.get(name) {
            None => Ok(Vec::new()),
            Some(StoredValue::List { item_tag: tag, items }) if tag == item_tag => Ok(items.clone()),
            Some(StoredValue::List { item_tag: tag, .. }) => {
                debug!(property = %name, expected = %item_tag, found = %tag, "List item tag mismatch");
                Ok(Vec::new())
            }
            Some(StoredValue::Scalar(_)) => Err(StorageError::invalid_value(
                name,
                "expected a list, found a scalar",
            )),
        }
    }

    fn write_value(&self, name: &str, value: PropertyValue) -> StorageResult<()> {
        let mut contents = self.contents.write();
        self.check_available(&contents)?;
        contents
            .values
            .insert(name.to_string(), StoredValue::Scalar(value));
        Ok(())
    }

    fn write_list(&self, name: &str, item_tag: &str, items: &[String]) -> StorageResult<()> {
        let mut contents = self.contents.write();
        self.check_available(&contents)?;
        contents.values.insert(
            name.to_string(),
            StoredValue::List {
                item_tag: item_tag.to_string(),
                items: items.to_vec(),
            },
        );
        Ok(())
    }

    fn remove_property(&self, name: &str) -> StorageResult<bool> {
        let mut contents = self.contents.write();
        self.check_available(&contents)?;
        Ok(contents.values.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PropertyStoreExt;

    #[test]
    fn test_absent_vs_present_default() {
        let store = MemoryStore::new().with_value("spell_check_as_you_type", true);

        assert!(store.has_property("spell_check_as_you_type").unwrap());
        assert!(!store.has_property("ignore_words_with_digits").unwrap());
    }

    #[test]
    fn test_write_none_removes_property() {
        let store = MemoryStore::new().with_value("flag", false);

        store.write_scalar("flag", None).unwrap();

        assert!(!store.has_property("flag").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_scalar_missing_without_default() {
        let store = MemoryStore::new();
        let err = store.read_scalar::<bool>("flag", None).unwrap_err();
        assert!(matches!(err, StorageError::MissingProperty { .. }));

        assert!(store.read_scalar("flag", Some(true)).unwrap());
    }

    #[test]
    fn test_read_list_absent_is_empty() {
        let store = MemoryStore::new();
        assert!(store.read_list("ignored_words", "ignore").unwrap().is_empty());
    }

    #[test]
    fn test_list_round_trip_preserves_order() {
        let store = MemoryStore::new();
        let words = vec!["zeta".to_string(), "alpha".to_string()];

        store.write_list("ignored_words", "ignore", &words).unwrap();

        assert_eq!(store.read_list("ignored_words", "ignore").unwrap(), words);
    }

    #[test]
    fn test_scalar_read_of_list_is_value_error() {
        let store = MemoryStore::new().with_list("ignored_words", "ignore", ["a"]);
        let err = store.read_value("ignored_words").unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn test_unavailable_store_fails_every_read() {
        let store = MemoryStore::named("project").with_value("flag", true);
        store.set_unavailable(Some("disk gone".to_string()));

        let err = store.has_property("flag").unwrap_err();
        assert!(matches!(err, StorageError::StorageUnavailable { .. }));
        assert!(!err.is_value_error());

        store.set_unavailable(None);
        assert!(store.has_property("flag").unwrap());
    }
}

//! The property store contract shared by every configuration tier
//!
//! A store distinguishes "property absent" from "property present with its
//! default value". Tiers above the global one rely on that distinction: an
//! absent property is inherited from the parent tier.

use crate::error::{StorageError, StorageResult};
use crate::value::{FromPropertyValue, PropertyValue};

/// Key/value storage backing one configuration tier
///
/// All methods take `&self`; implementations guard their contents so that
/// reads can run while another thread writes. Writers to the same store are
/// still expected to be serialized by the owning editing session.
pub trait PropertyStore: Send + Sync {
    /// Human readable location (file path, `memory`, ...) for diagnostics
    fn location(&self) -> String;

    /// Whether the property is explicitly defined in this store
    fn has_property(&self, name: &str) -> StorageResult<bool>;

    /// Read a scalar value, `None` when absent
    fn read_value(&self, name: &str) -> StorageResult<Option<PropertyValue>>;

    /// Read a list property; an absent property yields an empty list
    fn read_list(&self, name: &str, item_tag: &str) -> StorageResult<Vec<String>>;

    /// Store a scalar value, replacing any previous value
    fn write_value(&self, name: &str, value: PropertyValue) -> StorageResult<()>;

    /// Store a list property, replacing any previous value
    fn write_list(&self, name: &str, item_tag: &str, items: &[String]) -> StorageResult<()>;

    /// Physically remove a property. Returns true if it was present.
    fn remove_property(&self, name: &str) -> StorageResult<bool>;

    /// Persist pending changes to the backing medium
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Typed helpers layered over [`PropertyStore`]
pub trait PropertyStoreExt: PropertyStore {
    /// Read a typed scalar.
    ///
    /// Falls back to `default` when the property is absent and fails with
    /// [`StorageError::MissingProperty`] when there is no default either.
    fn read_scalar<T: FromPropertyValue>(&self, name: &str, default: Option<T>) -> StorageResult<T> {
        match self.read_value(name)? {
            Some(value) => T::from_property_value(name, value),
            None => default.ok_or_else(|| StorageError::missing_property(name)),
        }
    }

    /// Write a scalar; `None` removes the property so the tier inherits it
    fn write_scalar(&self, name: &str, value: Option<PropertyValue>) -> StorageResult<()> {
        match value {
            Some(value) => self.write_value(name, value),
            None => self.remove_property(name).map(|_| ()),
        }
    }
}

impl<S: PropertyStore + ?Sized> PropertyStoreExt for S {}

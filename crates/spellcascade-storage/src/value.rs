//! Scalar property values and typed conversion

use crate::error::{StorageError, StorageResult};

/// A scalar value held by a property store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Boolean flag
    Bool(bool),
    /// Free text (culture identifiers, enum names, delimited lists)
    Text(String),
}

impl PropertyValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Text(_) => "text",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Conversion from a stored value into a typed Rust value
pub trait FromPropertyValue: Sized {
    /// Convert `value`, read from the property `name`
    fn from_property_value(name: &str, value: PropertyValue) -> StorageResult<Self>;
}

impl FromPropertyValue for bool {
    fn from_property_value(name: &str, value: PropertyValue) -> StorageResult<Self> {
        match value {
            PropertyValue::Bool(b) => Ok(b),
            // Hand-edited files sometimes quote booleans
            PropertyValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(StorageError::invalid_value(
                    name,
                    format!("expected a boolean, found '{}'", text),
                )),
            },
        }
    }
}

impl FromPropertyValue for String {
    fn from_property_value(name: &str, value: PropertyValue) -> StorageResult<Self> {
        match value {
            PropertyValue::Text(text) => Ok(text),
            other => Err(StorageError::invalid_value(
                name,
                format!("expected text, found {}", other.type_name()),
            )),
        }
    }
}

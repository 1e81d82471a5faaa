//! Spellcascade property storage
//!
//! Every spell checker configuration tier (global, solution, project, ...) is
//! backed by one property store. This crate defines the store contract and
//! its two implementations:
//!
//! - [`MemoryStore`]: thread-safe in-memory store, used for unsaved tiers and tests
//! - [`TomlFileStore`]: store persisted as a TOML file
//!
//! The contract keeps "property absent" distinct from "property present with
//! its default value"; configuration inheritance is expressed purely through
//! absence.

pub mod error;
pub mod memory;
pub mod store;
pub mod toml_store;
pub mod value;

pub use error::{IoOperation, StorageError, StorageResult};
pub use memory::{MemoryStore, StoredValue};
pub use store::{PropertyStore, PropertyStoreExt};
pub use toml_store::TomlFileStore;
pub use value::{FromPropertyValue, PropertyValue};

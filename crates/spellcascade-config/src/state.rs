//! Tri-state view of boolean properties
//!
//! Outside the global tier a boolean property is either inherited (absent
//! from the tier's store) or explicitly on or off.

use std::fmt;

use serde::{Deserialize, Serialize};
use spellcascade_storage::{PropertyStoreExt, StorageError};
use tracing::debug;

use crate::error::Result;
use crate::properties;
use crate::tier::{ConfigurationTier, TierKind};

/// Selection state of a boolean property within one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyState {
    Inherited,
    Yes,
    No,
}

impl PropertyState {
    /// Read the state of `property` in `tier`.
    ///
    /// Inherited iff the tier is not global and its store lacks the property.
    /// The global tier always yields Yes or No, using the compiled default
    /// when the property is absent. A value that is not a boolean counts as
    /// absent, as it does during resolution.
    pub fn from_tier(tier: &ConfigurationTier, property: &str) -> Result<Self> {
        let stored = match tier.store().read_scalar::<bool>(property, None) {
            Ok(value) => Some(value),
            Err(StorageError::MissingProperty { .. }) => None,
            Err(error) if error.is_value_error() => {
                debug!(property = %property, tier_id = %tier.id(), error = %error, "Ignoring unreadable flag");
                None
            }
            Err(error) => return Err(error.into()),
        };

        match stored {
            Some(value) => Ok(Self::from(value)),
            None if tier.kind().is_global() => properties::bool_default(property)
                .map(Self::from)
                .ok_or_else(|| StorageError::missing_property(property).into()),
            None => Ok(PropertyState::Inherited),
        }
    }

    /// The value to store for this state; `None` means remove the property
    pub fn to_property_value(self) -> Option<bool> {
        match self {
            PropertyState::Inherited => None,
            PropertyState::Yes => Some(true),
            PropertyState::No => Some(false),
        }
    }

    /// The states an editor may offer for a tier of the given kind
    pub fn choices(kind: TierKind) -> &'static [PropertyState] {
        if kind.is_global() {
            &[PropertyState::Yes, PropertyState::No]
        } else {
            &[PropertyState::Inherited, PropertyState::Yes, PropertyState::No]
        }
    }
}

impl From<bool> for PropertyState {
    fn from(value: bool) -> Self {
        if value {
            PropertyState::Yes
        } else {
            PropertyState::No
        }
    }
}

impl From<Option<bool>> for PropertyState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(PropertyState::Inherited, PropertyState::from)
    }
}

impl fmt::Display for PropertyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyState::Inherited => write!(f, "Inherited"),
            PropertyState::Yes => write!(f, "Yes"),
            PropertyState::No => write!(f, "No"),
        }
    }
}

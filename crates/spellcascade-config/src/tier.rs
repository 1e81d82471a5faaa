//! Configuration tiers and the ordered chain the cascade walks
//!
//! A chain always starts with the global tier, which has no parent. Every
//! later tier's parent is the tier right before it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spellcascade_storage::PropertyStore;

use crate::error::{ConfigError, Result};

/// Level of the configuration hierarchy, least specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierKind {
    Global,
    Solution,
    Project,
    Folder,
    File,
}

impl TierKind {
    /// Get the display name for this tier kind
    pub fn name(&self) -> &'static str {
        match self {
            TierKind::Global => "global",
            TierKind::Solution => "solution",
            TierKind::Project => "project",
            TierKind::Folder => "folder",
            TierKind::File => "file",
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, TierKind::Global)
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configuration source and its backing store
#[derive(Clone)]
pub struct ConfigurationTier {
    kind: TierKind,
    id: String,
    store: Arc<dyn PropertyStore>,
}

impl ConfigurationTier {
    /// Create a tier identified by its store's location
    pub fn new(kind: TierKind, store: Arc<dyn PropertyStore>) -> Self {
        let id = store.location();
        Self { kind, id, store }
    }

    /// Create a tier with an explicit identifier
    pub fn with_id(kind: TierKind, id: impl Into<String>, store: Arc<dyn PropertyStore>) -> Self {
        Self {
            kind,
            id: id.into(),
            store,
        }
    }

    /// Create the global tier
    pub fn global(store: Arc<dyn PropertyStore>) -> Self {
        Self::new(TierKind::Global, store)
    }

    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// Identifier used to invalidate cached documents governed by this tier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &dyn PropertyStore {
        self.store.as_ref()
    }

    pub fn shared_store(&self) -> Arc<dyn PropertyStore> {
        Arc::clone(&self.store)
    }
}

impl fmt::Debug for ConfigurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationTier")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("location", &self.store.location())
            .finish()
    }
}

/// Validated tiers ordered from global (least specific) to leaf (most specific)
#[derive(Debug, Clone)]
pub struct TierChain {
    tiers: Vec<ConfigurationTier>,
}

impl TierChain {
    /// Validate and wrap `tiers`, given least specific first.
    ///
    /// The chain must be non-empty, start with the only global tier and never
    /// step back to a less specific kind.
    pub fn new(tiers: Vec<ConfigurationTier>) -> Result<Self> {
        let first = tiers.first().ok_or(ConfigError::EmptyTierChain)?;
        if !first.kind().is_global() {
            return Err(ConfigError::InvalidTierChain(format!(
                "the first tier must be global, found {}",
                first.kind()
            )));
        }

        for pair in tiers.windows(2) {
            let (parent, child) = (&pair[0], &pair[1]);
            if child.kind().is_global() {
                return Err(ConfigError::InvalidTierChain(
                    "only the first tier may be global".to_string(),
                ));
            }
            if child.kind() < parent.kind() {
                return Err(ConfigError::InvalidTierChain(format!(
                    "a {} tier cannot follow a {} tier",
                    child.kind(),
                    parent.kind()
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// A chain holding only the global tier
    pub fn global_only(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            tiers: vec![ConfigurationTier::global(store)],
        }
    }

    /// Tiers from global to leaf
    pub fn tiers(&self) -> &[ConfigurationTier] {
        &self.tiers
    }

    /// Tiers from leaf to global, the order in which overrides are looked up
    pub fn most_specific_first(&self) -> impl Iterator<Item = &ConfigurationTier> {
        self.tiers.iter().rev()
    }

    pub fn global(&self) -> &ConfigurationTier {
        &self.tiers[0]
    }

    /// The most specific tier, the only one an editing session writes to
    pub fn leaf(&self) -> &ConfigurationTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.tiers.iter().map(|tier| tier.id().to_string()).collect()
    }
}

//! Tier enumeration for callers that know their directory roots
//!
//! Tiers are registered against a root directory. A document is governed by
//! every tier whose root contains it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use spellcascade_storage::PropertyStore;
use tracing::debug;

use crate::cache::{DocumentIdentity, TierProvider};
use crate::error::{ConfigError, Result};
use crate::tier::{ConfigurationTier, TierKind};

#[derive(Debug, Clone)]
struct ScopedTier {
    root: PathBuf,
    tier: ConfigurationTier,
}

/// [`TierProvider`] built from a global tier and directory-scoped tiers
#[derive(Debug)]
pub struct ScopedTierProvider {
    global: ConfigurationTier,
    scoped: RwLock<Vec<ScopedTier>>,
}

impl ScopedTierProvider {
    /// Create a provider; `global` must be a global tier
    pub fn new(global: ConfigurationTier) -> Result<Self> {
        if !global.kind().is_global() {
            return Err(ConfigError::InvalidTierChain(format!(
                "expected a global tier, found {}",
                global.kind()
            )));
        }
        Ok(Self {
            global,
            scoped: RwLock::new(Vec::new()),
        })
    }

    pub fn global(&self) -> &ConfigurationTier {
        &self.global
    }

    /// Register a tier governing every document under `root`
    pub fn add_tier(
        &self,
        kind: TierKind,
        root: impl Into<PathBuf>,
        store: Arc<dyn PropertyStore>,
    ) -> Result<ConfigurationTier> {
        if kind.is_global() {
            return Err(ConfigError::InvalidTierChain(
                "only one global tier may be registered".to_string(),
            ));
        }

        let root = root.into();
        let tier = ConfigurationTier::new(kind, store);
        debug!(kind = %kind, root = %root.display(), tier_id = %tier.id(), "Registered configuration tier");
        self.scoped.write().push(ScopedTier {
            root,
            tier: tier.clone(),
        });
        Ok(tier)
    }

    /// Unregister every tier with the given id. Returns true if one was found.
    pub fn remove_tier(&self, tier_id: &str) -> bool {
        let mut scoped = self.scoped.write();
        let before = scoped.len();
        scoped.retain(|entry| entry.tier.id() != tier_id);
        scoped.len() != before
    }

    /// Tiers applicable to `path`, least specific first
    pub fn tiers_for_path(&self, path: &Path) -> Vec<ConfigurationTier> {
        let mut matching: Vec<ScopedTier> = self
            .scoped
            .read()
            .iter()
            .filter(|entry| path.starts_with(&entry.root))
            .cloned()
            .collect();

        matching.sort_by_key(|entry| (entry.tier.kind(), entry.root.components().count()));

        std::iter::once(self.global.clone())
            .chain(matching.into_iter().map(|entry| entry.tier))
            .collect()
    }
}

impl TierProvider for ScopedTierProvider {
    fn tiers_for(&self, document: &DocumentIdentity) -> Vec<ConfigurationTier> {
        self.tiers_for_path(document.path())
    }
}

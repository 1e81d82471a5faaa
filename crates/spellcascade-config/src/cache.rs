//! Per-document configuration cache
//!
//! Resolves each document's configuration once and remembers the verdict:
//! either the active configuration or the reason spell checking is disabled
//! for the document. A verdict stays until an explicit invalidation.
//!
//! Entries are keyed by [`DocumentIdentity`]. Each entry has its own mutex so
//! the first resolution of a document happens at most once, while different
//! documents resolve in parallel.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::cascade::ConfigurationCascade;
use crate::effective::EffectiveConfiguration;
use crate::error::Result;
use crate::tier::{ConfigurationTier, TierChain};

/// Key of a cached document: its path and the extension used for exclusion
/// tests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentIdentity {
    path: PathBuf,
    extension: Option<String>,
}

impl DocumentIdentity {
    /// Create an identity with an explicit extension; `None` if unknown
    pub fn new(path: impl Into<PathBuf>, extension: Option<&str>) -> Self {
        Self {
            path: path.into(),
            extension: extension.map(str::to_string),
        }
    }

    /// Create an identity taking the extension from the path itself.
    ///
    /// A path without an extension gets an empty one, which matches a `.`
    /// exclusion entry.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            extension: Some(extension),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Supplies the tiers applicable to a document, least specific first
pub trait TierProvider: Send + Sync {
    fn tiers_for(&self, document: &DocumentIdentity) -> Vec<ConfigurationTier>;
}

/// Why a document is not spell checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisabledReason {
    /// The master switch is off
    SpellCheckingOff,
    /// The document's extension is excluded
    ExcludedExtension(String),
}

/// Cached outcome for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferVerdict {
    Active(Arc<EffectiveConfiguration>),
    Disabled(DisabledReason),
}

impl BufferVerdict {
    pub fn is_active(&self) -> bool {
        matches!(self, BufferVerdict::Active(_))
    }

    /// The configuration, if the document is spell checked
    pub fn configuration(&self) -> Option<&Arc<EffectiveConfiguration>> {
        match self {
            BufferVerdict::Active(config) => Some(config),
            BufferVerdict::Disabled(_) => None,
        }
    }
}

/// Observable state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    Unresolved,
    Resolving,
    Active,
    Disabled,
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Documents currently cached
    pub entries: usize,
    /// Cascade walks performed
    pub resolutions: u64,
    /// Requests answered from a cached verdict
    pub hits: u64,
}

#[derive(Debug)]
enum Slot {
    Unresolved,
    Resolved {
        verdict: BufferVerdict,
        tier_ids: Vec<String>,
    },
}

#[derive(Debug)]
struct CacheEntry {
    resolving: AtomicBool,
    slot: Mutex<Slot>,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            resolving: AtomicBool::new(false),
            slot: Mutex::new(Slot::Unresolved),
        }
    }
}

/// Memoizes [`BufferVerdict`]s per document
pub struct BufferConfigurationCache {
    cascade: ConfigurationCascade,
    provider: Arc<dyn TierProvider>,
    entries: RwLock<HashMap<DocumentIdentity, Arc<CacheEntry>>>,
    resolutions: AtomicU64,
    hits: AtomicU64,
}

impl fmt::Debug for BufferConfigurationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferConfigurationCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl BufferConfigurationCache {
    /// Create a cache
    ///
    /// # Arguments
    ///
    /// * `cascade` - Cascade used to resolve uncached documents
    /// * `provider` - Source of each document's tier chain
    pub fn new(cascade: ConfigurationCascade, provider: Arc<dyn TierProvider>) -> Self {
        Self {
            cascade,
            provider,
            entries: RwLock::new(HashMap::new()),
            resolutions: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Get the verdict for `document`, resolving it on first request.
    ///
    /// Concurrent first requests for the same document wait for a single
    /// resolution. Fails only when the provider returns an invalid tier
    /// chain; the entry then stays unresolved.
    pub fn get(&self, document: &DocumentIdentity) -> Result<BufferVerdict> {
        let entry = self.entry(document);
        let mut slot = entry.slot.lock();

        if let Slot::Resolved { verdict, .. } = &*slot {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(document = %document, active = verdict.is_active(), "Buffer configuration cache hit");
            return Ok(verdict.clone());
        }

        debug!(document = %document, "Buffer configuration cache miss");
        entry.resolving.store(true, Ordering::Release);
        let resolved = self.resolve(document);
        entry.resolving.store(false, Ordering::Release);

        let (verdict, tier_ids) = resolved?;
        *slot = Slot::Resolved {
            verdict: verdict.clone(),
            tier_ids,
        };
        Ok(verdict)
    }

    /// The active configuration of `document`, `None` if it is disabled
    pub fn configuration(
        &self,
        document: &DocumentIdentity,
    ) -> Result<Option<Arc<EffectiveConfiguration>>> {
        Ok(self.get(document)?.configuration().cloned())
    }

    /// Whether `document` is spell checked
    pub fn is_enabled(&self, document: &DocumentIdentity) -> Result<bool> {
        Ok(self.get(document)?.is_active())
    }

    /// Current state of the entry for `document`, without resolving it
    pub fn state(&self, document: &DocumentIdentity) -> EntryState {
        let entry = match self.entries.read().get(document) {
            Some(entry) => Arc::clone(entry),
            None => return EntryState::Unresolved,
        };

        let slot = match entry.slot.try_lock() {
            Some(slot) => slot,
            None if entry.resolving.load(Ordering::Acquire) => return EntryState::Resolving,
            // held by a cache hit
            None => entry.slot.lock(),
        };

        match &*slot {
            Slot::Unresolved => EntryState::Unresolved,
            Slot::Resolved { verdict, .. } if verdict.is_active() => EntryState::Active,
            Slot::Resolved { .. } => EntryState::Disabled,
        }
    }

    /// Forget the verdict for `document`. Returns true if one was cached.
    pub fn invalidate(&self, document: &DocumentIdentity) -> bool {
        let removed = self.entries.write().remove(document).is_some();
        if removed {
            debug!(document = %document, "Invalidated buffer configuration");
        }
        removed
    }

    /// Forget every verdict for `path`, whatever extension it was cached with
    pub fn invalidate_path(&self, path: &Path) -> usize {
        self.sweep(|identity, _| identity.path() == path, "path", &path.display().to_string())
    }

    /// Forget every verdict that depended on the tier identified by `tier_id`.
    ///
    /// Entries still being resolved are dropped as well, since their chain
    /// is not known yet.
    pub fn invalidate_tier(&self, tier_id: &str) -> usize {
        self.sweep(
            |_, entry| match entry.slot.try_lock().as_deref() {
                None => true,
                Some(Slot::Unresolved) => false,
                Some(Slot::Resolved { tier_ids, .. }) => tier_ids.iter().any(|id| id == tier_id),
            },
            "tier",
            tier_id,
        )
    }

    /// Forget every verdict
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        info!(count, "Invalidated all buffer configurations");
        count
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }

    fn entry(&self, document: &DocumentIdentity) -> Arc<CacheEntry> {
        if let Some(entry) = self.entries.read().get(document) {
            return Arc::clone(entry);
        }

        let mut entries = self.entries.write();
        Arc::clone(
            entries
                .entry(document.clone())
                .or_insert_with(|| Arc::new(CacheEntry::new())),
        )
    }

    fn resolve(&self, document: &DocumentIdentity) -> Result<(BufferVerdict, Vec<String>)> {
        let chain = TierChain::new(self.provider.tiers_for(document))?;
        let tier_ids = chain.ids();

        let config = self.cascade.resolve(&chain);
        self.resolutions.fetch_add(1, Ordering::Relaxed);

        let verdict = if !config.spell_check_as_you_type() {
            BufferVerdict::Disabled(DisabledReason::SpellCheckingOff)
        } else if config.is_extension_excluded(document.extension()) {
            let extension = document.extension().unwrap_or_default().to_string();
            BufferVerdict::Disabled(DisabledReason::ExcludedExtension(extension))
        } else {
            BufferVerdict::Active(Arc::new(config))
        };

        debug!(
            document = %document,
            tiers = ?tier_ids,
            verdict = ?verdict_kind(&verdict),
            "Resolved buffer configuration"
        );

        Ok((verdict, tier_ids))
    }

    fn sweep(
        &self,
        mut matches: impl FnMut(&DocumentIdentity, &CacheEntry) -> bool,
        scope: &str,
        key: &str,
    ) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|identity, entry| !matches(identity, &**entry));
        let count = before - entries.len();
        info!(scope, key, count, "Invalidated buffer configurations");
        count
    }
}

fn verdict_kind(verdict: &BufferVerdict) -> EntryState {
    match verdict {
        BufferVerdict::Active(_) => EntryState::Active,
        BufferVerdict::Disabled(_) => EntryState::Disabled,
    }
}

//! Spell checker configuration cascade
//!
//! Settings are layered in tiers, from the per-user global tier down to
//! solution, project, folder and file tiers. Each tier's property store only
//! holds what the tier overrides; anything absent is inherited.
//!
//! # Resolution
//!
//! - [`ConfigurationCascade`] walks a [`TierChain`] most specific first and
//!   produces an immutable [`EffectiveConfiguration`]
//! - Scalars and lists both use override semantics: the most specific tier
//!   defining a property wins, and a list replaces inherited lists
//! - Bad stored data never fails resolution; it is reported through a
//!   [`DiagnosticSink`]
//!
//! # Caching
//!
//! [`BufferConfigurationCache`] resolves each document once and remembers
//! whether it is spell checked at all. Editors commit changes through
//! [`TierEditor`], which invalidates the documents governed by the edited
//! tier.
//!
//! ```ignore
//! use std::sync::Arc;
//! use spellcascade_config::{
//!     BufferConfigurationCache, ConfigPaths, ConfigurationCascade, DocumentIdentity,
//!     ScopedTierProvider,
//! };
//!
//! let paths = ConfigPaths::resolve()?;
//! let provider = Arc::new(ScopedTierProvider::new(paths.open_global_tier())?);
//! let cache = BufferConfigurationCache::new(ConfigurationCascade::new(), provider);
//!
//! let verdict = cache.get(&DocumentIdentity::from_path("/work/app/README.md"))?;
//! ```

pub mod cache;
pub mod cascade;
pub mod culture;
pub mod diagnostics;
pub mod dictionary;
pub mod editor;
pub mod effective;
pub mod error;
pub mod extensions;
pub mod paths;
pub mod properties;
pub mod provider;
pub mod sets;
pub mod state;
pub mod tier;

pub use cache::{
    BufferConfigurationCache, BufferVerdict, CacheStats, DisabledReason, DocumentIdentity,
    EntryState, TierProvider,
};
pub use cascade::{ConfigurationCascade, ResolutionDecision};
pub use culture::{Culture, InvalidCulture};
pub use diagnostics::{CollectedDiagnostics, Diagnostic, DiagnosticSink, LogDiagnostics};
pub use dictionary::{available_dictionary_languages, UserDictionary};
pub use editor::TierEditor;
pub use effective::{BehaviorFlags, CSharpOptions, EffectiveConfiguration, IgnoredCharacterClass};
pub use error::{ConfigError, Result};
pub use extensions::ExtensionExclusionSet;
pub use paths::ConfigPaths;
pub use properties::{ListProperty, NameComparison};
pub use provider::ScopedTierProvider;
pub use sets::{NameSet, WordSet};
pub use state::PropertyState;
pub use tier::{ConfigurationTier, TierChain, TierKind};

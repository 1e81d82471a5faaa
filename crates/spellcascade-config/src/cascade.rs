//! Configuration resolution across a tier chain
//!
//! Every property is resolved by override: the most specific tier that
//! defines it wins, otherwise the compiled default applies. Collection
//! properties follow the same rule; a winning list replaces inherited ones
//! wholesale.
//!
//! Stored data never makes resolution fail. An uninterpretable value is
//! treated as absent at its tier. Any other store failure abandons the walk
//! and yields the compiled defaults for every property. Both cases are
//! reported through the cascade's [`DiagnosticSink`].

use std::sync::Arc;

use spellcascade_storage::{FromPropertyValue, PropertyValue, StorageError};
use tracing::debug;

use crate::culture::Culture;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogDiagnostics};
use crate::effective::{BehaviorFlags, CSharpOptions, EffectiveConfiguration, IgnoredCharacterClass};
use crate::error::Result;
use crate::extensions::ExtensionExclusionSet;
use crate::properties::{
    self, names, ListProperty, IGNORED_WORDS, IGNORED_XML_ELEMENTS, SPELL_CHECKED_XML_ATTRIBUTES,
};
use crate::tier::{ConfigurationTier, TierChain, TierKind};

/// Which tier supplied a resolved property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionDecision {
    /// The property that was resolved
    pub property: &'static str,
    /// Kind of the winning tier; `None` when the compiled default applied
    pub source: Option<TierKind>,
    /// Identifier of the winning tier
    pub tier_id: Option<String>,
}

impl ResolutionDecision {
    fn from_winner(property: &'static str, winner: Option<&ConfigurationTier>) -> Self {
        Self {
            property,
            source: winner.map(ConfigurationTier::kind),
            tier_id: winner.map(|tier| tier.id().to_string()),
        }
    }

    /// Whether the compiled default was used
    pub fn is_default(&self) -> bool {
        self.source.is_none()
    }
}

/// A store failure that invalidates the whole walk
struct TierFailure<'a> {
    tier: &'a ConfigurationTier,
    error: StorageError,
}

type Walk<'a, T> = std::result::Result<T, TierFailure<'a>>;

/// Resolves tier chains into [`EffectiveConfiguration`] snapshots.
///
/// Holds no per-document state and may be shared between threads; each call
/// to [`resolve`](Self::resolve) is independent.
#[derive(Clone)]
pub struct ConfigurationCascade {
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for ConfigurationCascade {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigurationCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationCascade").finish_non_exhaustive()
    }
}

impl ConfigurationCascade {
    /// Create a cascade that logs its diagnostics
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(LogDiagnostics))
    }

    /// Create a cascade reporting diagnostics to `sink`
    pub fn with_diagnostics(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { diagnostics: sink }
    }

    /// Resolve the effective configuration of `chain`
    pub fn resolve(&self, chain: &TierChain) -> EffectiveConfiguration {
        self.resolve_with_trace(chain).0
    }

    /// Validate `tiers` (least specific first) as a chain and resolve it.
    ///
    /// Fails only when the tiers do not form a valid chain.
    pub fn resolve_tiers(&self, tiers: Vec<ConfigurationTier>) -> Result<EffectiveConfiguration> {
        let chain = TierChain::new(tiers)?;
        Ok(self.resolve(&chain))
    }

    /// Resolve `chain` and report which tier supplied each property.
    ///
    /// When a tier is unavailable the configuration is all defaults and the
    /// trace is empty.
    pub fn resolve_with_trace(
        &self,
        chain: &TierChain,
    ) -> (EffectiveConfiguration, Vec<ResolutionDecision>) {
        let mut decisions = Vec::new();

        match self.walk(chain, &mut decisions) {
            Ok(config) => {
                for decision in &decisions {
                    debug!(
                        property = %decision.property,
                        source = ?decision.source,
                        tier_id = ?decision.tier_id,
                        "Property resolved"
                    );
                }
                (config, decisions)
            }
            Err(failure) => {
                self.diagnostics.report(Diagnostic::TierUnavailable {
                    tier: failure.tier.kind(),
                    tier_id: failure.tier.id().to_string(),
                    message: failure.error.to_string(),
                });
                (EffectiveConfiguration::default(), Vec::new())
            }
        }
    }

    fn walk<'a>(
        &self,
        chain: &'a TierChain,
        decisions: &mut Vec<ResolutionDecision>,
    ) -> Walk<'a, EffectiveConfiguration> {
        let default_language = self
            .scalar(chain, names::DEFAULT_LANGUAGE, decisions, |value| {
                String::from_property_value(names::DEFAULT_LANGUAGE, value)
                    .map_err(|e| e.to_string())?
                    .parse::<Culture>()
                    .map_err(|e| e.to_string())
            })?
            .unwrap_or_default();

        let flags = BehaviorFlags {
            spell_check_as_you_type: self.flag(chain, names::SPELL_CHECK_AS_YOU_TYPE, decisions)?,
            ignore_words_with_digits: self.flag(chain, names::IGNORE_WORDS_WITH_DIGITS, decisions)?,
            ignore_words_in_all_uppercase: self.flag(
                chain,
                names::IGNORE_WORDS_IN_ALL_UPPERCASE,
                decisions,
            )?,
            ignore_format_specifiers: self.flag(chain, names::IGNORE_FORMAT_SPECIFIERS, decisions)?,
            ignore_filenames_and_email_addresses: self.flag(
                chain,
                names::IGNORE_FILENAMES_AND_EMAIL_ADDRESSES,
                decisions,
            )?,
            ignore_xml_elements_in_text: self.flag(
                chain,
                names::IGNORE_XML_ELEMENTS_IN_TEXT,
                decisions,
            )?,
            treat_underscore_as_separator: self.flag(
                chain,
                names::TREAT_UNDERSCORE_AS_SEPARATOR,
                decisions,
            )?,
        };

        let ignore_character_class = self
            .scalar(chain, names::IGNORE_CHARACTER_CLASS, decisions, |value| {
                String::from_property_value(names::IGNORE_CHARACTER_CLASS, value)
                    .map_err(|e| e.to_string())?
                    .parse::<IgnoredCharacterClass>()
            })?
            .unwrap_or_default();

        let csharp_options = CSharpOptions {
            ignore_xml_doc_comments: self.flag(chain, names::CSHARP_IGNORE_XML_DOC_COMMENTS, decisions)?,
            ignore_delimited_comments: self.flag(
                chain,
                names::CSHARP_IGNORE_DELIMITED_COMMENTS,
                decisions,
            )?,
            ignore_standard_single_line_comments: self.flag(
                chain,
                names::CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS,
                decisions,
            )?,
            ignore_quadruple_slash_comments: self.flag(
                chain,
                names::CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS,
                decisions,
            )?,
            ignore_normal_strings: self.flag(chain, names::CSHARP_IGNORE_NORMAL_STRINGS, decisions)?,
            ignore_verbatim_strings: self.flag(
                chain,
                names::CSHARP_IGNORE_VERBATIM_STRINGS,
                decisions,
            )?,
        };

        let extension_exclusions = self
            .scalar(chain, names::EXCLUDE_BY_FILENAME_EXTENSION, decisions, |value| {
                String::from_property_value(names::EXCLUDE_BY_FILENAME_EXTENSION, value)
                    .map_err(|e| e.to_string())
            })?
            .map(|raw| ExtensionExclusionSet::parse(&raw))
            .unwrap_or_default();

        Ok(EffectiveConfiguration {
            default_language,
            flags,
            ignore_character_class,
            csharp_options,
            ignored_words: self.list(chain, IGNORED_WORDS, decisions)?.iter().collect(),
            ignored_xml_elements: self.list(chain, IGNORED_XML_ELEMENTS, decisions)?.iter().collect(),
            spell_checked_xml_attributes: self
                .list(chain, SPELL_CHECKED_XML_ATTRIBUTES, decisions)?
                .iter()
                .collect(),
            extension_exclusions,
        })
    }

    fn flag<'a>(
        &self,
        chain: &'a TierChain,
        property: &'static str,
        decisions: &mut Vec<ResolutionDecision>,
    ) -> Walk<'a, bool> {
        let value = self.scalar(chain, property, decisions, |value| {
            bool::from_property_value(property, value).map_err(|e| e.to_string())
        })?;
        Ok(value
            .or_else(|| properties::bool_default(property))
            .unwrap_or_default())
    }

    /// Walk most specific first and return the first interpretable value.
    /// `None` means no tier defines the property.
    fn scalar<'a, T>(
        &self,
        chain: &'a TierChain,
        property: &'static str,
        decisions: &mut Vec<ResolutionDecision>,
        parse: impl Fn(PropertyValue) -> std::result::Result<T, String>,
    ) -> Walk<'a, Option<T>> {
        for tier in chain.most_specific_first() {
            if !self.defines(tier, property)? {
                continue;
            }

            let raw = match tier.store().read_value(property) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(error) if error.is_value_error() => {
                    self.report_invalid(tier, property, error.to_string());
                    continue;
                }
                Err(error) => return Err(TierFailure { tier, error }),
            };

            match parse(raw) {
                Ok(value) => {
                    decisions.push(ResolutionDecision::from_winner(property, Some(tier)));
                    return Ok(Some(value));
                }
                Err(message) => self.report_invalid(tier, property, message),
            }
        }

        decisions.push(ResolutionDecision::from_winner(property, None));
        Ok(None)
    }

    /// Resolve a list property; the winning tier's items are used verbatim
    fn list<'a>(
        &self,
        chain: &'a TierChain,
        property: ListProperty,
        decisions: &mut Vec<ResolutionDecision>,
    ) -> Walk<'a, Vec<String>> {
        for tier in chain.most_specific_first() {
            if !self.defines(tier, property.name)? {
                continue;
            }

            match tier.store().read_list(property.name, property.item_tag) {
                Ok(items) => {
                    decisions.push(ResolutionDecision::from_winner(property.name, Some(tier)));
                    return Ok(items);
                }
                Err(error) if error.is_value_error() => {
                    self.report_invalid(tier, property.name, error.to_string());
                }
                Err(error) => return Err(TierFailure { tier, error }),
            }
        }

        decisions.push(ResolutionDecision::from_winner(property.name, None));
        Ok(property.defaults.iter().map(|item| item.to_string()).collect())
    }

    fn defines<'a>(&self, tier: &'a ConfigurationTier, property: &str) -> Walk<'a, bool> {
        match tier.store().has_property(property) {
            Ok(defined) => Ok(defined),
            Err(error) if error.is_value_error() => {
                self.report_invalid(tier, property, error.to_string());
                Ok(false)
            }
            Err(error) => Err(TierFailure { tier, error }),
        }
    }

    fn report_invalid(&self, tier: &ConfigurationTier, property: &str, message: String) {
        self.diagnostics.report(Diagnostic::InvalidValue {
            tier: tier.kind(),
            tier_id: tier.id().to_string(),
            property: property.to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectedDiagnostics;
    use spellcascade_storage::MemoryStore;

    fn chain(tiers: Vec<(TierKind, MemoryStore)>) -> TierChain {
        TierChain::new(
            tiers
                .into_iter()
                .map(|(kind, store)| ConfigurationTier::new(kind, Arc::new(store)))
                .collect(),
        )
        .unwrap()
    }

    fn collecting() -> (ConfigurationCascade, Arc<CollectedDiagnostics>) {
        let sink = Arc::new(CollectedDiagnostics::new());
        (ConfigurationCascade::with_diagnostics(sink.clone()), sink)
    }

    #[test]
    fn test_empty_stores_resolve_to_defaults() {
        let cascade = ConfigurationCascade::new();
        let config = cascade.resolve(&chain(vec![(TierKind::Global, MemoryStore::new())]));

        assert_eq!(config, EffectiveConfiguration::default());
    }

    #[test]
    fn test_project_overrides_global_flag() {
        let cascade = ConfigurationCascade::new();
        let config = cascade.resolve(&chain(vec![
            (
                TierKind::Global,
                MemoryStore::named("g").with_value(names::IGNORE_WORDS_WITH_DIGITS, false),
            ),
            (
                TierKind::Project,
                MemoryStore::named("p").with_value(names::IGNORE_WORDS_WITH_DIGITS, true),
            ),
        ]));

        assert!(config.flags().ignore_words_with_digits);
    }

    #[test]
    fn test_invalid_culture_falls_through() {
        let (cascade, sink) = collecting();
        let config = cascade.resolve(&chain(vec![
            (
                TierKind::Global,
                MemoryStore::named("g").with_value(names::DEFAULT_LANGUAGE, "de-DE"),
            ),
            (
                TierKind::Project,
                MemoryStore::named("p").with_value(names::DEFAULT_LANGUAGE, "not a culture"),
            ),
        ]));

        assert_eq!(config.default_language().name(), "de-DE");
        let diagnostics = sink.drain();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::InvalidValue { property, tier: TierKind::Project, .. }
                if property == names::DEFAULT_LANGUAGE
        ));
    }

    #[test]
    fn test_wrongly_typed_flag_falls_through() {
        let (cascade, sink) = collecting();
        let config = cascade.resolve(&chain(vec![
            (TierKind::Global, MemoryStore::named("g")),
            (
                TierKind::Project,
                MemoryStore::named("p").with_value(names::SPELL_CHECK_AS_YOU_TYPE, "sometimes"),
            ),
        ]));

        assert!(config.spell_check_as_you_type());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_set_override_replaces_inherited_list() {
        let cascade = ConfigurationCascade::new();
        let config = cascade.resolve(&chain(vec![
            (
                TierKind::Global,
                MemoryStore::named("g").with_list("ignored_words", "ignore", ["foo"]),
            ),
            (
                TierKind::Project,
                MemoryStore::named("p").with_list("ignored_words", "ignore", ["bar"]),
            ),
        ]));

        assert_eq!(config.ignored_words().to_sorted_vec(), vec!["bar".to_string()]);
    }

    #[test]
    fn test_empty_list_suppresses_defaults() {
        let cascade = ConfigurationCascade::new();
        let empty: [&str; 0] = [];
        let config = cascade.resolve(&chain(vec![
            (TierKind::Global, MemoryStore::named("g")),
            (
                TierKind::Project,
                MemoryStore::named("p").with_list("ignored_xml_elements", "ignore", empty),
            ),
        ]));

        assert!(config.ignored_xml_elements().is_empty());
        assert!(!config.ignored_words().is_empty());
    }

    #[test]
    fn test_blank_exclusion_clears_inherited_exclusions() {
        let cascade = ConfigurationCascade::new();
        let config = cascade.resolve(&chain(vec![
            (
                TierKind::Global,
                MemoryStore::named("g").with_value(names::EXCLUDE_BY_FILENAME_EXTENSION, ".txt"),
            ),
            (
                TierKind::Project,
                MemoryStore::named("p").with_value(names::EXCLUDE_BY_FILENAME_EXTENSION, "  "),
            ),
        ]));

        assert!(config.extension_exclusions().is_empty());
        assert!(!config.is_extension_excluded("txt"));
    }

    #[test]
    fn test_unavailable_tier_degrades_to_defaults() {
        let (cascade, sink) = collecting();
        let project = MemoryStore::named("p").with_value(names::IGNORE_WORDS_WITH_DIGITS, false);
        project.set_unavailable(Some("corrupt".to_string()));
        let global = MemoryStore::named("g").with_value(names::DEFAULT_LANGUAGE, "fr-FR");

        let (config, trace) = cascade.resolve_with_trace(&chain(vec![
            (TierKind::Global, global),
            (TierKind::Project, project),
        ]));

        assert_eq!(config, EffectiveConfiguration::default());
        assert!(trace.is_empty());
        let diagnostics = sink.drain();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::TierUnavailable { tier: TierKind::Project, tier_id, .. } if tier_id == "p"
        ));
    }

    #[test]
    fn test_trace_names_winning_tier() {
        let cascade = ConfigurationCascade::new();
        let (_, trace) = cascade.resolve_with_trace(&chain(vec![
            (TierKind::Global, MemoryStore::named("g")),
            (
                TierKind::Solution,
                MemoryStore::named("s").with_value(names::TREAT_UNDERSCORE_AS_SEPARATOR, true),
            ),
        ]));

        let underscore = trace
            .iter()
            .find(|d| d.property == names::TREAT_UNDERSCORE_AS_SEPARATOR)
            .unwrap();
        assert_eq!(underscore.source, Some(TierKind::Solution));
        assert_eq!(underscore.tier_id.as_deref(), Some("s"));

        let language = trace
            .iter()
            .find(|d| d.property == names::DEFAULT_LANGUAGE)
            .unwrap();
        assert!(language.is_default());
    }

    #[test]
    fn test_resolve_tiers_rejects_empty_chain() {
        let cascade = ConfigurationCascade::new();
        assert!(cascade.resolve_tiers(Vec::new()).is_err());
    }
}

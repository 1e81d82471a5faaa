//! Editing session for one configuration tier
//!
//! Edits always target a single store. Inheritance is expressed by removing
//! a property; the global tier cannot inherit its flags or its language.
//! After editing, [`TierEditor::commit`] persists the store and invalidates
//! every cached document governed by the tier.

use std::sync::Arc;

use spellcascade_storage::{PropertyStoreExt, PropertyValue, StorageError};
use tracing::{debug, info};

use crate::cache::BufferConfigurationCache;
use crate::culture::Culture;
use crate::effective::IgnoredCharacterClass;
use crate::error::{ConfigError, Result};
use crate::properties::{self, names, ListProperty, NameComparison, BEHAVIOR_FLAGS, CSHARP_FLAGS};
use crate::sets::{NameSet, WordSet};
use crate::state::PropertyState;
use crate::tier::{ConfigurationTier, TierChain, TierKind};

/// Editing session over one tier's store
///
/// Callers must not run two editors over the same tier at once.
#[derive(Debug)]
pub struct TierEditor {
    tier: ConfigurationTier,
    dirty: bool,
}

impl TierEditor {
    pub fn new(tier: ConfigurationTier) -> Self {
        Self { tier, dirty: false }
    }

    /// Edit the most specific tier of `chain`
    pub fn for_leaf(chain: &TierChain) -> Self {
        Self::new(chain.leaf().clone())
    }

    pub fn tier(&self) -> &ConfigurationTier {
        &self.tier
    }

    pub fn kind(&self) -> TierKind {
        self.tier.kind()
    }

    /// Whether there are changes not yet committed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tri-state value of one of the behavior flags
    pub fn property_state(&self, flag: &str) -> Result<PropertyState> {
        ensure_known(flag, &BEHAVIOR_FLAGS)?;
        PropertyState::from_tier(&self.tier, flag)
    }

    /// Set a behavior flag; `Inherited` removes it from the tier
    pub fn set_property_state(&mut self, flag: &str, state: PropertyState) -> Result<()> {
        ensure_known(flag, &BEHAVIOR_FLAGS)?;
        if state == PropertyState::Inherited {
            self.ensure_inheritable(flag)?;
        }

        let value = state.to_property_value().map(PropertyValue::Bool);
        self.tier.store().write_scalar(flag, value)?;
        self.touched(flag);
        Ok(())
    }

    /// Value of a C# option, which is a plain flag in every tier
    pub fn flag(&self, name: &str) -> Result<bool> {
        ensure_known(name, &CSHARP_FLAGS)?;
        Ok(self
            .tier
            .store()
            .read_scalar(name, properties::bool_default(name))?)
    }

    pub fn set_flag(&mut self, name: &str, value: bool) -> Result<()> {
        ensure_known(name, &CSHARP_FLAGS)?;
        self.tier.store().write_value(name, PropertyValue::Bool(value))?;
        self.touched(name);
        Ok(())
    }

    /// The tier's language. `None` when inherited; the global tier reports
    /// the compiled default instead. An unparseable culture counts as absent.
    pub fn default_language(&self) -> Result<Option<Culture>> {
        let name = names::DEFAULT_LANGUAGE;
        let culture = self.optional_text(name)?.and_then(|raw| match raw.parse::<Culture>() {
            Ok(culture) => Some(culture),
            Err(e) => {
                self.unreadable(name, &e.to_string());
                None
            }
        });

        match culture {
            None if self.kind().is_global() => Ok(Some(Culture::default())),
            culture => Ok(culture),
        }
    }

    pub fn set_default_language(&mut self, culture: Option<&Culture>) -> Result<()> {
        let name = names::DEFAULT_LANGUAGE;
        if culture.is_none() {
            self.ensure_inheritable(name)?;
        }

        let value = culture.map(|c| PropertyValue::Text(c.name()));
        self.tier.store().write_scalar(name, value)?;
        self.touched(name);
        Ok(())
    }

    /// The raw exclusion string, `None` when inherited
    pub fn excluded_extensions(&self) -> Result<Option<String>> {
        self.optional_text(names::EXCLUDE_BY_FILENAME_EXTENSION)
    }

    /// Set the exclusion string. It is stored trimmed, and a blank string is
    /// still stored so the tier clears any inherited exclusions.
    pub fn set_excluded_extensions(&mut self, extensions: Option<&str>) -> Result<()> {
        let name = names::EXCLUDE_BY_FILENAME_EXTENSION;
        let value = extensions.map(|ext| PropertyValue::Text(ext.trim().to_string()));
        self.tier.store().write_scalar(name, value)?;
        self.touched(name);
        Ok(())
    }

    /// The tier's character class, `None` when inherited or unreadable
    pub fn ignore_character_class(&self) -> Result<Option<IgnoredCharacterClass>> {
        let name = names::IGNORE_CHARACTER_CLASS;
        Ok(self.optional_text(name)?.and_then(|raw| match raw.parse::<IgnoredCharacterClass>() {
            Ok(class) => Some(class),
            Err(e) => {
                self.unreadable(name, &e);
                None
            }
        }))
    }

    pub fn set_ignore_character_class(&mut self, class: Option<IgnoredCharacterClass>) -> Result<()> {
        let name = names::IGNORE_CHARACTER_CLASS;
        let value = class.map(|c| PropertyValue::Text(c.to_string()));
        self.tier.store().write_scalar(name, value)?;
        self.touched(name);
        Ok(())
    }

    /// Items of a list property, `None` when the tier does not define it
    pub fn list(&self, property: ListProperty) -> Result<Option<Vec<String>>> {
        let store = self.tier.store();
        if !store.has_property(property.name)? {
            return Ok(None);
        }
        Ok(Some(store.read_list(property.name, property.item_tag)?))
    }

    /// Replace a list property; `None` removes it so the tier inherits.
    ///
    /// Returns false when nothing was written because the tier already holds
    /// an equal list.
    pub fn set_list(&mut self, property: ListProperty, items: Option<&[String]>) -> Result<bool> {
        let store = self.tier.store();

        let Some(items) = items else {
            let removed = store.remove_property(property.name)?;
            if removed {
                self.touched(property.name);
            }
            return Ok(removed);
        };

        if let Some(current) = self.list(property)? {
            if same_items(property.comparison, &current, items) {
                debug!(property = %property.name, tier = %self.tier.id(), "List unchanged, not rewritten");
                return Ok(false);
            }
        }

        let stored = normalized_items(property.comparison, items);
        self.tier
            .store()
            .write_list(property.name, property.item_tag, &stored)?;
        self.touched(property.name);
        Ok(true)
    }

    /// Persist the store and invalidate every cached document that depends
    /// on this tier. Returns the number of invalidated documents.
    pub fn commit(&mut self, cache: &BufferConfigurationCache) -> Result<usize> {
        self.tier.store().flush()?;
        self.dirty = false;

        let invalidated = cache.invalidate_tier(self.tier.id());
        info!(
            tier = %self.tier.kind(),
            tier_id = %self.tier.id(),
            invalidated,
            "Configuration committed"
        );
        Ok(invalidated)
    }

    /// The shared store, for callers that edit properties this type does not
    /// cover
    pub fn store(&self) -> Arc<dyn spellcascade_storage::PropertyStore> {
        self.tier.shared_store()
    }

    /// A text property; absent and wrongly typed values are both `None`
    fn optional_text(&self, name: &str) -> Result<Option<String>> {
        match self.tier.store().read_scalar::<String>(name, None) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::MissingProperty { .. }) => Ok(None),
            Err(e) if e.is_value_error() => {
                self.unreadable(name, &e.to_string());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn unreadable(&self, property: &str, message: &str) {
        debug!(property = %property, tier = %self.tier.id(), error = %message, "Ignoring unreadable value");
    }

    fn ensure_inheritable(&self, property: &str) -> Result<()> {
        if self.kind().is_global() {
            return Err(ConfigError::InheritedOnGlobal {
                property: property.to_string(),
            });
        }
        Ok(())
    }

    fn touched(&mut self, property: &str) {
        debug!(property = %property, tier = %self.tier.id(), "Property edited");
        self.dirty = true;
    }
}

fn ensure_known(name: &str, group: &[&str]) -> Result<()> {
    if group.contains(&name) {
        Ok(())
    } else {
        Err(ConfigError::UnknownProperty(name.to_string()))
    }
}

/// Sorted, de-duplicated items under the property's comparison mode
fn normalized_items(comparison: NameComparison, items: &[String]) -> Vec<String> {
    match comparison {
        NameComparison::CaseInsensitive => items.iter().collect::<WordSet>().to_sorted_vec(),
        NameComparison::CaseSensitive => {
            let mut sorted = items.to_vec();
            sorted.sort();
            sorted.dedup();
            sorted
        }
    }
}

fn same_items(comparison: NameComparison, a: &[String], b: &[String]) -> bool {
    match comparison {
        NameComparison::CaseInsensitive => {
            a.iter().collect::<WordSet>().same_words(&b.iter().collect::<WordSet>())
        }
        NameComparison::CaseSensitive => a.iter().collect::<NameSet>() == b.iter().collect::<NameSet>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::ConfigurationCascade;
    use crate::properties::{IGNORED_WORDS, IGNORED_XML_ELEMENTS};
    use spellcascade_storage::{MemoryStore, PropertyStore};

    fn editor(kind: TierKind) -> (TierEditor, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::named(kind.name()));
        let tier = ConfigurationTier::new(kind, store.clone());
        (TierEditor::new(tier), store)
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inherited_removes_property() {
        let (mut editor, store) = editor(TierKind::Project);

        editor
            .set_property_state(names::IGNORE_WORDS_WITH_DIGITS, PropertyState::No)
            .unwrap();
        assert!(store.has_property(names::IGNORE_WORDS_WITH_DIGITS).unwrap());

        editor
            .set_property_state(names::IGNORE_WORDS_WITH_DIGITS, PropertyState::Inherited)
            .unwrap();
        assert!(store.is_empty());
        assert_eq!(
            editor.property_state(names::IGNORE_WORDS_WITH_DIGITS).unwrap(),
            PropertyState::Inherited
        );
    }

    #[test]
    fn test_global_cannot_inherit() {
        let (mut editor, _) = editor(TierKind::Global);

        let err = editor
            .set_property_state(names::SPELL_CHECK_AS_YOU_TYPE, PropertyState::Inherited)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InheritedOnGlobal { .. }));
        assert!(editor.set_default_language(None).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let (editor, _) = editor(TierKind::Project);
        assert!(matches!(
            editor.property_state("font_size"),
            Err(ConfigError::UnknownProperty(_))
        ));
        assert!(editor.flag(names::SPELL_CHECK_AS_YOU_TYPE).is_err());
    }

    #[test]
    fn test_default_language_inheritance() {
        let (mut project, _) = editor(TierKind::Project);
        let (global, _) = editor(TierKind::Global);

        assert_eq!(project.default_language().unwrap(), None);
        assert_eq!(global.default_language().unwrap(), Some(Culture::en_us()));

        let german: Culture = "de-DE".parse().unwrap();
        project.set_default_language(Some(&german)).unwrap();
        assert_eq!(project.default_language().unwrap(), Some(german));
    }

    #[test]
    fn test_blank_exclusions_are_kept() {
        let (mut editor, store) = editor(TierKind::Solution);

        editor.set_excluded_extensions(Some("   ")).unwrap();

        assert!(store.has_property(names::EXCLUDE_BY_FILENAME_EXTENSION).unwrap());
        assert_eq!(editor.excluded_extensions().unwrap(), Some(String::new()));
    }

    #[test]
    fn test_equal_list_not_rewritten() {
        let (mut editor, _) = editor(TierKind::Project);

        assert!(editor
            .set_list(IGNORED_WORDS, Some(&words(&["Tokio", "serde"])))
            .unwrap());
        assert!(!editor
            .set_list(IGNORED_WORDS, Some(&words(&["SERDE", "tokio"])))
            .unwrap());
        assert_eq!(editor.list(IGNORED_WORDS).unwrap(), Some(words(&["serde", "Tokio"])));

        assert!(editor.set_list(IGNORED_WORDS, None).unwrap());
        assert_eq!(editor.list(IGNORED_WORDS).unwrap(), None);
    }

    #[test]
    fn test_ignored_words_deduplicated_ignoring_case() {
        let (mut editor, _) = editor(TierKind::Project);

        editor
            .set_list(IGNORED_WORDS, Some(&words(&["Tokio", "tokio", "serde", "TOKIO"])))
            .unwrap();
        assert_eq!(editor.list(IGNORED_WORDS).unwrap(), Some(words(&["serde", "Tokio"])));
    }

    #[test]
    fn test_element_names_keep_case_variants() {
        let (mut editor, _) = editor(TierKind::Project);

        editor
            .set_list(IGNORED_XML_ELEMENTS, Some(&words(&["code", "Code", "code"])))
            .unwrap();
        assert_eq!(
            editor.list(IGNORED_XML_ELEMENTS).unwrap(),
            Some(words(&["Code", "code"]))
        );
    }

    #[test]
    fn test_unreadable_values_read_as_absent() {
        let global_store = Arc::new(
            MemoryStore::named("global")
                .with_value(names::SPELL_CHECK_AS_YOU_TYPE, "sometimes")
                .with_value(names::DEFAULT_LANGUAGE, "not a culture!")
                .with_value(names::IGNORE_CHARACTER_CLASS, "klingon"),
        );
        let global = TierEditor::new(ConfigurationTier::global(global_store));

        assert_eq!(
            global.property_state(names::SPELL_CHECK_AS_YOU_TYPE).unwrap(),
            PropertyState::Yes
        );
        assert_eq!(global.default_language().unwrap(), Some(Culture::en_us()));
        assert_eq!(global.ignore_character_class().unwrap(), None);

        let project_store = Arc::new(
            MemoryStore::named("project")
                .with_value(names::IGNORE_WORDS_WITH_DIGITS, "perhaps")
                .with_value(names::DEFAULT_LANGUAGE, true)
                .with_value(names::EXCLUDE_BY_FILENAME_EXTENSION, false),
        );
        let project = TierEditor::new(ConfigurationTier::new(TierKind::Project, project_store));

        assert_eq!(
            project.property_state(names::IGNORE_WORDS_WITH_DIGITS).unwrap(),
            PropertyState::Inherited
        );
        assert_eq!(project.default_language().unwrap(), None);
        assert_eq!(project.excluded_extensions().unwrap(), None);
    }

    #[test]
    fn test_character_class_round_trip() {
        let (mut editor, _) = editor(TierKind::Folder);

        assert_eq!(editor.ignore_character_class().unwrap(), None);
        editor
            .set_ignore_character_class(Some(IgnoredCharacterClass::NonLatin))
            .unwrap();
        assert_eq!(
            editor.ignore_character_class().unwrap(),
            Some(IgnoredCharacterClass::NonLatin)
        );
    }

    #[test]
    fn test_commit_clears_dirty_flag() {
        struct NoTiers;
        impl crate::cache::TierProvider for NoTiers {
            fn tiers_for(&self, _: &crate::cache::DocumentIdentity) -> Vec<ConfigurationTier> {
                Vec::new()
            }
        }

        let cache = BufferConfigurationCache::new(ConfigurationCascade::new(), Arc::new(NoTiers));
        let (mut editor, _) = editor(TierKind::Project);

        editor
            .set_flag(names::CSHARP_IGNORE_VERBATIM_STRINGS, true)
            .unwrap();
        assert!(editor.is_dirty());
        assert!(editor.flag(names::CSHARP_IGNORE_VERBATIM_STRINGS).unwrap());

        assert_eq!(editor.commit(&cache).unwrap(), 0);
        assert!(!editor.is_dirty());
    }
}

//! The resolved, immutable configuration for one document
//!
//! Built by [`crate::cascade::ConfigurationCascade`] and never mutated
//! afterwards; a configuration change produces a new snapshot. The query
//! methods are pure and cheap, since they run for every word of every file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::culture::Culture;
use crate::extensions::ExtensionExclusionSet;
use crate::properties::{IGNORED_WORDS, IGNORED_XML_ELEMENTS, SPELL_CHECKED_XML_ATTRIBUTES};
use crate::sets::{NameSet, WordSet};

/// Words to skip based on the characters they contain.
///
/// A simple way to check only the English text of files that mix it with
/// Cyrillic or Asian text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IgnoredCharacterClass {
    /// Check all words
    #[default]
    None,
    /// Skip words containing characters outside the Latin script
    NonLatin,
    /// Skip words containing non-ASCII characters
    NonAscii,
}

impl FromStr for IgnoredCharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(IgnoredCharacterClass::None),
            "nonlatin" => Ok(IgnoredCharacterClass::NonLatin),
            "nonascii" => Ok(IgnoredCharacterClass::NonAscii),
            _ => Err(format!("unknown character class '{}'", s)),
        }
    }
}

impl fmt::Display for IgnoredCharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoredCharacterClass::None => write!(f, "None"),
            IgnoredCharacterClass::NonLatin => write!(f, "NonLatin"),
            IgnoredCharacterClass::NonAscii => write!(f, "NonAscii"),
        }
    }
}

/// Options applying to C# source files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CSharpOptions {
    pub ignore_xml_doc_comments: bool,
    pub ignore_delimited_comments: bool,
    pub ignore_standard_single_line_comments: bool,
    pub ignore_quadruple_slash_comments: bool,
    pub ignore_normal_strings: bool,
    pub ignore_verbatim_strings: bool,
}

/// The seven behavior flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorFlags {
    pub spell_check_as_you_type: bool,
    pub ignore_words_with_digits: bool,
    pub ignore_words_in_all_uppercase: bool,
    pub ignore_format_specifiers: bool,
    pub ignore_filenames_and_email_addresses: bool,
    pub ignore_xml_elements_in_text: bool,
    pub treat_underscore_as_separator: bool,
}

impl Default for BehaviorFlags {
    fn default() -> Self {
        Self {
            spell_check_as_you_type: true,
            ignore_words_with_digits: true,
            ignore_words_in_all_uppercase: true,
            ignore_format_specifiers: true,
            ignore_filenames_and_email_addresses: true,
            ignore_xml_elements_in_text: true,
            treat_underscore_as_separator: false,
        }
    }
}

/// Immutable snapshot of every resolved setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfiguration {
    pub(crate) default_language: Culture,
    pub(crate) flags: BehaviorFlags,
    pub(crate) ignore_character_class: IgnoredCharacterClass,
    pub(crate) csharp_options: CSharpOptions,
    pub(crate) ignored_words: WordSet,
    pub(crate) ignored_xml_elements: NameSet,
    pub(crate) spell_checked_xml_attributes: NameSet,
    pub(crate) extension_exclusions: ExtensionExclusionSet,
}

/// Compiled defaults for every property
impl Default for EffectiveConfiguration {
    fn default() -> Self {
        Self {
            default_language: Culture::en_us(),
            flags: BehaviorFlags::default(),
            ignore_character_class: IgnoredCharacterClass::None,
            csharp_options: CSharpOptions::default(),
            ignored_words: IGNORED_WORDS.defaults.iter().collect(),
            ignored_xml_elements: IGNORED_XML_ELEMENTS.defaults.iter().collect(),
            spell_checked_xml_attributes: SPELL_CHECKED_XML_ATTRIBUTES.defaults.iter().collect(),
            extension_exclusions: ExtensionExclusionSet::new(),
        }
    }
}

impl EffectiveConfiguration {
    /// Language of the dictionary used for this document
    pub fn default_language(&self) -> &Culture {
        &self.default_language
    }

    pub fn flags(&self) -> &BehaviorFlags {
        &self.flags
    }

    /// Master switch; when off the document is not spell checked at all
    pub fn spell_check_as_you_type(&self) -> bool {
        self.flags.spell_check_as_you_type
    }

    pub fn ignore_character_class(&self) -> IgnoredCharacterClass {
        self.ignore_character_class
    }

    pub fn csharp_options(&self) -> &CSharpOptions {
        &self.csharp_options
    }

    pub fn ignored_words(&self) -> &WordSet {
        &self.ignored_words
    }

    pub fn ignored_xml_elements(&self) -> &NameSet {
        &self.ignored_xml_elements
    }

    pub fn spell_checked_xml_attributes(&self) -> &NameSet {
        &self.spell_checked_xml_attributes
    }

    pub fn extension_exclusions(&self) -> &ExtensionExclusionSet {
        &self.extension_exclusions
    }

    /// Whether files with `extension` are excluded from spell checking.
    ///
    /// The leading period is optional and case is ignored. Unknown
    /// extensions (`None`) are never excluded.
    pub fn is_extension_excluded<'a>(&self, extension: impl Into<Option<&'a str>>) -> bool {
        self.extension_exclusions.contains(extension.into())
    }

    /// Whether `word` is skipped. Missing, empty and whitespace-only words are
    /// always skipped; otherwise the ignored word list decides, ignoring case.
    pub fn should_ignore_word<'a>(&self, word: impl Into<Option<&'a str>>) -> bool {
        match word.into() {
            None => true,
            Some(w) if w.trim().is_empty() => true,
            Some(w) => self.ignored_words.contains(w),
        }
    }
}

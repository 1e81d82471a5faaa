//! Property names and their compiled-in defaults
//!
//! The defaults are a plain constant table consulted by the cascade when no
//! tier defines a property.

/// Scalar property names as persisted in each tier
pub mod names {
    pub const DEFAULT_LANGUAGE: &str = "default_language";
    pub const SPELL_CHECK_AS_YOU_TYPE: &str = "spell_check_as_you_type";
    pub const IGNORE_WORDS_WITH_DIGITS: &str = "ignore_words_with_digits";
    pub const IGNORE_WORDS_IN_ALL_UPPERCASE: &str = "ignore_words_in_all_uppercase";
    pub const IGNORE_FORMAT_SPECIFIERS: &str = "ignore_format_specifiers";
    pub const IGNORE_FILENAMES_AND_EMAIL_ADDRESSES: &str = "ignore_filenames_and_email_addresses";
    pub const IGNORE_XML_ELEMENTS_IN_TEXT: &str = "ignore_xml_elements_in_text";
    pub const TREAT_UNDERSCORE_AS_SEPARATOR: &str = "treat_underscore_as_separator";
    pub const IGNORE_CHARACTER_CLASS: &str = "ignore_character_class";
    pub const EXCLUDE_BY_FILENAME_EXTENSION: &str = "exclude_by_filename_extension";

    pub const CSHARP_IGNORE_XML_DOC_COMMENTS: &str = "csharp_ignore_xml_doc_comments";
    pub const CSHARP_IGNORE_DELIMITED_COMMENTS: &str = "csharp_ignore_delimited_comments";
    pub const CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS: &str =
        "csharp_ignore_standard_single_line_comments";
    pub const CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS: &str =
        "csharp_ignore_quadruple_slash_comments";
    pub const CSHARP_IGNORE_NORMAL_STRINGS: &str = "csharp_ignore_normal_strings";
    pub const CSHARP_IGNORE_VERBATIM_STRINGS: &str = "csharp_ignore_verbatim_strings";
}

/// Compiled default for a scalar property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Bool(bool),
    Text(&'static str),
}

impl DefaultValue {
    /// The boolean default, if this is a flag
    pub fn as_bool(self) -> Option<bool> {
        match self {
            DefaultValue::Bool(b) => Some(b),
            DefaultValue::Text(_) => None,
        }
    }

    /// The text default, if this is a text property
    pub fn as_text(self) -> Option<&'static str> {
        match self {
            DefaultValue::Text(s) => Some(s),
            DefaultValue::Bool(_) => None,
        }
    }
}

/// The seven behavior flags resolved with tri-state inheritance
pub const BEHAVIOR_FLAGS: [&str; 7] = [
    names::SPELL_CHECK_AS_YOU_TYPE,
    names::IGNORE_WORDS_WITH_DIGITS,
    names::IGNORE_WORDS_IN_ALL_UPPERCASE,
    names::IGNORE_FORMAT_SPECIFIERS,
    names::IGNORE_FILENAMES_AND_EMAIL_ADDRESSES,
    names::IGNORE_XML_ELEMENTS_IN_TEXT,
    names::TREAT_UNDERSCORE_AS_SEPARATOR,
];

/// C# source file options
pub const CSHARP_FLAGS: [&str; 6] = [
    names::CSHARP_IGNORE_XML_DOC_COMMENTS,
    names::CSHARP_IGNORE_DELIMITED_COMMENTS,
    names::CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS,
    names::CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS,
    names::CSHARP_IGNORE_NORMAL_STRINGS,
    names::CSHARP_IGNORE_VERBATIM_STRINGS,
];

/// Scalar defaults, keyed by property name
pub const SCALAR_DEFAULTS: &[(&str, DefaultValue)] = &[
    (names::DEFAULT_LANGUAGE, DefaultValue::Text("en-US")),
    (names::SPELL_CHECK_AS_YOU_TYPE, DefaultValue::Bool(true)),
    (names::IGNORE_WORDS_WITH_DIGITS, DefaultValue::Bool(true)),
    (names::IGNORE_WORDS_IN_ALL_UPPERCASE, DefaultValue::Bool(true)),
    (names::IGNORE_FORMAT_SPECIFIERS, DefaultValue::Bool(true)),
    (names::IGNORE_FILENAMES_AND_EMAIL_ADDRESSES, DefaultValue::Bool(true)),
    (names::IGNORE_XML_ELEMENTS_IN_TEXT, DefaultValue::Bool(true)),
    (names::TREAT_UNDERSCORE_AS_SEPARATOR, DefaultValue::Bool(false)),
    (names::IGNORE_CHARACTER_CLASS, DefaultValue::Text("None")),
    (names::EXCLUDE_BY_FILENAME_EXTENSION, DefaultValue::Text("")),
    (names::CSHARP_IGNORE_XML_DOC_COMMENTS, DefaultValue::Bool(false)),
    (names::CSHARP_IGNORE_DELIMITED_COMMENTS, DefaultValue::Bool(false)),
    (names::CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS, DefaultValue::Bool(false)),
    (names::CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS, DefaultValue::Bool(false)),
    (names::CSHARP_IGNORE_NORMAL_STRINGS, DefaultValue::Bool(false)),
    (names::CSHARP_IGNORE_VERBATIM_STRINGS, DefaultValue::Bool(false)),
];

/// Look up the compiled default of a scalar property
pub fn scalar_default(name: &str) -> Option<DefaultValue> {
    SCALAR_DEFAULTS
        .iter()
        .find(|(property, _)| *property == name)
        .map(|(_, value)| *value)
}

/// Compiled default of a boolean property
pub fn bool_default(name: &str) -> Option<bool> {
    scalar_default(name).and_then(DefaultValue::as_bool)
}

/// Whether names compare case-insensitively in a list property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameComparison {
    CaseInsensitive,
    CaseSensitive,
}

/// A collection-valued property and its compiled default contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProperty {
    pub name: &'static str,
    pub item_tag: &'static str,
    pub comparison: NameComparison,
    pub defaults: &'static [&'static str],
}

/// Words that are never spell checked.
///
/// Mostly Doxygen commands, which look like words starting with an escape.
pub const DEFAULT_IGNORED_WORDS: &[&str] = &[
    "\\addindex", "\\addtogroup", "\\anchor", "\\arg", "\\attention", "\\author", "\\authors",
    "\\brief", "\\bug", "\\file", "\\fn", "\\name", "\\namespace", "\\nosubgrouping", "\\note",
    "\\ref", "\\refitem", "\\related", "\\relates", "\\relatedalso", "\\relatesalso", "\\remark",
    "\\remarks", "\\result", "\\return", "\\returns", "\\retval", "\\rtfonly",
    "\\tableofcontents", "\\test", "\\throw", "\\throws", "\\todo", "\\tparam", "\\typedef",
    "\\var", "\\verbatim", "\\verbinclude", "\\version", "\\vhdlflow",
];

/// XML elements whose content is not spell checked
pub const DEFAULT_IGNORED_XML_ELEMENTS: &[&str] = &[
    "c", "code", "codeEntityReference", "codeReference", "codeInline", "command",
    "environmentVariable", "fictitiousUri", "foreignPhrase", "link", "linkTarget", "linkUri",
    "localUri", "replaceable", "see", "seeAlso", "unmanagedCodeEntityReference", "token",
];

/// XML attributes whose values are spell checked
pub const DEFAULT_SPELL_CHECKED_ATTRIBUTES: &[&str] = &[
    "altText", "Caption", "Content", "Header", "lead", "title", "term", "Text", "ToolTip",
];

pub const IGNORED_WORDS: ListProperty = ListProperty {
    name: "ignored_words",
    item_tag: "ignore",
    comparison: NameComparison::CaseInsensitive,
    defaults: DEFAULT_IGNORED_WORDS,
};

pub const IGNORED_XML_ELEMENTS: ListProperty = ListProperty {
    name: "ignored_xml_elements",
    item_tag: "ignore",
    comparison: NameComparison::CaseSensitive,
    defaults: DEFAULT_IGNORED_XML_ELEMENTS,
};

pub const SPELL_CHECKED_XML_ATTRIBUTES: ListProperty = ListProperty {
    name: "spell_checked_xml_attributes",
    item_tag: "spell_check",
    comparison: NameComparison::CaseSensitive,
    defaults: DEFAULT_SPELL_CHECKED_ATTRIBUTES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_flag_has_a_bool_default() {
        for flag in BEHAVIOR_FLAGS.iter().chain(CSHARP_FLAGS.iter()) {
            assert!(bool_default(flag).is_some(), "{} has no default", flag);
        }
    }

    #[test]
    fn test_default_language_is_en_us() {
        assert_eq!(
            scalar_default(names::DEFAULT_LANGUAGE).and_then(DefaultValue::as_text),
            Some("en-US")
        );
    }

    #[test]
    fn test_only_underscore_flag_defaults_off() {
        let off: Vec<_> = BEHAVIOR_FLAGS
            .iter()
            .filter(|flag| bool_default(flag) == Some(false))
            .collect();
        assert_eq!(off, vec![&names::TREAT_UNDERSCORE_AS_SEPARATOR]);
    }
}

//! Filename extensions excluded from spell checking
//!
//! Parsed from a single configuration string. Entries are separated by any
//! character that is neither a period nor a word character, may be written
//! with or without the leading period, and compare case-insensitively. A
//! lone `.` excludes files that have no extension.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Get or create the extension separator regex
fn separator_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^.\w]").expect("Invalid regex"))
}

/// Normalized set of excluded extensions, each starting with `.`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionExclusionSet {
    // lowercased; BTreeSet keeps the display form sorted
    extensions: BTreeSet<String>,
}

impl ExtensionExclusionSet {
    /// An empty set, excluding nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration string. Blank input yields an empty set.
    pub fn parse(value: &str) -> Self {
        if value.trim().is_empty() {
            return Self::new();
        }

        let extensions = separator_regex()
            .split(value)
            .filter(|ext| !ext.is_empty())
            .map(normalize)
            .collect();

        Self { extensions }
    }

    /// Whether files with `extension` are excluded.
    ///
    /// `None` (extension unknown) is never excluded. An empty extension is
    /// treated as "no extension" and matches a `.` entry.
    pub fn contains(&self, extension: Option<&str>) -> bool {
        match extension {
            None => false,
            Some(ext) => self.extensions.contains(&normalize(ext)),
        }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

fn normalize(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// The configuration string form: sorted entries separated by single spaces
impl fmt::Display for ExtensionExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(" "))
    }
}

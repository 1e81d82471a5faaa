//! Resolved name sets
//!
//! Ignored words compare case-insensitively. XML element and attribute names
//! are case-sensitive.

use std::collections::{BTreeSet, HashMap};

/// Case-insensitive set of words, remembering the first spelling seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSet {
    words: HashMap<String, String>,
}

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word; returns false if an equal word (ignoring case) exists
    pub fn insert(&mut self, word: &str) -> bool {
        let key = word.to_lowercase();
        if self.words.contains_key(&key) {
            return false;
        }
        self.words.insert(key, word.to_string());
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        if word.chars().all(|c| !c.is_alphabetic() || c.is_lowercase()) {
            self.words.contains_key(word)
        } else {
            self.words.contains_key(&word.to_lowercase())
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in their stored spelling, sorted case-insensitively
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut entries: Vec<_> = self.words.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, word)| word.clone()).collect()
    }

    /// Set equality ignoring case
    pub fn same_words(&self, other: &WordSet) -> bool {
        self.words.len() == other.words.len()
            && self.words.keys().all(|key| other.words.contains_key(key))
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = WordSet::new();
        for word in iter {
            set.insert(word.as_ref());
        }
        set
    }
}

/// Case-sensitive set of XML element or attribute names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: BTreeSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        NameSet {
            names: iter.into_iter().map(|name| name.as_ref().to_string()).collect(),
        }
    }
}

//! Dictionary files in the global configuration directory
//!
//! Dictionaries are Hunspell `.aff`/`.dic` pairs named after their culture.
//! Each culture may also have a user dictionary, `<culture>_User.dic`, holding
//! one word per line.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use spellcascade_storage::{IoOperation, StorageError};
use tracing::{debug, info};

use crate::culture::Culture;
use crate::error::Result;

/// Characters that separate words in an imported text file
const WORD_BREAKS: &[char] = &[
    ',', '/', '<', '>', '?', ';', ':', '"', '[', ']', '\\', '{', '}', '|', '-', '=', '+', '~', '!',
    '#', '$', '%', '^', '&', '*', '(', ')', ' ', '_', '.', '\'', '@', '\t', '\r', '\n',
];

/// Cultures with an installed dictionary in `dir`.
///
/// `en-US` ships with the checker and is always listed. Other cultures are
/// found from `.aff` files that have a matching `.dic` file and are named
/// after a valid culture.
pub fn available_dictionary_languages(dir: &Path) -> Vec<Culture> {
    let mut cultures = vec![Culture::en_us()];

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Dictionary directory not readable");
            return cultures;
        }
    };

    let mut found: Vec<Culture> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "aff"))
        .filter(|path| path.with_extension("dic").is_file())
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?;
            stem.parse::<Culture>().ok()
        })
        .filter(|culture| *culture != Culture::en_us())
        .collect();

    found.sort_by_key(Culture::name);
    found.dedup();
    cultures.extend(found);
    cultures
}

/// The user dictionary of one culture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDictionary {
    culture: Culture,
    path: PathBuf,
}

impl UserDictionary {
    /// The user dictionary of `culture` stored in `dir`
    pub fn for_culture(dir: &Path, culture: &Culture) -> Self {
        Self {
            culture: culture.clone(),
            path: dir.join(format!("{}_User.dic", culture.name())),
        }
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Words in the dictionary, sorted. A missing file is an empty dictionary.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::io_error(self.path.clone(), IoOperation::Read, e))?;

        let words: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(words.into_iter().collect())
    }

    /// Replace the dictionary's contents with `words`
    pub fn save(&self, words: &[String]) -> Result<()> {
        write_words(&self.path, words)
    }

    /// Remove `word`. Returns true if it was in the dictionary.
    pub fn remove_word(&self, word: &str) -> Result<bool> {
        let mut words = self.load()?;
        let before = words.len();
        words.retain(|w| w != word);

        if words.len() == before {
            return Ok(false);
        }

        self.save(&words)?;
        debug!(culture = %self.culture, word = %word, "Removed word from user dictionary");
        Ok(true)
    }

    /// Add the words of a text file to the dictionary.
    ///
    /// Only words longer than two characters and free of digits are taken.
    /// Returns the number of words added.
    pub fn import_from(&self, source: &Path) -> Result<usize> {
        let text = fs::read_to_string(source)
            .map_err(|e| StorageError::io_error(source.to_path_buf(), IoOperation::Read, e))?;

        let mut words: BTreeSet<String> = self.load()?.into_iter().collect();
        let before = words.len();

        words.extend(
            text.split(WORD_BREAKS)
                .filter(|word| word.chars().count() > 2)
                .filter(|word| !word.chars().any(|c| c.is_ascii_digit()))
                .map(str::to_string),
        );

        let added = words.len() - before;
        if added > 0 {
            self.save(&words.into_iter().collect::<Vec<_>>())?;
        }

        info!(
            culture = %self.culture,
            source = %source.display(),
            added,
            "Imported words into user dictionary"
        );
        Ok(added)
    }

    /// Write the dictionary's words to `target`
    pub fn export_to(&self, target: &Path) -> Result<()> {
        let words = self.load()?;
        write_words(target, &words)
    }
}

fn write_words(path: &Path, words: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StorageError::io_error(parent.to_path_buf(), IoOperation::Write, e))?;
    }

    let mut content = words.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    fs::write(path, content)
        .map_err(|e| StorageError::io_error(path.to_path_buf(), IoOperation::Write, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_available_languages() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "de_DE.aff");
        touch(dir.path(), "de_DE.dic");
        touch(dir.path(), "fr-FR.aff");
        touch(dir.path(), "en_US.aff");
        touch(dir.path(), "en_US.dic");
        touch(dir.path(), "not a culture.aff");
        touch(dir.path(), "not a culture.dic");

        let names: Vec<String> = available_dictionary_languages(dir.path())
            .iter()
            .map(Culture::name)
            .collect();

        assert_eq!(names, vec!["en-US", "de-DE"]);
    }

    #[test]
    fn test_missing_directory_lists_en_us() {
        let names: Vec<String> = available_dictionary_languages(Path::new("/no/such/dir"))
            .iter()
            .map(Culture::name)
            .collect();
        assert_eq!(names, vec!["en-US"]);
    }

    #[test]
    fn test_user_dictionary_file_name() {
        let dict = UserDictionary::for_culture(Path::new("/cfg"), &Culture::en_us());
        assert_eq!(dict.path(), Path::new("/cfg/en-US_User.dic"));
    }

    #[test]
    fn test_missing_user_dictionary_is_empty() {
        let dir = TempDir::new().unwrap();
        let dict = UserDictionary::for_culture(dir.path(), &Culture::en_us());
        assert!(dict.load().unwrap().is_empty());
        assert!(!dict.remove_word("anything").unwrap());
    }

    #[test]
    fn test_import_merges_and_filters() {
        let dir = TempDir::new().unwrap();
        let dict = UserDictionary::for_culture(dir.path(), &Culture::en_us());
        dict.save(&["rustacean".to_string()]).unwrap();

        let source = dir.path().join("words.txt");
        fs::write(&source, "tokio, serde; ab rustacean\nutf8 (crates.io)\n").unwrap();

        assert_eq!(dict.import_from(&source).unwrap(), 3);
        assert_eq!(
            dict.load().unwrap(),
            vec!["crates", "rustacean", "serde", "tokio"]
        );
    }

    #[test]
    fn test_remove_and_export() {
        let dir = TempDir::new().unwrap();
        let dict = UserDictionary::for_culture(dir.path(), &Culture::en_us());
        dict.save(&["alpha".to_string(), "beta".to_string()]).unwrap();

        assert!(dict.remove_word("alpha").unwrap());

        let target = dir.path().join("export").join("UserDictionary.dic");
        dict.export_to(&target).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "beta\n");
    }
}

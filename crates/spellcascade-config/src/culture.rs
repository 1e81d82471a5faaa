//! Culture identifiers for dictionary selection

use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

/// A validated culture identifier such as `en-US` or `az-Cyrl-AZ`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Culture(LanguageIdentifier);

/// Error returned for identifiers that are not valid cultures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid culture identifier")]
pub struct InvalidCulture(pub String);

impl Culture {
    /// The culture of the dictionary that always ships with the checker
    pub fn en_us() -> Self {
        Culture(unic_langid::langid!("en-US"))
    }

    /// Canonical name, e.g. `en-US`
    pub fn name(&self) -> String {
        self.0.to_string()
    }

    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::en_us()
    }
}

impl FromStr for Culture {
    type Err = InvalidCulture;

    /// Parse a culture name. Underscores are accepted as separators since
    /// dictionary files are commonly named `en_GB.dic`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidCulture(s.to_string()));
        }

        trimmed
            .replace('_', "-")
            .parse::<LanguageIdentifier>()
            .map(Culture)
            .map_err(|_| InvalidCulture(s.to_string()))
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

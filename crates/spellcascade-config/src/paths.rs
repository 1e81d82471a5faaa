//! Location of the per-user configuration directory and tier files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spellcascade_storage::TomlFileStore;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::tier::{ConfigurationTier, TierKind};

/// Environment variable overriding the global configuration directory
pub const HOME_ENV: &str = "SPELLCASCADE_HOME";

/// File name of the global tier
pub const GLOBAL_CONFIG_FILE: &str = "global.spellcascade.toml";

/// File name the global tier used before it was renamed
pub const LEGACY_GLOBAL_CONFIG_FILE: &str = "SpellChecker.toml";

/// Suffix of every non-global tier file
pub const TIER_FILE_SUFFIX: &str = ".spellcascade.toml";

/// Paths of the global configuration directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    global_dir: PathBuf,
}

impl ConfigPaths {
    /// Resolve the global configuration directory
    ///
    /// Resolution order:
    /// 1. SPELLCASCADE_HOME environment variable
    /// 2. The platform configuration directory
    /// 3. `.spellcascade` in the home directory
    pub fn resolve() -> Result<Self> {
        if let Ok(home_override) = std::env::var(HOME_ENV) {
            return Ok(Self::at(home_override));
        }

        if let Some(config_dir) = dirs::config_dir() {
            return Ok(Self::at(config_dir.join("spellcascade")));
        }

        if let Some(home_dir) = dirs::home_dir() {
            return Ok(Self::at(home_dir.join(".spellcascade")));
        }

        Err(ConfigError::PathResolution(
            "Could not determine a configuration directory".to_string(),
        ))
    }

    /// Use `dir` as the global configuration directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir: dir.into(),
        }
    }

    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    /// The global tier file.
    ///
    /// Falls back to the legacy file name when only the legacy file exists.
    pub fn global_config_file(&self) -> PathBuf {
        let primary = self.global_dir.join(GLOBAL_CONFIG_FILE);
        if primary.exists() {
            return primary;
        }

        let legacy = self.global_dir.join(LEGACY_GLOBAL_CONFIG_FILE);
        if legacy.exists() {
            debug!(path = %legacy.display(), "Using legacy global configuration file");
            return legacy;
        }

        primary
    }

    /// Open the global tier. A missing file yields an empty store.
    pub fn open_global_tier(&self) -> ConfigurationTier {
        let store = TomlFileStore::open(self.global_config_file());
        ConfigurationTier::global(Arc::new(store))
    }

    /// Path of a non-global tier file named `name` in `dir`
    pub fn tier_file(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}{}", name, TIER_FILE_SUFFIX))
    }

    /// Open a non-global tier file named `name` in `dir`
    pub fn open_tier(kind: TierKind, dir: &Path, name: &str) -> ConfigurationTier {
        let store = TomlFileStore::open(Self::tier_file(dir, name));
        ConfigurationTier::new(kind, Arc::new(store))
    }
}

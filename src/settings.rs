// Cache settings - persisted across sessions
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::SettingsError;

/// User-tunable cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of decoded thumbnails held in memory
    pub thumbnail_cache_size: usize,
    /// Preload neighbours whenever the focused entry changes
    pub preload_on_navigate: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            thumbnail_cache_size: DEFAULT_CAPACITY,
            preload_on_navigate: true,
        }
    }
}

impl CacheSettings {
    /// Get the path to the settings file
    pub fn settings_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "thumbcache", "ThumbCache") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            // Fallback to home directory
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".thumbcache-settings.json")
        }
    }

    /// Reject values the cache cannot be built with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.thumbnail_cache_size == 0 {
            return Err(SettingsError::InvalidCacheSize);
        }
        Ok(())
    }

    /// Read and validate settings from `path`
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: Self =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Settings from `path`, or defaults if the file is missing or unusable
    pub fn load_or_default_from(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                warn!(error = %err, "ignoring settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Settings from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(&Self::settings_path())
    }

    /// Validate and write settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;

        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Write settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::settings_path())
    }
}

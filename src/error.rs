// Error types for image loading and settings
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a path into a decoded image
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not resolve to a readable regular file
    #[error("image not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes are not a supported image encoding
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    /// Path the failed load was attempted for
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path, .. } | LoadError::Decode { path, .. } => path,
        }
    }
}

/// Failure to read, write or validate the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("thumbnail cache size must be at least 1")]
    InvalidCacheSize,
}

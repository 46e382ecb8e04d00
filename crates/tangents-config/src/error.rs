//! Errors raised while loading and saving presets.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationError;

/// Preset file and preset content errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The preset file could not be read.
    #[error("cannot read preset '{}': {}", path.display(), source)]
    ReadFile {
        /// File that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The preset file could not be written.
    #[error("cannot write preset '{}': {}", path.display(), source)]
    WriteFile {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The directory holding a preset file could not be created.
    #[error("cannot create preset directory '{}': {}", path.display(), source)]
    CreateDir {
        /// Directory that was created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The text is not a preset document.
    #[error("malformed preset TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The preset could not be encoded.
    #[error("cannot encode preset as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The preset parsed but holds values the filter does not accept.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    pub(crate) fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// File or directory involved, for I/O failures.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::ReadFile { path, .. }
            | ConfigError::WriteFile { path, .. }
            | ConfigError::CreateDir { path, .. } => Some(path),
            _ => None,
        }
    }
}

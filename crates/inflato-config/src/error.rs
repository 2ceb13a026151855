//! Errors raised while loading, saving and locating presets.

use std::path::PathBuf;
use thiserror::Error;

/// Preset I/O and parsing failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A preset file could not be read.
    #[error("cannot read preset {path:?}: {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A preset file could not be written.
    #[error("cannot write preset {path:?}: {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Preset text is not valid TOML or has wrongly typed fields.
    #[error("invalid preset: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be encoded as TOML.
    #[error("cannot encode preset: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No factory preset, user preset or file matches the name.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Settings fall outside the processor's ranges.
    #[error("invalid settings: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// The presets directory could not be created.
    #[error("cannot create presets directory {path:?}: {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }
}

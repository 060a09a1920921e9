//! Error types for ban list file operations.
//!
//! All errors use thiserror. Callers that only care about the broad
//! category switch on [`BanListError::kind`].

use lockdown_gvas::FormatError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad error categories reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The save file does not exist
    FileNotFound,
    /// The save file exists but cannot be opened for reading and writing
    FileNotAccessible,
    /// The ban list could not be located or rewritten
    InvalidFileFormat,
    /// Anything else
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileNotFound => "file not found",
            Self::FileNotAccessible => "file not accessible",
            Self::InvalidFileFormat => "invalid file format",
            Self::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// Ban list operation errors.
#[derive(Debug, Error)]
pub enum BanListError {
    /// Save file is missing
    #[error("File doesn't exist: {}", path.display())]
    FileNotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Save file cannot be opened for read/write
    #[error("File cannot be read/written: {}: {source}", path.display())]
    FileNotAccessible {
        /// Path that was checked
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Ban list array could not be decoded or rewritten
    #[error("Could not parse ban list: {0}")]
    InvalidFileFormat(#[from] FormatError),

    /// Identifier does not have the Steam64 shape
    #[error("Invalid Steam64 ID '{0}': expected 17 digits starting with 7656")]
    InvalidIdentifier(String),

    /// No backup exists to restore from
    #[error("No backup file found at {}", path.display())]
    BackupMissing {
        /// Expected backup location
        path: PathBuf,
    },

    /// Export document could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading or writing the save
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BanListError {
    /// Broad category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::FileNotAccessible { .. } => ErrorKind::FileNotAccessible,
            Self::InvalidFileFormat(_) => ErrorKind::InvalidFileFormat,
            Self::InvalidIdentifier(_)
            | Self::BackupMissing { .. }
            | Self::Json(_)
            | Self::Io { .. } => ErrorKind::Unknown,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Result type for ban list operations.
pub type Result<T> = std::result::Result<T, BanListError>;

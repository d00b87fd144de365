//! errors.rs - Error types for the declutter-core library.
//!
//! `DeclutterError` covers the conditions that can stop a run before the walk
//! begins: a missing or unusable target, or an unreadable explicit config.
//! Malformed patterns are not errors either; the rule compiler collects them. Per-entry failures that happen
//! during the walk are not errors at this level; they are recorded as
//! [`Failure`] values inside the traversal report and the walk carries on.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal error conditions of the `declutter-core` library.
///
/// `#[non_exhaustive]` so that new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeclutterError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Target path not found: {0}")]
    TargetPathNotFound(PathBuf),

    #[error("Target path is not a directory: {0}")]
    TargetNotDirectory(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single entry could not be processed.
///
/// Unlike [`DeclutterError`] this is cheap to clone so it can live inside the
/// report records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The rename target already exists; the original entry is left untouched.
    Conflict { target: PathBuf },
    PermissionDenied,
    /// The entry disappeared between listing and acting on it.
    Vanished,
    /// A directory expected to be empty still had children.
    NotEmpty,
    Io(String),
}

impl Failure {
    /// Maps an I/O error onto the failure taxonomy.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Failure::PermissionDenied,
            io::ErrorKind::NotFound => Failure::Vanished,
            io::ErrorKind::DirectoryNotEmpty => Failure::NotEmpty,
            _ => Failure::Io(err.to_string()),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Failure::Conflict { .. })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Failure::Conflict { target } => {
                write!(f, "conflict: '{}' already exists", target.display())
            }
            Failure::PermissionDenied => write!(f, "permission denied"),
            Failure::Vanished => write!(f, "entry vanished"),
            Failure::NotEmpty => write!(f, "directory not empty"),
            Failure::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

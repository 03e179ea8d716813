//! Storage error handling

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing local storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read the storage file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the storage file or create its directory
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Storage file exists but is not a JSON object of strings
    #[error(
        "Invalid storage format in '{path}': {details}. Remove the file to start with a fresh session and theme."
    )]
    InvalidFormat { path: PathBuf, details: String },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serializing the storage map failed
    #[error("Failed to serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Wrap a write-side I/O failure with the path it happened on
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::WriteError {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

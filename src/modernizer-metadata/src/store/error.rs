//! Metadata store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the metadata store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write a file.
    #[error("Failed to access '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize a JSON document.
    #[error("Invalid JSON in '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to walk the directory tree.
    #[error("Failed to walk metadata store: {0}")]
    WalkError(#[from] walkdir::Error),

    /// The store root does not exist.
    #[error("Metadata root does not exist: {path}")]
    MissingRoot { path: String },
}

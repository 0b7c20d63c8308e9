//! Extraction and store error types

use thiserror::Error;

/// Errors from the relation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid document title: {0:?}")]
    InvalidTitle(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from extracting relations out of a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document {0:?} has no text to extract from")]
    EmptyDocument(String),

    /// `part` is one-based.
    #[error("Model request for part {part}/{total} failed: {message}")]
    Completion {
        part: usize,
        total: usize,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

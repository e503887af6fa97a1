//! Store error types

use curator_domain::{DomainError, Split};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file held malformed JSON
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// An entry of a data file is not an `{Input, Result}` record
    #[error("Entry {index} of {path} is not a valid record: {reason}")]
    InvalidEntry {
        /// Data file
        path: PathBuf,
        /// Zero-based position in the file
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Project already exists
    #[error("Project '{0}' already exists")]
    ProjectExists(String),

    /// Project not found
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    /// Name unusable as a directory or file name
    #[error("Invalid name '{0}': must be non-empty and contain no path separators")]
    InvalidName(String),

    /// No record with this id in the split
    #[error("No record with id {id} in {split}")]
    RecordNotFound {
        /// Split searched
        split: Split,
        /// Requested id
        id: i64,
    },

    /// Another record of the split already uses this id
    #[error("Id {id} is already used by another record in {split}")]
    DuplicateId {
        /// Split involved
        split: Split,
        /// Conflicting id
        id: i64,
    },

    /// Assigning the next id would pass `i64::MAX`
    #[error("No ids left in {split}: the largest id is already at the integer limit")]
    IdOverflow {
        /// Split involved
        split: Split,
    },

    /// A change would leave the record without an integer id, or touch a
    /// field outside `Input`/`Result`
    #[error("Invalid change: {0}")]
    InvalidChange(String),

    /// System prompt not found
    #[error("System prompt '{0}' not found")]
    PromptNotFound(String),

    /// Domain rule violated
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io { path, source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Json { path, source }
    }
}

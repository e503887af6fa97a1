//! Domain error types

use thiserror::Error;

/// Errors raised by pure domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A dotted path was empty or contained an empty segment
    #[error("Invalid field path '{0}'")]
    InvalidPath(String),

    /// A path walk reached a value that cannot hold child fields
    #[error("Cannot descend into '{segment}' of '{path}': not an object")]
    NotAnObject {
        /// Full path being applied
        path: String,
        /// Segment whose current value is not an object
        segment: String,
    },

    /// A change assignment was not of the form `path=value`
    #[error("Invalid assignment '{0}', expected PATH=VALUE")]
    InvalidAssignment(String),

    /// A value does not have the `{Input: object, Result: object}` shape
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Unknown split name
    #[error("Unknown split '{0}', expected 'train' or 'val'")]
    UnknownSplit(String),
}

//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error(transparent)]
    Store(#[from] curator_store::StoreError),

    /// Filter construction error
    #[error(transparent)]
    Filter(#[from] curator_filter::FilterError),

    /// Extraction or generation error
    #[error(transparent)]
    Extractor(#[from] curator_extractor::ExtractorError),

    /// Model provider error
    #[error("LLM error: {0}")]
    Llm(#[from] curator_llm::LlmError),

    /// Domain rule violated
    #[error(transparent)]
    Domain(#[from] curator_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Interactive prompt error
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

//! Error types for the Extractor

use thiserror::Error;

/// Longest prefix of offending text carried by [`ExtractorError::Extraction`]
pub const SNIPPET_LIMIT: usize = 500;

/// Errors that can occur during extraction and generation
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Every JSON recovery strategy failed on this text
    #[error("Could not extract valid JSON from model output: {snippet}...")]
    Extraction {
        /// At most [`SNIPPET_LIMIT`] characters of the text
        snippet: String,
    },

    /// The single model call behind a one-shot generation failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// Extracted JSON did not have the shape a record needs
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Build an [`ExtractorError::Extraction`] from the full offending text
    pub fn extraction(text: &str) -> Self {
        ExtractorError::Extraction {
            snippet: text.chars().take(SNIPPET_LIMIT).collect(),
        }
    }
}

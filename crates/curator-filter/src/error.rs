//! Filter error types

use thiserror::Error;

/// Errors raised while building a filter or pipeline
///
/// Running a built filter never fails: model errors inside a semantic pass
/// exclude the affected record instead.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The regular expression does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as given
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// A semantic step was configured but no model provider was supplied
    #[error("Step {step} needs a language model but none is configured")]
    ProviderUnavailable {
        /// One-based position of the step in the pipeline
        step: usize,
    },
}

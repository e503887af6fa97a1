//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (curator-llm). A call is
/// synchronous and single-shot: no retries happen behind it, and a failure
/// means "this prompt got no answer".
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send `prompt` to `model` and return the raw completion text
    fn generate(&self, prompt: &str, model: &str) -> Result<String, Self::Error>;
}

impl<T: LlmProvider + ?Sized> LlmProvider for &T {
    type Error = T::Error;

    fn generate(&self, prompt: &str, model: &str) -> Result<String, Self::Error> {
        (**self).generate(prompt, model)
    }
}

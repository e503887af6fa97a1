//! Curator LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `curator-domain`.
//!
//! # Architecture
//!
//! The core only ever needs "send a prompt to a model, get raw text back".
//! Every call is synchronous and single-shot: one request, one timeout, no
//! retry. Callers that loop over many records treat a failed call as "skip
//! this item" rather than retrying.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `DashScopeProvider`: DashScope text-generation HTTP API
//!
//! # Examples
//!
//! ```
//! use curator_llm::MockProvider;
//! use curator_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("true");
//! let result = provider.generate("is this about music?", "qwen-turbo").unwrap();
//! assert_eq!(result, "true");
//! ```

#![warn(missing_docs)]

pub mod dashscope;

use curator_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use dashscope::{DashScopeOptions, DashScopeProvider};

/// Errors that can occur during LLM operations
///
/// Any of these means the single call produced no usable text.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The model answered with no text
    #[error("Empty response from model")]
    EmptyResponse,

    /// The response envelope did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// A prompt received by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Model the caller asked for
    pub model: String,
    /// Prompt text
    pub prompt: String,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Lookup order is: exact prompt, then the first substring rule whose
/// needle occurs in the prompt, then the default response.
///
/// # Examples
///
/// ```
/// use curator_llm::MockProvider;
/// use curator_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt", "m").unwrap(), "Fixed response");
///
/// // Responses keyed on prompt content
/// let mut provider = MockProvider::new("false");
/// provider.respond_when_contains("\"id\": 2", "true");
/// assert_eq!(provider.generate("... \"id\": 2 ...", "m").unwrap(), "true");
/// assert_eq!(provider.generate("... \"id\": 3 ...", "m").unwrap(), "false");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    fail_all: bool,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            fail_all: false,
            responses: Arc::new(Mutex::new(HashMap::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider whose every call fails
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Error);
    }

    /// Respond with `response` to any prompt containing `needle`
    pub fn respond_when_contains(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail any prompt containing `needle`
    pub fn fail_when_contains(&mut self, needle: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        lock(&self.calls).clear();
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        if self.fail_all {
            return MockReply::Error;
        }
        if let Some(reply) = lock(&self.responses).get(prompt) {
            return reply.clone();
        }
        lock(&self.rules)
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, model: &str) -> Result<String, Self::Error> {
        lock(&self.calls).push(MockCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });

        match self.reply_for(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}

//! DashScope Provider Implementation
//!
//! Calls the DashScope text-generation HTTP API with a prompt and returns the
//! generated text.
//!
//! # Features
//!
//! - Blocking HTTP communication, one request per call
//! - Configurable endpoint, timeout and sampling parameters
//! - No retries: a failed call is reported once and the caller decides
//!
//! # Examples
//!
//! ```no_run
//! use curator_llm::{DashScopeOptions, DashScopeProvider};
//! use curator_domain::traits::LlmProvider;
//!
//! let provider = DashScopeProvider::from_env("DASHSCOPE_API_KEY", DashScopeOptions::default())?;
//! let text = provider.generate("Say hello", "qwen-turbo")?;
//! # Ok::<(), curator_llm::LlmError>(())
//! ```

use crate::LlmError;
use curator_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default DashScope text-generation endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

/// Environment variable holding the API key by default
pub const DEFAULT_API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Default timeout for one request (20 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Tunables for [`DashScopeProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct DashScopeOptions {
    /// API endpoint URL
    pub endpoint: String,
    /// Timeout for a single request
    pub timeout: Duration,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for DashScopeOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// DashScope API provider
pub struct DashScopeProvider {
    api_key: String,
    options: DashScopeOptions,
    client: reqwest::blocking::Client,
}

/// Request body for the generation API
#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationInput<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_tokens: u32,
    temperature: f32,
}

/// Response envelope from the generation API
#[derive(Deserialize)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
}

#[derive(Deserialize)]
struct GenerationOutput {
    text: Option<String>,
}

impl DashScopeProvider {
    /// Create a new provider with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredentials`] for a blank key and
    /// [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, options: DashScopeOptions) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredentials("API key is empty".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            options,
            client,
        })
    }

    /// Create a provider reading the API key from an environment variable
    pub fn from_env(var: &str, options: DashScopeOptions) -> Result<Self, LlmError> {
        let api_key = std::env::var(var).map_err(|_| {
            LlmError::MissingCredentials(format!("environment variable {} is not set", var))
        })?;
        Self::new(api_key, options)
    }

    /// Options this provider was built with
    pub fn options(&self) -> &DashScopeOptions {
        &self.options
    }

    fn request_body<'a>(&self, prompt: &'a str, model: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            model,
            input: GenerationInput { prompt },
            parameters: GenerationParameters {
                max_tokens: self.options.max_tokens,
                temperature: self.options.temperature,
            },
        }
    }
}

/// Pull the generated text out of a response body
fn parse_envelope(body: &str) -> Result<String, LlmError> {
    let response: GenerationResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text = response
        .output
        .and_then(|output| output.text)
        .ok_or_else(|| LlmError::InvalidResponse("missing output.text".to_string()))?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

impl LlmProviderTrait for DashScopeProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, model: &str) -> Result<String, Self::Error> {
        let started = Instant::now();
        debug!(model, prompt_len = prompt.len(), "Calling model");

        let response = self
            .client
            .post(&self.options.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, model))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(model.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }

        let body = response
            .text()
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, body)));
        }

        let text = parse_envelope(&body)?;
        info!(
            model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model call complete"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = DashScopeProvider::new("sk-test", DashScopeOptions::default()).unwrap();
        assert_eq!(provider.options().endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.options().timeout, Duration::from_secs(20));
        assert_eq!(provider.options().max_tokens, 2048);
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let result = DashScopeProvider::new("  ", DashScopeOptions::default());
        assert!(matches!(result, Err(LlmError::MissingCredentials(_))));
    }

    #[test]
    fn test_missing_env_var() {
        let result = DashScopeProvider::from_env(
            "CURATOR_TEST_DEFINITELY_UNSET_KEY",
            DashScopeOptions::default(),
        );
        assert!(matches!(result, Err(LlmError::MissingCredentials(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = DashScopeProvider::new("sk-test", DashScopeOptions::default()).unwrap();
        let body = serde_json::to_value(provider.request_body("hi", "qwen-max")).unwrap();
        assert_eq!(body["model"], "qwen-max");
        assert_eq!(body["input"]["prompt"], "hi");
        assert_eq!(body["parameters"]["max_tokens"], 2048);
    }

    #[test]
    fn test_parse_envelope() {
        let body = r#"{"output": {"text": "true", "finish_reason": "stop"}, "request_id": "r"}"#;
        assert_eq!(parse_envelope(body).unwrap(), "true");
    }

    #[test]
    fn test_parse_envelope_failures() {
        assert!(matches!(
            parse_envelope(r#"{"code": "InvalidParameter"}"#),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_envelope(r#"{"output": {"text": "   "}}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(parse_envelope("<html>"), Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_unreachable_endpoint_fails_once() {
        // Nothing listens on the discard port; the call must fail, not hang or retry
        let options = DashScopeOptions {
            endpoint: "http://127.0.0.1:9/generation".to_string(),
            timeout: Duration::from_secs(2),
            ..DashScopeOptions::default()
        };
        let provider = DashScopeProvider::new("sk-test", options).unwrap();
        let result = provider.generate("test", "qwen-turbo");
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout)
        ));
    }
}

//! Configuration for the Generator

use serde::{Deserialize, Serialize};

/// Configuration for the [`Generator`](crate::Generator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model used when a call does not name one
    pub default_model: String,

    /// Input key that receives the user text in forward/backward generation
    pub query_field: String,

    /// Number of generation rounds in a batch
    pub rounds: usize,

    /// Entries requested per round by a self-instruct prompt
    pub pairs_per_prompt: usize,

    /// Characters of raw model output included in debug logs
    pub preview_chars: usize,
}

impl GeneratorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_model.trim().is_empty() {
            return Err("default_model must not be empty".to_string());
        }
        if self.query_field.trim().is_empty() {
            return Err("query_field must not be empty".to_string());
        }
        if self.rounds == 0 {
            return Err("rounds must be greater than 0".to_string());
        }
        if self.pairs_per_prompt == 0 {
            return Err("pairs_per_prompt must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_model: "qwen-max".to_string(),
            query_field: "query".to_string(),
            rounds: 1,
            pairs_per_prompt: 5,
            preview_chars: 200,
        }
    }
}

impl GeneratorConfig {
    /// Fast preset: cheaper model, single round
    pub fn fast() -> Self {
        Self {
            default_model: "qwen-turbo".to_string(),
            rounds: 1,
            pairs_per_prompt: 3,
            ..Self::default()
        }
    }

    /// Thorough preset: strongest model, several rounds
    pub fn thorough() -> Self {
        Self {
            default_model: "qwen-max".to_string(),
            rounds: 5,
            pairs_per_prompt: 5,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use curator_extractor::GeneratorConfig;
use curator_llm::dashscope::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use curator_llm::{DashScopeOptions, DashScopeProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding all projects
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Record generation settings
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Text-generation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used when a command does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Seconds before a single request is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Record generation settings.
///
/// A `[generator]` table picks a preset and may override any
/// [`GeneratorConfig`] field next to it:
///
/// ```toml
/// [generator]
/// preset = "thorough"
/// query_field = "current_query"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Starting point for the fields below
    #[serde(default)]
    pub preset: GeneratorPreset,

    /// Explicitly set generator fields
    #[serde(flatten)]
    pub overrides: toml::Table,
}

/// Generator presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorPreset {
    /// Library defaults with the model from `[llm]`
    #[default]
    Standard,
    /// Cheaper model, fewer entries per call
    Fast,
    /// Strongest model, several rounds
    Thorough,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator").join("config.toml"))
    }

    /// Load configuration from `path`, or the default path.
    ///
    /// A missing file at the default path gives the defaults; an explicitly
    /// named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl GeneratorSettings {
    /// Resolve the preset and overrides into a validated configuration.
    ///
    /// `default_model` is the `[llm]` model, used by the standard preset.
    pub fn resolve(&self, default_model: &str) -> Result<GeneratorConfig> {
        let mut config = match self.preset {
            GeneratorPreset::Standard => GeneratorConfig {
                default_model: default_model.to_string(),
                ..GeneratorConfig::default()
            },
            GeneratorPreset::Fast => GeneratorConfig::fast(),
            GeneratorPreset::Thorough => GeneratorConfig::thorough(),
        };

        if !self.overrides.is_empty() {
            let mut table: toml::Table = toml::from_str(&config.to_toml().map_err(CliError::Config)?)?;
            for (key, value) in &self.overrides {
                table.insert(key.clone(), value.clone());
            }
            config = GeneratorConfig::from_toml(&table.to_string())
                .map_err(|e| CliError::Config(format!("[generator]: {}", e)))?;
        }

        config
            .validate()
            .map_err(|e| CliError::Config(format!("[generator]: {}", e)))?;
        Ok(config)
    }
}

impl LlmSettings {
    /// Request options for the DashScope client.
    pub fn options(&self) -> DashScopeOptions {
        DashScopeOptions {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Build a provider, reading the API key from the environment.
    pub fn provider(&self) -> Result<DashScopeProvider> {
        Ok(DashScopeProvider::from_env(&self.api_key_env, self.options())?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            llm: LlmSettings::default(),
            generator: GeneratorSettings::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            default_model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_model() -> String {
    "qwen-max".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

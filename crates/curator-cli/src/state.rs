//! Application state handed to every command.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_extractor::GeneratorConfig;
use curator_llm::DashScopeProvider;
use curator_store::{Project, ProjectStore};

/// Loaded configuration plus the output formatter.
///
/// Commands name their project explicitly; nothing here remembers a
/// "current" project between invocations.
pub struct AppState {
    /// Effective configuration
    pub config: Config,
    /// Output formatter
    pub formatter: Formatter,
}

impl AppState {
    /// Create the state.
    pub fn new(config: Config, formatter: Formatter) -> Self {
        Self { config, formatter }
    }

    /// Project store under the configured root.
    pub fn store(&self) -> ProjectStore {
        ProjectStore::new(&self.config.projects_root)
    }

    /// Open a project by name.
    pub fn open(&self, name: &str) -> Result<Project> {
        Ok(self.store().open(name)?)
    }

    /// Build the model provider; only commands that call a model do this.
    pub fn provider(&self) -> Result<DashScopeProvider> {
        self.config.llm.provider()
    }

    /// Generator configuration from the `[generator]` table.
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        self.config.generator.resolve(&self.config.llm.default_model)
    }

    /// Model named on the command line, or the configured default.
    pub fn model<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.unwrap_or(&self.config.llm.default_model)
    }
}

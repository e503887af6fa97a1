//! Project directories and their files
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<project>/
//!     config.json
//!     train_data.json
//!     val_data.json
//!     system_prompts/<name>.txt
//! ```

use crate::dataset::Dataset;
use crate::error::StoreError;
use crate::fs::{check_name, read_json, write_json};
use crate::prompts::PromptLibrary;
use curator_domain::{FieldCandidates, Record, Split, INPUT_KEY, RESULT_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the per-project configuration file
pub const CONFIG_FILE: &str = "config.json";

/// Name of the per-project prompt directory
pub const PROMPTS_DIR: &str = "system_prompts";

/// Per-project settings stored in `config.json`
///
/// Keys this type does not know are kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Advisory JSON Schema of the `Input` half
    #[serde(default = "empty_object")]
    pub input_schema: Value,

    /// Advisory JSON Schema of the `Result` half
    #[serde(default = "empty_object")]
    pub result_schema: Value,

    /// Project-specific lookup keys; defaults apply when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_candidates: Option<FieldCandidates>,

    /// Anything else found in the file
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            input_schema: empty_object(),
            result_schema: empty_object(),
            field_candidates: None,
            extra: Map::new(),
        }
    }
}

impl ProjectConfig {
    /// Config with the given schemas
    pub fn new(input_schema: Value, result_schema: Value) -> Self {
        Self {
            input_schema,
            result_schema,
            ..Self::default()
        }
    }

    /// Lookup keys for this project
    pub fn candidates(&self) -> FieldCandidates {
        self.field_candidates.clone().unwrap_or_default()
    }
}

/// Directory holding all projects
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Store rooted at `root`; nothing is touched until a write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        check_name(name)?;
        Ok(self.root.join(name))
    }

    /// Whether a project of this name exists
    pub fn exists(&self, name: &str) -> bool {
        self.dir_of(name)
            .map(|dir| dir.join(CONFIG_FILE).is_file())
            .unwrap_or(false)
    }

    /// Create a project with empty collections
    ///
    /// # Errors
    ///
    /// [`StoreError::ProjectExists`] if the directory is already there, even
    /// without a config file.
    pub fn create(&self, name: &str, config: ProjectConfig) -> Result<Project, StoreError> {
        let dir = self.dir_of(name)?;
        if dir.exists() {
            return Err(StoreError::ProjectExists(name.to_string()));
        }

        let prompts = dir.join(PROMPTS_DIR);
        std::fs::create_dir_all(&prompts).map_err(StoreError::io(&prompts))?;

        let project = Project {
            name: name.to_string(),
            dir,
            config,
            data: Dataset::default(),
        };
        project.save_config()?;
        project.save_data()?;
        info!(name, root = %self.root.display(), "Project created");
        Ok(project)
    }

    /// Sorted names of directories that hold a `config.json`
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io { path: self.root.clone(), source: e }),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(StoreError::io(&self.root))?.path();
            if path.is_dir() && path.join(CONFIG_FILE).is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load a project with its data
    pub fn open(&self, name: &str) -> Result<Project, StoreError> {
        let dir = self.dir_of(name)?;
        if !dir.join(CONFIG_FILE).is_file() {
            return Err(StoreError::ProjectNotFound(name.to_string()));
        }
        let mut project = Project {
            name: name.to_string(),
            dir,
            config: ProjectConfig::default(),
            data: Dataset::default(),
        };
        project.reload()?;
        Ok(project)
    }

    /// Remove a project directory and everything in it
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let dir = self.dir_of(name)?;
        if !dir.is_dir() {
            return Err(StoreError::ProjectNotFound(name.to_string()));
        }
        std::fs::remove_dir_all(&dir).map_err(StoreError::io(&dir))?;
        info!(name, "Project deleted");
        Ok(())
    }
}

/// An open project
///
/// Changes to [`Project::data_mut`] and [`Project::config`] live in memory
/// until [`Project::save_data`] or [`Project::save_config`] is called.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    dir: PathBuf,
    /// Settings from `config.json`
    pub config: ProjectConfig,
    data: Dataset,
}

impl Project {
    /// Project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Both record collections
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Both record collections, for edits
    pub fn data_mut(&mut self) -> &mut Dataset {
        &mut self.data
    }

    /// Write `config.json`
    pub fn save_config(&self) -> Result<(), StoreError> {
        write_json(&self.dir.join(CONFIG_FILE), &self.config)
    }

    /// Write both data files
    pub fn save_data(&self) -> Result<(), StoreError> {
        for split in Split::ALL {
            let records = self.data.records(split);
            write_json(&self.dir.join(split.file_name()), records)?;
            debug!(project = %self.name, %split, count = records.len(), "Saved records");
        }
        Ok(())
    }

    /// Re-read configuration and data from disk, discarding unsaved edits
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.config = read_json(&self.dir.join(CONFIG_FILE))?;
        let train = load_records(&self.dir.join(Split::Train.file_name()))?;
        let validation = load_records(&self.dir.join(Split::Validation.file_name()))?;
        info!(
            project = %self.name,
            train = train.len(),
            validation = validation.len(),
            "Loaded project"
        );
        self.data = Dataset::new(train, validation);
        Ok(())
    }

    /// The project's system prompts
    pub fn prompts(&self) -> PromptLibrary {
        PromptLibrary::new(self.dir.join(PROMPTS_DIR))
    }
}

/// Read a data file; a missing file is an empty collection
///
/// Only `Input` and `Result` are kept from each entry. Other top-level keys
/// are logged at `warn` and are gone after the next save.
fn load_records(path: &Path) -> Result<Vec<Record>, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "No data file, starting empty");
        return Ok(Vec::new());
    }
    let values: Vec<Value> = read_json(path)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let dropped = extra_keys(&value);
            if !dropped.is_empty() {
                warn!(
                    path = %path.display(),
                    index,
                    keys = ?dropped,
                    "Ignoring top-level keys other than Input and Result"
                );
            }
            Record::try_from_value(value).map_err(|e| StoreError::InvalidEntry {
                path: path.to_path_buf(),
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn extra_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|obj| {
            obj.keys()
                .filter(|k| k.as_str() != INPUT_KEY && k.as_str() != RESULT_KEY)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_keys() {
        let value = json!({"Input": {}, "meta": 1, "Result": {}, "source": "web"});
        assert_eq!(extra_keys(&value), vec!["meta", "source"]);
        assert!(extra_keys(&json!({"Input": {}, "Result": {}})).is_empty());
        assert!(extra_keys(&json!([1])).is_empty());
    }

    #[test]
    fn test_config_keeps_unknown_keys() {
        let raw = json!({
            "input_schema": {"type": "object"},
            "created_at": "{\"timestamp\": \"auto\"}"
        });
        let config: ProjectConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.result_schema, json!({}));
        assert!(config.field_candidates.is_none());
        assert_eq!(config.candidates(), FieldCandidates::default());

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["created_at"], "{\"timestamp\": \"auto\"}");
        assert!(back.get("field_candidates").is_none());
    }

    #[test]
    fn test_config_custom_candidates() {
        let config: ProjectConfig = serde_json::from_value(json!({
            "field_candidates": {"input_text": ["utterance"]}
        }))
        .unwrap();
        let candidates = config.candidates();
        assert_eq!(candidates.input_text, vec!["utterance"]);
        assert_eq!(candidates.history_field, "history");
    }
}

//! Curator Storage Layer
//!
//! Keeps projects as plain directories of JSON files so they stay readable
//! and diffable outside the tool.
//!
//! # Architecture
//!
//! - [`ProjectStore`] owns a root directory with one subdirectory per project
//! - [`Project`] holds the loaded [`ProjectConfig`] and [`Dataset`]
//! - [`Dataset`] does id assignment and dotted-path edits in memory
//! - [`PromptLibrary`] manages the project's named system prompts
//!
//! Every file write goes through a same-directory temp file and a rename,
//! so an interrupted save leaves the previous file intact.
//!
//! # Examples
//!
//! ```no_run
//! use curator_domain::{Record, Split};
//! use curator_store::{ProjectConfig, ProjectStore};
//! use serde_json::json;
//!
//! let store = ProjectStore::new("data");
//! let mut project = store.create("intents", ProjectConfig::default()).unwrap();
//!
//! let record = Record::from_value(&json!({"Input": {"query": "hi"}, "Result": {}})).unwrap();
//! let ids = project.data_mut().append(Split::Train, vec![record]).unwrap();
//! assert_eq!(ids, vec![1]);
//! project.save_data().unwrap();
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
mod fs;
pub mod project;
pub mod prompts;

pub use dataset::{Dataset, DatasetStats};
pub use error::StoreError;
pub use project::{Project, ProjectConfig, ProjectStore, CONFIG_FILE, PROMPTS_DIR};
pub use prompts::PromptLibrary;

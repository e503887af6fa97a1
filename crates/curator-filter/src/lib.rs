//! Curator Filter
//!
//! Narrows a collection of records with tag, regex and model-judged filters,
//! alone or chained into a [`FilterPipeline`].
//!
//! Every strategy returns an order-preserving sub-sequence of its input and
//! never modifies it. Missing parameters (no tags, empty pattern, empty
//! query) make a filter the identity rather than an error.
//!
//! # Examples
//!
//! ```
//! use curator_domain::{FieldCandidates, Record};
//! use curator_filter::TagFilter;
//! use serde_json::json;
//!
//! let records = vec![
//!     Record::from_value(&json!({"Input": {"query": "Variety music show"}, "Result": {"id": 1}})).unwrap(),
//!     Record::from_value(&json!({"Input": {"query": "news"}, "Result": {"id": 2}})).unwrap(),
//! ];
//! let kept = TagFilter::new(["variety", "music"]).apply(&records, &FieldCandidates::default());
//! assert_eq!(kept.len(), 1);
//! ```

#![warn(missing_docs)]

mod error;
mod pattern;
mod pipeline;
mod semantic;
mod tags;

pub use error::FilterError;
pub use pattern::{searchable_json, RegexFilter};
pub use pipeline::{FilterPipeline, Progress};
pub use semantic::{is_affirmative, relevance_prompt, SemanticFilter};
pub use tags::TagFilter;

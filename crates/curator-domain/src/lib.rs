//! Curator Domain Layer
//!
//! This crate contains the core data model for Curator, a tool for managing
//! annotated `{Input, Result}` datasets used to train or evaluate an agent.
//! It defines the value objects and trait interfaces that every other crate
//! depends upon, and carries no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Record**: one `{Input, Result}` example; identity is `Result.id`
//! - **Split**: the train or validation collection a record lives in
//! - **FieldPath**: a typed dotted path used to mutate nested record fields
//! - **FieldCandidates**: per-project tables of "which key holds the query text"
//! - **FilterStep**: one configured tag, regex or semantic filter
//!
//! ## Architecture
//!
//! - Pure data and logic only
//! - Infrastructure implementations (LLM, storage) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fields;
pub mod filter;
pub mod path;
pub mod record;
pub mod split;
pub mod traits;

// Re-exports for convenience
pub use error::DomainError;
pub use fields::FieldCandidates;
pub use filter::{parse_tag_list, FilterStep, DEFAULT_SEMANTIC_MODEL};
pub use path::{Changes, FieldPath};
pub use record::{Record, ID_KEY, INPUT_KEY, RESULT_KEY};
pub use split::Split;

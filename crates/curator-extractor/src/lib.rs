//! Curator Extractor
//!
//! Recovers structured data from free-form language model output and drives
//! LLM-assisted record generation.
//!
//! # Overview
//!
//! Model output is unreliable: prose around the JSON, markdown fences,
//! truncated or reordered fields. This crate turns such text into JSON values
//! and `{Input, Result}` records with a chain of progressively more lenient
//! strategies, so a clean answer is never passed over for a guess.
//!
//! # Architecture
//!
//! ```text
//! Prompt → LLM → raw text → extract_json / extract_pairs → Records → review → Store
//! ```
//!
//! # Key Features
//!
//! - **JSON recovery**: direct parse, fenced blocks, balanced-brace scan, line scan
//! - **Pair recovery**: whole value, array literals, object literals, positional pairing
//! - **Never fatal**: pair extraction yields an empty list instead of an error
//! - **Generation**: self-instruct, forward and backward modes over any `LlmProvider`
//!
//! # Example Usage
//!
//! ```
//! use curator_extractor::{Generator, GeneratorConfig};
//! use curator_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"[{"Input": {"query": "hi"}, "Result": {"intent": "greet"}}]"#);
//! let generator = Generator::new(llm, GeneratorConfig::default());
//!
//! let generation = generator.generate_pairs("You write chat examples.", None).unwrap();
//! assert_eq!(generation.records.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod json;
mod pairs;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::GeneratorConfig;
pub use error::{ExtractorError, SNIPPET_LIMIT};
pub use generator::{Generation, Generator};
pub use json::{extract_json, extract_json_with_strategy, JsonStrategy};
pub use pairs::{extract_pairs, extract_pairs_with_strategy, PairExtraction, PairStrategy};
pub use prompt::PromptBuilder;

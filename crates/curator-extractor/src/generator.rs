//! LLM-assisted record generation

use crate::config::GeneratorConfig;
use crate::error::ExtractorError;
use crate::json::extract_json;
use crate::pairs::{extract_pairs_with_strategy, PairStrategy};
use crate::prompt::PromptBuilder;
use curator_domain::traits::LlmProvider;
use curator_domain::Record;
use serde_json::{Map, Value};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Result of one self-instruct generation call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Raw model output
    pub raw: String,
    /// Pairs recovered from the output, possibly none
    pub records: Vec<Record>,
    /// Stage of the pair extractor that found them
    pub strategy: Option<PairStrategy>,
}

/// Generates candidate records with a language model
///
/// Every call is one model request. A failed request is an error for the
/// one-shot operations; [`Generator::generate_batch`] logs it and moves on.
pub struct Generator<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: GeneratorConfig,
}

impl<L> Generator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Generator
    pub fn new(llm_provider: L, config: GeneratorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn model<'a>(&'a self, model: Option<&'a str>) -> &'a str {
        model.unwrap_or(&self.config.default_model)
    }

    fn call(&self, prompt: &str, model: &str) -> Result<String, ExtractorError> {
        debug!(model, prompt_len = prompt.len(), "Requesting generation");
        let raw = self
            .llm_provider
            .generate(prompt, model)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        let preview: String = raw.chars().take(self.config.preview_chars).collect();
        debug!(len = raw.len(), %preview, "Model output received");
        Ok(raw.trim().to_string())
    }

    /// Ask the model for new pairs and recover them from its output
    ///
    /// # Errors
    ///
    /// Only a failed model call is an error. Output with no recoverable
    /// pairs gives a [`Generation`] with an empty `records` list.
    pub fn generate_pairs(
        &self,
        system_prompt: &str,
        model: Option<&str>,
    ) -> Result<Generation, ExtractorError> {
        let prompt = PromptBuilder::new(system_prompt).pairs();
        let raw = self.call(&prompt, self.model(model))?;
        let extraction = extract_pairs_with_strategy(&raw);
        if extraction.records.is_empty() {
            warn!("Model output contained no record pairs");
        }
        Ok(Generation {
            raw,
            records: extraction.records,
            strategy: extraction.strategy,
        })
    }

    /// Generate the Result for a given user input
    pub fn forward(
        &self,
        system_prompt: &str,
        user_input: &str,
        model: Option<&str>,
    ) -> Result<Record, ExtractorError> {
        let prompt = PromptBuilder::new(system_prompt).forward(user_input);
        let raw = self.call(&prompt, self.model(model))?;
        let result = result_object(extract_json(&raw)?)?;
        Ok(Record::new(self.input_for(user_input), result))
    }

    /// Generate a Result from an expected output, inferring the user input
    ///
    /// The input text is read from the Result's `user_input` field, then
    /// `query`. A reply that is already a full `{Input, Result}` pair is
    /// kept as is.
    pub fn backward(
        &self,
        system_prompt: &str,
        expected_output: &str,
        model: Option<&str>,
    ) -> Result<Record, ExtractorError> {
        let prompt = PromptBuilder::new(system_prompt).backward(expected_output);
        let raw = self.call(&prompt, self.model(model))?;
        let value = extract_json(&raw)?;
        if let Some(record) = Record::from_value(&value) {
            return Ok(record);
        }

        let result = result_object(value)?;
        let user_input = ["user_input", "query"]
            .iter()
            .find_map(|key| result.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        Ok(Record::new(self.input_for(&user_input), result))
    }

    /// Run several generation rounds, keeping every pair recovered
    ///
    /// A round whose model call fails is skipped.
    pub fn generate_batch(
        &self,
        system_prompt: &str,
        rounds: usize,
        model: Option<&str>,
    ) -> Vec<Record> {
        let mut records = Vec::new();
        for round in 1..=rounds {
            match self.generate_pairs(system_prompt, model) {
                Ok(generation) => {
                    debug!(round, count = generation.records.len(), "Round complete");
                    records.extend(generation.records);
                }
                Err(e) => warn!(round, error = %e, "Generation round failed, skipping"),
            }
        }
        info!(rounds, count = records.len(), "Batch generation complete");
        records
    }

    fn input_for(&self, user_input: &str) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert("history".into(), Value::Array(Vec::new()));
        input.insert(self.config.query_field.clone(), Value::from(user_input));
        input
    }
}

fn result_object(value: Value) -> Result<Map<String, Value>, ExtractorError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractorError::InvalidFormat(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Prompt construction for record generation

use serde_json::{Map, Value};

/// Builds generation prompts around a project's system prompt
pub struct PromptBuilder {
    system_prompt: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// Ask the model to invent inputs and results on its own
    pub fn pairs(&self) -> String {
        format!("{}\n\n{}", self.system_prompt, PAIRS_REQUEST)
    }

    /// Ask the model for the Result that answers `user_input`
    pub fn forward(&self, user_input: &str) -> String {
        format!(
            "{}\n\nUser input: {}\n\n{}",
            self.system_prompt, user_input, FORWARD_REQUEST
        )
    }

    /// Ask the model for a Result, including the `user_input` that would
    /// have produced `expected_output`
    pub fn backward(&self, expected_output: &str) -> String {
        format!(
            "{}\n\nExpected output: {}\n\n{}",
            self.system_prompt, expected_output, BACKWARD_REQUEST
        )
    }

    /// Build a self-instruct system prompt from advisory JSON Schemas
    ///
    /// Only `properties` with their `type` and `description` are read; the
    /// schemas shape the prompt and are never enforced.
    pub fn self_instruct(input_schema: &Value, result_schema: &Value, count: usize) -> String {
        let mut prompt = String::new();

        prompt.push_str(SELF_INSTRUCT_INTRO);
        prompt.push_str("\n\n## Input format\n");
        prompt.push_str("The Input part should contain these fields:\n");
        prompt.push_str(&field_list(input_schema));
        prompt.push_str("\n\n## Result format\n");
        prompt.push_str("The Result part should contain these fields:\n");
        prompt.push_str(&field_list(result_schema));
        prompt.push_str("\n\n");
        prompt.push_str(SELF_INSTRUCT_RULES);

        let mut pair = Map::new();
        pair.insert("Input".into(), Value::Object(example_object(input_schema)));
        pair.insert("Result".into(), Value::Object(example_object(result_schema)));
        let example = serde_json::to_string_pretty(&Value::Array(vec![Value::Object(pair)]))
            .unwrap_or_else(|_| "[]".to_string());

        prompt.push_str("\n\n## Output format\n");
        prompt.push_str("Reply with a JSON array of objects shaped like this:\n\n```json\n");
        prompt.push_str(&example);
        prompt.push_str("\n```\n\n");
        prompt.push_str(SELF_INSTRUCT_GUIDE);
        prompt.push_str(&format!("\n\nGenerate {} entries that follow the rules above.", count));

        prompt
    }
}

fn properties(schema: &Value) -> impl Iterator<Item = (&String, &Value)> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|props| props.iter())
}

fn field_type(config: &Value) -> &str {
    config.get("type").and_then(Value::as_str).unwrap_or("string")
}

fn field_list(schema: &Value) -> String {
    let lines: Vec<String> = properties(schema)
        .map(|(name, config)| {
            let description = config
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} field", name));
            format!("- {} ({}): {}", name, field_type(config), description)
        })
        .collect();

    if lines.is_empty() {
        "- Define the fields your task needs".to_string()
    } else {
        lines.join("\n")
    }
}

fn example_object(schema: &Value) -> Map<String, Value> {
    properties(schema)
        .map(|(name, config)| {
            let example = match field_type(config) {
                "array" => Value::Array(Vec::new()),
                "integer" | "number" => Value::from(1),
                "boolean" => Value::Bool(true),
                "object" => Value::Object(Map::new()),
                _ => Value::from(format!("example {}", name)),
            };
            (name.clone(), example)
        })
        .collect()
}

const PAIRS_REQUEST: &str = "Invent a user input and the matching result on your own. \
Reply with a JSON array of {\"Input\": {...}, \"Result\": {...}} objects that follow the \
existing record format.";

const FORWARD_REQUEST: &str = "Produce the Result object for this input, following the \
existing record format. Reply with the JSON object only.";

const BACKWARD_REQUEST: &str = "Infer a user input that would lead to this output. Reply \
with a single JSON object in the existing Result format, with the inferred input in a \
\"user_input\" field.";

const SELF_INSTRUCT_INTRO: &str = r#"# Data generation task

You are a data generation assistant producing high quality training data.

## Task
Generate input/output pairs used to train a language model. Every entry has an Input part
and a Result part."#;

const SELF_INSTRUCT_RULES: &str = r#"## Requirements
1. Diversity: cover different scenarios and use cases
2. Realism: match how the system is really used; avoid trivial or repeated entries
3. Consistency: the Result must follow logically from the Input
4. Completeness: every required field gets a sensible value"#;

const SELF_INSTRUCT_GUIDE: &str = r#"## Guidelines
- Derive each Result from the content of its Input
- Keep the data logically consistent and useful
- Draw on realistic scenarios but avoid sensitive information
- Respect field types and formats"#;

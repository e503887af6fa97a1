//! Candidate key tables for best-effort field lookup
//!
//! Record shapes are user-defined, so code that needs "the query text" or
//! "the response text" of a record tries an ordered list of keys instead of
//! hard-coding one. Projects with different schemas override the lists in
//! their `config.json`.

use serde::{Deserialize, Serialize};

/// Ordered candidate keys per lookup role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCandidates {
    /// Input keys searched by the tag filter, first string value wins
    #[serde(default = "default_input_text")]
    pub input_text: Vec<String>,

    /// Result keys searched by the tag filter, first string value wins
    #[serde(default = "default_result_text")]
    pub result_text: Vec<String>,

    /// Input keys used to label a record in listings
    #[serde(default = "default_display_query")]
    pub display_query: Vec<String>,

    /// Input key holding the conversation history array
    #[serde(default = "default_history_field")]
    pub history_field: String,

    /// Key of the text inside each history entry
    #[serde(default = "default_history_text")]
    pub history_text: String,
}

impl Default for FieldCandidates {
    fn default() -> Self {
        Self {
            input_text: default_input_text(),
            result_text: default_result_text(),
            display_query: default_display_query(),
            history_field: default_history_field(),
            history_text: default_history_text(),
        }
    }
}

fn strings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn default_input_text() -> Vec<String> {
    strings(&["current_query", "query", "processed_query", "user_input"])
}

fn default_result_text() -> Vec<String> {
    strings(&["intent", "response", "processed_query", "target"])
}

fn default_display_query() -> Vec<String> {
    strings(&["current_query", "query", "user_input", "processed_query"])
}

fn default_history_field() -> String {
    "history".to_string()
}

fn default_history_text() -> String {
    "content".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let candidates: FieldCandidates =
            serde_json::from_str(r#"{"input_text": ["utterance"]}"#).unwrap();
        assert_eq!(candidates.input_text, vec!["utterance".to_string()]);
        assert_eq!(candidates.result_text, default_result_text());
        assert_eq!(candidates.history_field, "history");
    }
}

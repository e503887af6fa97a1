//! Record module - the fundamental unit of a Curator dataset

use crate::{DomainError, FieldCandidates};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the input half of a record
pub const INPUT_KEY: &str = "Input";

/// Key of the result half of a record
pub const RESULT_KEY: &str = "Result";

/// Key inside `Result` that carries the record identity
pub const ID_KEY: &str = "id";

/// One annotated example: what the agent saw, and what it should produce
///
/// Both halves are free-form JSON objects shaped by the project's advisory
/// schemas. The only field with a contract is `Result.id`, an integer that is
/// unique within one collection. Conventional fields such as `query`,
/// `history` or `target` are looked up on a best-effort basis and their
/// absence is never an error.
///
/// # Examples
///
/// ```
/// use curator_domain::Record;
/// use serde_json::json;
///
/// let value = json!({"Input": {"query": "hi"}, "Result": {"id": 3}});
/// let record = Record::from_value(&value).unwrap();
/// assert_eq!(record.id(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Input half (`"Input"` on disk)
    #[serde(rename = "Input")]
    pub input: Map<String, Value>,

    /// Result half (`"Result"` on disk)
    #[serde(rename = "Result")]
    pub result: Map<String, Value>,
}

impl Record {
    /// Create a record from its two halves
    pub fn new(input: Map<String, Value>, result: Map<String, Value>) -> Self {
        Self { input, result }
    }

    /// Build a record from an arbitrary JSON value
    ///
    /// Returns `None` unless the value is an object holding both `Input` and
    /// `Result`, each of them an object. Candidates are never coerced.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let input = obj.get(INPUT_KEY)?.as_object()?;
        let result = obj.get(RESULT_KEY)?.as_object()?;
        Some(Self::new(input.clone(), result.clone()))
    }

    /// Like [`Record::from_value`], but consumes the value and explains failures
    pub fn try_from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut obj) = value else {
            return Err(DomainError::InvalidRecord("record is not an object".into()));
        };
        let input = match obj.remove(INPUT_KEY) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(DomainError::InvalidRecord("'Input' is not an object".into())),
            None => return Err(DomainError::InvalidRecord("missing 'Input'".into())),
        };
        let result = match obj.remove(RESULT_KEY) {
            Some(Value::Object(map)) => map,
            Some(_) => return Err(DomainError::InvalidRecord("'Result' is not an object".into())),
            None => return Err(DomainError::InvalidRecord("missing 'Result'".into())),
        };
        Ok(Self::new(input, result))
    }

    /// The record as a `{"Input": .., "Result": ..}` JSON value
    pub fn to_value(&self) -> Value {
        let mut obj = Map::with_capacity(2);
        obj.insert(INPUT_KEY.to_string(), Value::Object(self.input.clone()));
        obj.insert(RESULT_KEY.to_string(), Value::Object(self.result.clone()));
        Value::Object(obj)
    }

    /// Identity of the record (`Result.id`), if it is an integer
    pub fn id(&self) -> Option<i64> {
        self.result.get(ID_KEY).and_then(Value::as_i64)
    }

    /// Overwrite `Result.id`
    pub fn set_id(&mut self, id: i64) {
        self.result.insert(ID_KEY.to_string(), Value::from(id));
    }

    /// Lowercased text the tag filter searches
    ///
    /// Concatenates, separated by spaces: the first string-valued input
    /// candidate, every `content` of the input history, and the first
    /// string-valued result candidate.
    pub fn search_text(&self, candidates: &FieldCandidates) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(text) = first_string(&self.input, &candidates.input_text) {
            parts.push(text.to_string());
        }

        if let Some(Value::Array(history)) = self.input.get(&candidates.history_field) {
            for entry in history {
                let Some(content) = entry
                    .as_object()
                    .and_then(|msg| msg.get(&candidates.history_text))
                else {
                    continue;
                };
                if let Some(text) = value_text(content) {
                    parts.push(text);
                }
            }
        }

        if let Some(text) = first_string(&self.result, &candidates.result_text) {
            parts.push(text.to_string());
        }

        parts.join(" ").to_lowercase()
    }

    /// Query text used to label the record in listings
    pub fn display_query(&self, candidates: &FieldCandidates) -> Option<String> {
        candidates
            .display_query
            .iter()
            .filter_map(|key| self.input.get(key))
            .find(|value| is_truthy(value))
            .and_then(value_text)
    }

    /// Short one-line description: query, intent and a response prefix
    pub fn summary(&self, candidates: &FieldCandidates) -> String {
        let mut texts = Vec::new();
        if let Some(query) = self.display_query(candidates) {
            texts.push(query);
        }
        if let Some(intent) = self.result.get("intent").and_then(value_text) {
            texts.push(format!("intent: {}", intent));
        }
        if let Some(response) = self.result.get("response").and_then(value_text) {
            let prefix: String = response.chars().take(50).collect();
            texts.push(format!("response: {}...", prefix));
        }
        if texts.is_empty() {
            "N/A".to_string()
        } else {
            texts.join(" | ")
        }
    }
}

fn first_string<'a>(obj: &'a Map<String, Value>, keys: &[String]) -> Option<&'a str> {
    keys.iter().find_map(|key| obj.get(key).and_then(Value::as_str))
}

/// Text form of a value: strings verbatim, null as nothing, anything else as JSON
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        Record::from_value(&json!({
            "Input": {
                "history": [
                    {"role": "user", "content": "Any good variety shows lately?"},
                    {"role": "agent", "content": "Music or talk shows?"}
                ],
                "query": "Music ones, singer competitions please",
                "env": ""
            },
            "Result": {
                "id": 1,
                "target": "search",
                "processed_query": "MUST: video_type: Music"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_from_value_requires_both_halves() {
        assert!(Record::from_value(&json!({"Input": {}})).is_none());
        assert!(Record::from_value(&json!({"Result": {}})).is_none());
        assert!(Record::from_value(&json!([1, 2])).is_none());
        assert!(Record::from_value(&json!({"Input": {}, "Result": {}})).is_some());
    }

    #[test]
    fn test_from_value_does_not_coerce_non_objects() {
        assert!(Record::from_value(&json!({"Input": "text", "Result": {}})).is_none());
        let err = Record::try_from_value(json!({"Input": {}, "Result": 5})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecord(_)));
    }

    #[test]
    fn test_serde_uses_capitalised_keys() {
        let record = sample();
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.starts_with("{\"Input\""));
        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_id_access() {
        let mut record = sample();
        assert_eq!(record.id(), Some(1));
        record.set_id(42);
        assert_eq!(record.id(), Some(42));

        let no_id = Record::from_value(&json!({"Input": {}, "Result": {"id": "x"}})).unwrap();
        assert_eq!(no_id.id(), None);
    }

    #[test]
    fn test_search_text_takes_first_present_candidate() {
        let text = sample().search_text(&FieldCandidates::default());
        assert!(text.contains("singer competitions"));
        assert!(text.contains("variety shows"));
        assert!(text.contains("music or talk"));
        // processed_query outranks target among result candidates
        assert!(text.contains("video_type"));
        assert!(!text.contains("search"));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn test_search_text_tolerates_missing_fields() {
        let record = Record::from_value(&json!({
            "Input": {"history": "not a list"},
            "Result": {}
        }))
        .unwrap();
        assert_eq!(record.search_text(&FieldCandidates::default()), "");
    }

    #[test]
    fn test_display_query_and_summary() {
        let candidates = FieldCandidates::default();
        let record = sample();
        assert_eq!(
            record.display_query(&candidates).as_deref(),
            Some("Music ones, singer competitions please")
        );
        assert_eq!(record.summary(&candidates), "Music ones, singer competitions please");

        let bare = Record::from_value(&json!({"Input": {"query": ""}, "Result": {}})).unwrap();
        assert_eq!(bare.display_query(&candidates), None);
        assert_eq!(bare.summary(&candidates), "N/A");
    }
}

//! Recover `{Input, Result}` record pairs from one model generation
//!
//! Four alternative parses of the same text, each tried only when the
//! previous one found nothing:
//!
//! 1. [`extract_json`] on the whole text (object or array of pairs)
//! 2. every array literal in the text
//! 3. object literals that mention both `"Input"` and `"Result"`
//! 4. `"Input": {...}` and `"Result": {...}` bindings paired by position
//!
//! The last stage assumes the model listed inputs and results in matching
//! order. Nothing in the text confirms that, so pairs it produces deserve a
//! human look before they are kept.

use crate::json::extract_json;
use curator_domain::{Record, INPUT_KEY, RESULT_KEY};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Which stage produced the pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStrategy {
    /// The JSON extractor found a pair or an array of pairs
    Json,
    /// Array literals located directly in the text
    ArrayScan,
    /// Object literals mentioning both keys
    ObjectScan,
    /// Independent Input and Result scans paired by position
    Positional,
}

/// Outcome of [`extract_pairs_with_strategy`]
#[derive(Debug, Clone, PartialEq)]
pub struct PairExtraction {
    /// Recovered records, in text order
    pub records: Vec<Record>,
    /// Stage that produced them; `None` when nothing was found
    pub strategy: Option<PairStrategy>,
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("pair pattern is valid"))
        .collect()
}

static ARRAY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?s)\[(?:[^\[\]]|\{[^{}]*\})*\]",
        r"(?s)\[(?:[^\[\]]|\{(?:[^{}]|\{[^{}]*\})*\})*\]",
    ])
});

static OBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r#"(?s)\{[^{}]*"Input"[^{}]*"Result"[^{}]*\}"#,
        r#"(?s)\{(?:[^{}]|\{[^{}]*\})*"Input"(?:[^{}]|\{[^{}]*\})*"Result"(?:[^{}]|\{[^{}]*\})*\}"#,
        r#"(?s)\{(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*"Input"(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*"Result"(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*\}"#,
    ])
});

static INPUT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r#"(?s)"Input"\s*:\s*(\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\})"#,
        r#"(?s)"Input"\s*:\s*(\{(?:[^{}]|\{[^{}]*\})*\})"#,
    ])
});

static RESULT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r#"(?s)"Result"\s*:\s*(\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\})"#,
        r#"(?s)"Result"\s*:\s*(\{(?:[^{}]|\{[^{}]*\})*\})"#,
    ])
});

/// Recover record pairs from model output
///
/// Never fails: text with nothing recoverable yields an empty list.
///
/// # Examples
///
/// ```
/// use curator_extractor::extract_pairs;
///
/// let text = r#"[{"Input": {"query": "hi"}, "Result": {"id": 1}},
///                {"Input": {"query": "yo"}, "Result": {"id": 2}}]"#;
/// let records = extract_pairs(text);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].id(), Some(2));
///
/// assert!(extract_pairs("").is_empty());
/// ```
pub fn extract_pairs(text: &str) -> Vec<Record> {
    extract_pairs_with_strategy(text).records
}

/// Like [`extract_pairs`], also reporting which stage succeeded
pub fn extract_pairs_with_strategy(text: &str) -> PairExtraction {
    debug!(len = text.len(), "Extracting record pairs");

    let stages: [(PairStrategy, fn(&str) -> Vec<Record>); 4] = [
        (PairStrategy::Json, from_extracted_json),
        (PairStrategy::ArrayScan, from_array_literals),
        (PairStrategy::ObjectScan, from_object_literals),
        (PairStrategy::Positional, from_positional_bindings),
    ];

    for (strategy, stage) in stages {
        let records = stage(text);
        if !records.is_empty() {
            info!(count = records.len(), ?strategy, "Extracted record pairs");
            return PairExtraction {
                records,
                strategy: Some(strategy),
            };
        }
        debug!(?strategy, "Stage found no pairs");
    }

    info!("No record pairs found in text");
    PairExtraction {
        records: Vec::new(),
        strategy: None,
    }
}

/// Keep a value that is an object holding both keys
fn as_pair(value: &Value) -> Option<Record> {
    let obj = value.as_object()?;
    if !(obj.contains_key(INPUT_KEY) && obj.contains_key(RESULT_KEY)) {
        return None;
    }
    let record = Record::from_value(value);
    if record.is_none() {
        debug!("Discarding pair whose Input or Result is not an object");
    }
    record
}

fn pairs_in(value: &Value) -> Vec<Record> {
    match value {
        Value::Object(_) => as_pair(value).into_iter().collect(),
        Value::Array(items) => items.iter().filter_map(as_pair).collect(),
        _ => Vec::new(),
    }
}

fn from_extracted_json(text: &str) -> Vec<Record> {
    match extract_json(text) {
        Ok(value) => pairs_in(&value),
        Err(e) => {
            debug!(error = %e, "JSON extraction failed");
            Vec::new()
        }
    }
}

fn from_array_literals(text: &str) -> Vec<Record> {
    for pattern in ARRAY_PATTERNS.iter() {
        let records: Vec<Record> = pattern
            .find_iter(text)
            .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
            .filter(Value::is_array)
            .flat_map(|array| pairs_in(&array))
            .collect();
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

fn from_object_literals(text: &str) -> Vec<Record> {
    for pattern in OBJECT_PATTERNS.iter() {
        let records: Vec<Record> = pattern
            .find_iter(text)
            .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
            .filter_map(|value| as_pair(&value))
            .collect();
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

/// Parsed objects bound to one key, from the first pattern that yields any
fn bound_objects(patterns: &[Regex], text: &str) -> Vec<Map<String, Value>> {
    for pattern in patterns {
        let objects: Vec<Map<String, Value>> = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| serde_json::from_str::<Map<String, Value>>(m.as_str()).ok())
            .collect();
        if !objects.is_empty() {
            return objects;
        }
    }
    Vec::new()
}

fn from_positional_bindings(text: &str) -> Vec<Record> {
    let inputs = bound_objects(&INPUT_PATTERNS, text);
    let results = bound_objects(&RESULT_PATTERNS, text);
    if inputs.len() != results.len() {
        debug!(
            inputs = inputs.len(),
            results = results.len(),
            "Positional pairing truncated to the shorter list"
        );
    }
    inputs
        .into_iter()
        .zip(results)
        .map(|(input, result)| Record::new(input, result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strategy_of(text: &str) -> Option<PairStrategy> {
        extract_pairs_with_strategy(text).strategy
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let extraction = extract_pairs_with_strategy("");
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.strategy, None);
    }

    #[test]
    fn test_single_object() {
        let text = r#"{"Input": {"a":1}, "Result": {"id":1}}"#;
        let records = extract_pairs(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].to_value(), json!({"Input": {"a": 1}, "Result": {"id": 1}}));
        assert_eq!(strategy_of(text), Some(PairStrategy::Json));
    }

    #[test]
    fn test_array_in_order() {
        let text = r#"[{"Input":{},"Result":{"id":1}},{"Input":{},"Result":{"id":2}}]"#;
        let ids: Vec<_> = extract_pairs(text).iter().map(Record::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_array_skips_incomplete_items() {
        let text = r#"[{"Input":{}}, {"Input":{},"Result":{"id":2}}, 3]"#;
        let records = extract_pairs(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some(2));
    }

    #[test]
    fn test_non_object_halves_are_dropped() {
        let text = r#"[{"Input":"q","Result":{"id":1}},{"Input":{},"Result":{"id":2}}]"#;
        let records = extract_pairs(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some(2));
    }

    #[test]
    fn test_array_scan_after_prose() {
        // Stage 1 picks the flat {"q": "x"} object; the wrapping array is found by stage 2
        let text = "Here are pairs:\n\
                    [{\"Input\": {\"q\": \"x\"}, \"Result\": {\"id\": 1}}] and {\"note\": 1}\n\
                    Hope this helps!";
        let extraction = extract_pairs_with_strategy(text);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.strategy, Some(PairStrategy::ArrayScan));
    }

    #[test]
    fn test_array_scan_collects_every_array() {
        let text = "first [{\"Input\": {\"q\": 1}, \"Result\": {\"id\": 1}}]\n\
                    second [{\"Input\": {\"q\": 2}, \"Result\": {\"id\": 2}}]";
        let ids: Vec<_> = extract_pairs(text).iter().map(Record::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_object_scan() {
        // Records separated by prose, no wrapping array
        let text = "Pair one: {\"Input\": {\"q\": \"a\"}, \"Result\": {\"id\": 7}}.\n\
                    Pair two: {\"Input\": {\"q\": \"b\"}, \"Result\": {\"id\": 8}}.";
        let extraction = extract_pairs_with_strategy(text);
        let ids: Vec<_> = extraction.records.iter().map(Record::id).collect();
        assert_eq!(ids, vec![Some(7), Some(8)]);
        assert_eq!(extraction.strategy, Some(PairStrategy::ObjectScan));
    }

    #[test]
    fn test_positional_pairing_fallback() {
        let text = "noise {\"Input\": {\"x\":1} noise \"Result\": {\"id\":5}} trailing";
        let extraction = extract_pairs_with_strategy(text);
        assert_eq!(extraction.strategy, Some(PairStrategy::Positional));
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(
            extraction.records[0].to_value(),
            json!({"Input": {"x": 1}, "Result": {"id": 5}})
        );
    }

    #[test]
    fn test_positional_pairing_truncates_to_shorter() {
        let text = "\"Input\": {\"q\": 1} ,, \"Input\": {\"q\": 2} ,, \"Result\": {\"id\": 1} ??";
        let records = extract_pairs(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].input["q"], 1);
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert!(extract_pairs("I could not think of any examples, sorry.").is_empty());
        assert!(extract_pairs("{\"just\": \"an object\"}").is_empty());
    }
}

//! Best-effort JSON recovery from model output
//!
//! Model output is prose wrapped around JSON, JSON inside markdown fences, or
//! JSON with a broken tail. [`extract_json`] tries four strategies from the
//! strictest to the most lenient and returns the first value one of them
//! accepts.

use crate::error::ExtractorError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// Which recovery strategy produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStrategy {
    /// The whole trimmed text parsed as JSON
    Direct,
    /// A fenced code block held the JSON
    CodeBlock,
    /// A brace-balanced pattern scan found a non-empty object or array
    PatternScan,
    /// Line-by-line brace counting recovered an object
    LineScan,
}

/// Fenced blocks, JSON-tagged first, objects before arrays
static CODE_BLOCK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?s)```json\s*(\{.*?\})\s*```",
        r"(?s)```json\s*(\[.*?\])\s*```",
        r"(?s)```\s*(\{.*?\})\s*```",
        r"(?s)```\s*(\[.*?\])\s*```",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("code block pattern is valid"))
    .collect()
});

/// Flat objects, objects with one nested level, arrays of flat objects
static BALANCED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?s)\{(?:[^{}"]|"(?:[^"\\]|\\.)*")*\}"#,
        r#"(?s)\{(?:[^{}"]|"(?:[^"\\]|\\.)*"|\{(?:[^{}"]|"(?:[^"\\]|\\.)*")*\})*\}"#,
        r#"(?s)\[(?:[^\[\]"]|"(?:[^"\\]|\\.)*"|\{(?:[^{}"]|"(?:[^"\\]|\\.)*")*\})*\]"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("balanced pattern is valid"))
    .collect()
});

/// Recover one JSON value from arbitrary model output
///
/// # Errors
///
/// Returns [`ExtractorError::Extraction`] carrying the first 500 characters
/// of `text` when no strategy yields a value.
///
/// # Examples
///
/// ```
/// use curator_extractor::extract_json;
///
/// let value = extract_json("Sure! ```json\n{\"id\": 3}\n``` Anything else?").unwrap();
/// assert_eq!(value["id"], 3);
/// ```
pub fn extract_json(text: &str) -> Result<Value, ExtractorError> {
    extract_json_with_strategy(text).map(|(value, _)| value)
}

/// Like [`extract_json`], also reporting which strategy succeeded
pub fn extract_json_with_strategy(text: &str) -> Result<(Value, JsonStrategy), ExtractorError> {
    let found = parse_direct(text)
        .map(|v| (v, JsonStrategy::Direct))
        .or_else(|| parse_code_block(text).map(|v| (v, JsonStrategy::CodeBlock)))
        .or_else(|| parse_balanced(text).map(|v| (v, JsonStrategy::PatternScan)))
        .or_else(|| parse_line_scan(text).map(|v| (v, JsonStrategy::LineScan)));

    match found {
        Some((value, strategy)) => {
            debug!(?strategy, "Recovered JSON from model output");
            Ok((value, strategy))
        }
        None => Err(ExtractorError::extraction(text)),
    }
}

fn parse_direct(text: &str) -> Option<Value> {
    serde_json::from_str(text.trim()).ok()
}

fn parse_code_block(text: &str) -> Option<Value> {
    CODE_BLOCK_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| serde_json::from_str(m.as_str()).ok())
    })
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn parse_balanced(text: &str) -> Option<Value> {
    BALANCED_PATTERNS.iter().find_map(|pattern| {
        pattern
            .find_iter(text)
            .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
            .find(is_meaningful)
    })
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Parse an accumulated block, cut after its last closing brace
fn parse_block(lines: &[&str]) -> Option<Value> {
    let joined = lines.join("\n");
    let end = joined.rfind('}')?;
    serde_json::from_str(&joined[..=end]).ok()
}

fn parse_line_scan(text: &str) -> Option<Value> {
    let mut block: Vec<&str> = Vec::new();
    let mut balance = 0i64;

    for line in text.split('\n') {
        if block.is_empty() {
            let Some(start) = line.find('{') else {
                continue;
            };
            let opened = &line[start..];
            block.push(opened);
            balance = brace_delta(opened);
        } else {
            block.push(line);
            balance += brace_delta(line);
        }

        if balance <= 0 {
            if let Some(value) = parse_block(&block) {
                return Some(value);
            }
            block.clear();
            balance = 0;
        }
    }
    None
}

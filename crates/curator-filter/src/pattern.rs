//! Regular expression filter
//!
//! The pattern runs against the whole record serialised on one line, keys
//! and punctuation included, so `"id": 3` or `"Result"` are valid targets.
//! The serialised form separates items with `", "` and keys from values with
//! `": "` and leaves non-ASCII text unescaped.

use curator_domain::Record;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use tracing::{debug, info};

use crate::error::FilterError;

/// Compact JSON with a space after every `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Single-line text form of a record that regex filters search
pub fn searchable_json(record: &Record) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    if let Err(e) = record.serialize(&mut serializer) {
        debug!(error = %e, "Record serialisation failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Keeps records whose serialised form matches a pattern anywhere
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Option<Regex>,
}

impl RegexFilter {
    /// Compile a filter; an empty pattern keeps every record
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        if pattern.is_empty() {
            return Ok(Self { regex: None });
        }
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex: Some(regex) })
    }

    /// Whether this filter keeps every record
    pub fn is_identity(&self) -> bool {
        self.regex.is_none()
    }

    /// Whether `record` passes
    pub fn matches(&self, record: &Record) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&searchable_json(record)),
            None => true,
        }
    }

    /// Records that pass, in input order
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let Some(regex) = &self.regex else {
            debug!("Empty pattern, keeping all records");
            return records.to_vec();
        };
        let kept: Vec<Record> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        info!(pattern = regex.as_str(), kept = kept.len(), of = records.len(), "Regex filter applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(&value).unwrap()
    }

    #[test]
    fn test_searchable_json_shape() {
        let r = record(json!({
            "Input": {"query": "综艺节目", "tags": [1, 2]},
            "Result": {"id": 3, "ok": true}
        }));
        assert_eq!(
            searchable_json(&r),
            r#"{"Input": {"query": "综艺节目", "tags": [1, 2]}, "Result": {"id": 3, "ok": true}}"#
        );
    }

    #[test]
    fn test_matches_keys_and_values() {
        let records = vec![
            record(json!({"Input": {"query": "a"}, "Result": {"id": 3}})),
            record(json!({"Input": {"query": "b"}, "Result": {"id": 4, "target": "search"}})),
        ];
        let by_id = RegexFilter::new(r#""id": 3\b"#).unwrap();
        assert_eq!(by_id.apply(&records), vec![records[0].clone()]);

        let by_key = RegexFilter::new(r#""target""#).unwrap();
        assert_eq!(by_key.apply(&records), vec![records[1].clone()]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RegexFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_empty_pattern_is_identity() {
        let filter = RegexFilter::new("").unwrap();
        assert!(filter.is_identity());
        let records = vec![record(json!({"Input": {}, "Result": {}}))];
        assert_eq!(filter.apply(&records), records);
    }
}

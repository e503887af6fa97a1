//! Filter step configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model used by a semantic step that does not name one
pub const DEFAULT_SEMANTIC_MODEL: &str = "qwen-plus";

/// One configured stage of a filter pipeline
///
/// On disk a step is `{"type": "tags" | "regex" | "llm", "params": {...}}`.
/// Steps of an unrecognised type still deserialise, as [`FilterStep::Unknown`],
/// so one bad entry does not invalidate a whole pipeline definition.
///
/// # Examples
///
/// ```
/// use curator_domain::FilterStep;
///
/// let step: FilterStep =
///     serde_json::from_str(r#"{"type": "tags", "params": {"tags": "variety, music"}}"#).unwrap();
/// assert_eq!(step, FilterStep::tags(["variety", "music"]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFilterStep", into = "RawFilterStep")]
pub enum FilterStep {
    /// Keep records whose search text contains every tag
    Tags {
        /// Tags, all of which must match (case-insensitive)
        tags: Vec<String>,
    },

    /// Keep records whose serialised form matches a regular expression
    Regex {
        /// Regular expression source
        pattern: String,
    },

    /// Keep records a language model judges relevant to a query
    Semantic {
        /// Free-text relevance query
        query: String,
        /// Model identifier
        model: String,
    },

    /// A step type this version does not know
    Unknown {
        /// The unrecognised `type` value
        kind: String,
        /// Parameters as given
        params: Map<String, Value>,
    },
}

impl FilterStep {
    /// Tag step from a list of strings, kept verbatim
    ///
    /// Use [`parse_tag_list`] for comma-separated user input.
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterStep::Tags {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Regex step
    pub fn regex(pattern: impl Into<String>) -> Self {
        FilterStep::Regex {
            pattern: pattern.into(),
        }
    }

    /// Semantic step
    pub fn semantic(query: impl Into<String>, model: impl Into<String>) -> Self {
        FilterStep::Semantic {
            query: query.into(),
            model: model.into(),
        }
    }

    /// The step's `type` name
    pub fn kind(&self) -> &str {
        match self {
            FilterStep::Tags { .. } => "tags",
            FilterStep::Regex { .. } => "regex",
            FilterStep::Semantic { .. } => "llm",
            FilterStep::Unknown { kind, .. } => kind,
        }
    }

    /// Whether running the step needs a language model
    pub fn needs_model(&self) -> bool {
        matches!(self, FilterStep::Semantic { query, .. } if !query.trim().is_empty())
    }
}

/// Split comma-separated tag input into trimmed, non-empty tags
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFilterStep {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    params: Map<String, Value>,
}

fn string_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    params.get(key).and_then(Value::as_str).map(str::to_string)
}

impl From<RawFilterStep> for FilterStep {
    fn from(raw: RawFilterStep) -> Self {
        let params = &raw.params;
        match raw.kind.trim().to_lowercase().as_str() {
            "tags" | "tag" => {
                let tags = match params.get("tags") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    Some(Value::String(s)) => parse_tag_list(s),
                    _ => Vec::new(),
                };
                FilterStep::Tags { tags }
            }
            "regex" => FilterStep::Regex {
                pattern: string_param(params, "pattern").unwrap_or_default(),
            },
            "llm" | "semantic" => FilterStep::Semantic {
                query: string_param(params, "query").unwrap_or_default(),
                model: string_param(params, "model")
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SEMANTIC_MODEL.to_string()),
            },
            _ => FilterStep::Unknown {
                kind: raw.kind,
                params: raw.params,
            },
        }
    }
}

impl From<FilterStep> for RawFilterStep {
    fn from(step: FilterStep) -> Self {
        let kind = step.kind().to_string();
        let mut params = Map::new();
        match step {
            FilterStep::Tags { tags } => {
                params.insert("tags".into(), Value::from(tags));
            }
            FilterStep::Regex { pattern } => {
                params.insert("pattern".into(), Value::from(pattern));
            }
            FilterStep::Semantic { query, model } => {
                params.insert("query".into(), Value::from(query));
                params.insert("model".into(), Value::from(model));
            }
            FilterStep::Unknown { params: original, .. } => params = original,
        }
        RawFilterStep { kind, params }
    }
}

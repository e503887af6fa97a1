//! Semantic (model-judged) filter

use curator_domain::traits::LlmProvider;
use curator_domain::Record;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Build the relevance question asked for one record
pub fn relevance_prompt(query: &str, record: &Record) -> String {
    let entry = serde_json::to_string_pretty(record).unwrap_or_default();
    format!(
        "User query: '{}'\n\nData entry: '{}'\n\n\
         Decide whether this data entry is semantically related to the user query. \
         Reply with only 'true' or 'false' and no other text.",
        query, entry
    )
}

/// Whether a model reply counts as "relevant"
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().to_lowercase() == "true"
}

/// Keeps records a language model judges relevant to a query
///
/// Each record is one independent model call. A record is kept only when
/// the reply is exactly `true` (ignoring case and surrounding whitespace);
/// any other reply, or a failed call, drops that record and the pass goes on.
pub struct SemanticFilter<'a, L> {
    provider: &'a L,
    query: String,
    model: String,
}

impl<'a, L> SemanticFilter<'a, L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a filter over `provider`
    pub fn new(provider: &'a L, query: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider,
            query: query.into(),
            model: model.into(),
        }
    }

    /// Whether this filter keeps every record without calling the model
    pub fn is_identity(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Ask the model about one record
    pub fn judge(&self, record: &Record) -> bool {
        let prompt = relevance_prompt(&self.query, record);
        match self.provider.generate(&prompt, &self.model) {
            Ok(reply) => is_affirmative(&reply),
            Err(e) => {
                warn!(id = ?record.id(), error = %e, "Model call failed, excluding record");
                false
            }
        }
    }

    /// Records the model keeps, in input order
    ///
    /// `progress` receives a message and the fraction of records judged so
    /// far after each call.
    pub fn apply(
        &self,
        records: &[Record],
        mut progress: Option<&mut dyn FnMut(&str, f64)>,
    ) -> Vec<Record> {
        if self.is_identity() {
            debug!("Empty query, keeping all records");
            return records.to_vec();
        }

        let total = records.len();
        let mut kept = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if self.judge(record) {
                kept.push(record.clone());
            }
            if let Some(report) = progress.as_mut() {
                let done = index + 1;
                let message = format!("Judged {}/{} records (id {:?})", done, total, record.id());
                report(&message, done as f64 / total as f64);
            }
        }
        info!(model = %self.model, kept = kept.len(), of = total, "Semantic filter applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_llm::MockProvider;
    use serde_json::json;

    fn records() -> Vec<Record> {
        (1..=4)
            .map(|id| {
                Record::from_value(&json!({"Input": {"query": format!("q{id}")}, "Result": {"id": id}}))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_prompt_embeds_query_and_pretty_record() {
        let record = &records()[0];
        let prompt = relevance_prompt("music", record);
        assert!(prompt.starts_with("User query: 'music'"));
        assert!(prompt.contains("\"Result\": {\n    \"id\": 1\n  }"));
        assert!(prompt.contains("'true' or 'false'"));
    }

    #[test]
    fn test_affirmative_reply() {
        assert!(is_affirmative(" TRUE\n"));
        assert!(!is_affirmative("true."));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative("false"));
    }

    #[test]
    fn test_keeps_only_true_replies() {
        let mut llm = MockProvider::new("false");
        llm.respond_when_contains("\"id\": 2", "True");
        llm.respond_when_contains("\"id\": 4", " true ");
        let filter = SemanticFilter::new(&llm, "anything", "qwen-plus");

        let kept = filter.apply(&records(), None);
        let ids: Vec<_> = kept.iter().filter_map(Record::id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(llm.call_count(), 4);
        assert!(llm.calls().iter().all(|c| c.model == "qwen-plus"));
    }

    #[test]
    fn test_failed_calls_exclude_without_aborting() {
        let mut llm = MockProvider::new("true");
        llm.fail_when_contains("\"id\": 1");
        let filter = SemanticFilter::new(&llm, "q", "m");

        let kept = filter.apply(&records(), None);
        assert_eq!(kept.len(), 3);

        let failing = MockProvider::failing();
        let filter = SemanticFilter::new(&failing, "q", "m");
        assert!(filter.apply(&records(), None).is_empty());
        assert_eq!(failing.call_count(), 4);
    }

    #[test]
    fn test_progress_per_record() {
        let llm = MockProvider::new("true");
        let filter = SemanticFilter::new(&llm, "q", "m");
        let mut seen = Vec::new();
        let mut report = |_: &str, fraction: f64| seen.push(fraction);

        filter.apply(&records(), Some(&mut report));
        assert_eq!(seen, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_empty_query_makes_no_calls() {
        let llm = MockProvider::new("false");
        let filter = SemanticFilter::new(&llm, "   ", "m");
        assert_eq!(filter.apply(&records(), None).len(), 4);
        assert_eq!(llm.call_count(), 0);
    }
}

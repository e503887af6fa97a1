//! Tag filter

use curator_domain::{FieldCandidates, Record};
use tracing::{debug, info};

/// Keeps records whose search text contains every tag
///
/// Matching is a case-insensitive substring test against
/// [`Record::search_text`]. Tags are used as given apart from case folding,
/// so surrounding whitespace is part of the tag. An empty tag list keeps
/// everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    /// Create a filter; tags are lowercased
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags.into_iter().map(|t| t.as_ref().to_lowercase()).collect();
        Self { tags }
    }

    /// Normalised tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether this filter keeps every record
    pub fn is_identity(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether `record` passes
    pub fn matches(&self, record: &Record, candidates: &FieldCandidates) -> bool {
        if self.is_identity() {
            return true;
        }
        let text = record.search_text(candidates);
        self.tags.iter().all(|tag| text.contains(tag.as_str()))
    }

    /// Records that pass, in input order
    pub fn apply(&self, records: &[Record], candidates: &FieldCandidates) -> Vec<Record> {
        if self.is_identity() {
            debug!("Empty tag list, keeping all records");
            return records.to_vec();
        }
        let kept: Vec<Record> = records
            .iter()
            .filter(|r| self.matches(r, candidates))
            .cloned()
            .collect();
        info!(tags = ?self.tags, kept = kept.len(), of = records.len(), "Tag filter applied");
        kept
    }
}

//! Ordered composition of filter steps

use crate::error::FilterError;
use crate::pattern::RegexFilter;
use crate::semantic::SemanticFilter;
use crate::tags::TagFilter;
use curator_domain::traits::LlmProvider;
use curator_domain::{FieldCandidates, FilterStep, Record};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Progress sink: a status message and the overall fraction done in `[0, 1]`
pub type Progress<'p> = &'p mut dyn FnMut(&str, f64);

enum Stage<'a, L> {
    Tags(TagFilter),
    Regex(RegexFilter),
    Semantic(SemanticFilter<'a, L>),
    Pass(&'static str),
    Skip(String),
}

impl<L> Stage<'_, L> {
    fn kind(&self) -> &str {
        match self {
            Stage::Tags(_) => "tags",
            Stage::Regex(_) => "regex",
            Stage::Semantic(_) => "llm",
            Stage::Pass(kind) => kind,
            Stage::Skip(kind) => kind,
        }
    }
}

/// A validated, ready-to-run sequence of filter steps
///
/// Construction compiles every regex and checks that semantic steps have a
/// provider, so a bad pipeline is rejected before any record is scanned or
/// any model is called. Each step's output is the next step's input.
///
/// # Examples
///
/// ```
/// use curator_domain::{FilterStep, Record};
/// use curator_filter::FilterPipeline;
/// use curator_llm::MockProvider;
/// use serde_json::json;
///
/// let records = vec![
///     Record::from_value(&json!({"Input": {"query": "jazz night"}, "Result": {"id": 1}})).unwrap(),
///     Record::from_value(&json!({"Input": {"query": "rain"}, "Result": {"id": 2}})).unwrap(),
/// ];
/// let steps = vec![FilterStep::tags(["jazz"]), FilterStep::regex(r#""id": 1"#)];
///
/// let pipeline = FilterPipeline::<MockProvider>::new(&steps, None).unwrap();
/// let kept = pipeline.run(&records, None);
/// assert_eq!(kept.len(), 1);
/// ```
pub struct FilterPipeline<'a, L> {
    stages: Vec<Stage<'a, L>>,
    candidates: FieldCandidates,
}

impl<'a, L> FilterPipeline<'a, L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Validate `steps` and build the pipeline
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidPattern`] for a regex step that does not compile
    /// - [`FilterError::ProviderUnavailable`] for a semantic step with a
    ///   non-empty query when `provider` is `None`
    pub fn new(steps: &[FilterStep], provider: Option<&'a L>) -> Result<Self, FilterError> {
        let mut stages = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let stage = match step {
                FilterStep::Tags { tags } => Stage::Tags(TagFilter::new(tags)),
                FilterStep::Regex { pattern } => Stage::Regex(RegexFilter::new(pattern)?),
                FilterStep::Semantic { query, model } => {
                    if step.needs_model() {
                        let provider = provider
                            .ok_or(FilterError::ProviderUnavailable { step: index + 1 })?;
                        Stage::Semantic(SemanticFilter::new(provider, query.as_str(), model.as_str()))
                    } else {
                        Stage::Pass("llm")
                    }
                }
                FilterStep::Unknown { kind, .. } => Stage::Skip(kind.clone()),
            };
            stages.push(stage);
        }
        Ok(Self {
            stages,
            candidates: FieldCandidates::default(),
        })
    }

    /// Use a project's field candidate table for tag matching
    pub fn with_candidates(mut self, candidates: FieldCandidates) -> Self {
        self.candidates = candidates;
        self
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no steps
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every step in order over `records`
    ///
    /// After step `i` of `n` completes, `progress` receives `i / n`. A
    /// semantic step also reports per record, scaled into its own slice:
    /// `(i - 1) / n + fraction / n`. Reported fractions never decrease.
    /// Unknown step types are skipped with a warning.
    pub fn run(&self, records: &[Record], mut progress: Option<Progress<'_>>) -> Vec<Record> {
        let total = self.stages.len();
        let mut current = records.to_vec();

        for (index, stage) in self.stages.iter().enumerate() {
            let step = index + 1;

            current = match stage {
                Stage::Tags(filter) => filter.apply(&current, &self.candidates),
                Stage::Regex(filter) => filter.apply(&current),
                Stage::Semantic(filter) => match progress.as_mut() {
                    Some(outer) => {
                        let mut scaled = |message: &str, fraction: f64| {
                            let message = format!("Step {}/{} (llm): {}", step, total, message);
                            outer(&message, (index as f64 + fraction) / total as f64);
                        };
                        filter.apply(&current, Some(&mut scaled))
                    }
                    None => filter.apply(&current, None),
                },
                Stage::Pass(kind) => {
                    debug!(step, kind, "Step has no parameters, keeping all records");
                    current
                }
                Stage::Skip(kind) => {
                    warn!(step, kind = %kind, "Skipping unknown filter step");
                    current
                }
            };

            if let Some(report) = progress.as_mut() {
                let message = format!(
                    "Step {}/{} ({}) done, {} records remain",
                    step,
                    total,
                    stage.kind(),
                    current.len()
                );
                report(&message, step as f64 / total as f64);
            }
        }

        info!(steps = total, kept = current.len(), of = records.len(), "Filter pipeline complete");
        current
    }
}

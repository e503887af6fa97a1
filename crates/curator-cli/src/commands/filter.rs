//! Filter command implementation.

use crate::cli::FilterArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::state::AppState;
use curator_domain::traits::LlmProvider;
use curator_domain::{parse_tag_list, FieldCandidates, FilterStep, Record, Split, DEFAULT_SEMANTIC_MODEL};
use curator_filter::FilterPipeline;
use std::fmt::Display;
use tracing::warn;

/// Execute the filter command.
pub fn execute_filter(args: FilterArgs, state: &AppState) -> Result<()> {
    let steps = build_steps(&args)?;
    if steps.is_empty() {
        warn!("No filter steps given, every record is kept");
    }

    let project = state.open(&args.project.project)?;
    let split = Split::from(args.split);
    let records = project.data().records(split);

    let provider = if steps.iter().any(FilterStep::needs_model) {
        Some(state.provider()?)
    } else {
        None
    };
    let candidates = project.config.candidates();
    let kept = run_steps(records, &steps, provider.as_ref(), candidates.clone(), &state.formatter)?;

    let formatter = &state.formatter;
    println!("{}", formatter.format_records(&kept, &candidates)?);
    eprintln!(
        "{}",
        formatter.info(&format!("Kept {} of {} {} records", kept.len(), records.len(), split))
    );
    Ok(())
}

/// Steps from a JSON file, or from the flags in tags, regex, semantic order.
pub(crate) fn build_steps(args: &FilterArgs) -> Result<Vec<FilterStep>> {
    if let Some(path) = &args.steps {
        return Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?);
    }

    let mut steps = Vec::new();
    if let Some(tags) = &args.tags {
        steps.push(FilterStep::tags(parse_tag_list(tags)));
    }
    if let Some(pattern) = &args.regex {
        steps.push(FilterStep::regex(pattern.as_str()));
    }
    if let Some(query) = &args.semantic {
        let model = args.model.as_deref().unwrap_or(DEFAULT_SEMANTIC_MODEL);
        steps.push(FilterStep::semantic(query.as_str(), model));
    }
    Ok(steps)
}

/// Validate and run the pipeline, reporting progress on stderr.
pub(crate) fn run_steps<L>(
    records: &[Record],
    steps: &[FilterStep],
    provider: Option<&L>,
    candidates: FieldCandidates,
    formatter: &Formatter,
) -> Result<Vec<Record>>
where
    L: LlmProvider,
    L::Error: Display,
{
    let pipeline = FilterPipeline::new(steps, provider)?.with_candidates(candidates);
    let mut report = |message: &str, fraction: f64| eprintln!("{}", formatter.progress(message, fraction));
    Ok(pipeline.run(records, Some(&mut report)))
}

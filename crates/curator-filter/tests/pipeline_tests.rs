//! Integration tests for curator-filter
//!
//! These tests run whole pipelines over small collections with a mock model.

use curator_domain::{FieldCandidates, FilterStep, Record};
use curator_filter::{FilterError, FilterPipeline, RegexFilter, TagFilter};
use curator_llm::MockProvider;
use proptest::prelude::*;
use serde_json::json;

fn collection() -> Vec<Record> {
    let values = [
        json!({"Input": {"query": "Variety show tonight"}, "Result": {"id": 1, "intent": "video"}}),
        json!({"Input": {"query": "variety music special"}, "Result": {"id": 2, "intent": "music"}}),
        json!({"Input": {"query": "weather in Paris"}, "Result": {"id": 3, "intent": "weather"}}),
        json!({"Input": {"query": "music charts 2025"}, "Result": {"id": 4, "intent": "music"}}),
    ];
    values
        .iter()
        .map(|v| Record::from_value(v).unwrap())
        .collect()
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().filter_map(Record::id).collect()
}

#[test]
fn test_steps_narrow_in_order() {
    let steps = vec![FilterStep::tags(["music"]), FilterStep::regex("2025")];
    let pipeline = FilterPipeline::<MockProvider>::new(&steps, None).unwrap();
    assert_eq!(ids(&pipeline.run(&collection(), None)), vec![4]);
}

#[test]
fn test_semantic_step_after_tags() {
    let mut llm = MockProvider::new("false");
    llm.respond_when_contains("\"id\": 2", "true");
    let steps = vec![
        FilterStep::tags(["variety"]),
        FilterStep::semantic("music related", "qwen-plus"),
    ];

    let pipeline = FilterPipeline::new(&steps, Some(&llm)).unwrap();
    let kept = pipeline.run(&collection(), None);

    assert_eq!(ids(&kept), vec![2]);
    // Only the two records surviving the tag step reach the model
    assert_eq!(llm.call_count(), 2);
}

#[test]
fn test_invalid_regex_fails_before_any_model_call() {
    let llm = MockProvider::new("true");
    let steps = vec![
        FilterStep::semantic("anything", "qwen-plus"),
        FilterStep::regex("[unclosed"),
    ];

    let result = FilterPipeline::new(&steps, Some(&llm));
    assert!(matches!(result, Err(FilterError::InvalidPattern { .. })));
    assert_eq!(llm.call_count(), 0);
}

#[test]
fn test_semantic_step_without_provider() {
    let steps = vec![FilterStep::tags(["x"]), FilterStep::semantic("q", "m")];
    let result = FilterPipeline::<MockProvider>::new(&steps, None);
    assert!(matches!(result, Err(FilterError::ProviderUnavailable { step: 2 })));

    // An empty query never needs the model
    let steps = vec![FilterStep::semantic("", "m")];
    let pipeline = FilterPipeline::<MockProvider>::new(&steps, None).unwrap();
    assert_eq!(pipeline.run(&collection(), None).len(), 4);
}

#[test]
fn test_unknown_step_is_skipped() {
    let steps: Vec<FilterStep> = serde_json::from_value(json!([
        {"type": "fuzzy", "params": {"threshold": 0.5}},
        {"type": "tags", "params": {"tags": "weather"}}
    ]))
    .unwrap();

    let pipeline = FilterPipeline::<MockProvider>::new(&steps, None).unwrap();
    assert_eq!(pipeline.len(), 2);
    assert_eq!(ids(&pipeline.run(&collection(), None)), vec![3]);
}

#[test]
fn test_empty_pipeline_returns_input() {
    let pipeline = FilterPipeline::<MockProvider>::new(&[], None).unwrap();
    assert!(pipeline.is_empty());
    let mut calls = 0;
    let mut report = |_: &str, _: f64| calls += 1;
    assert_eq!(pipeline.run(&collection(), Some(&mut report)), collection());
    assert_eq!(calls, 0);
}

#[test]
fn test_all_model_calls_failing_yields_empty() {
    let llm = MockProvider::failing();
    let steps = vec![FilterStep::semantic("music", "qwen-plus")];
    let pipeline = FilterPipeline::new(&steps, Some(&llm)).unwrap();
    assert!(pipeline.run(&collection(), None).is_empty());
    assert_eq!(llm.call_count(), 4);
}

#[test]
fn test_progress_with_semantic_slice() {
    let llm = MockProvider::new("true");
    let steps = vec![
        FilterStep::tags(["music"]),
        FilterStep::semantic("music", "qwen-plus"),
    ];
    let pipeline = FilterPipeline::new(&steps, Some(&llm)).unwrap();

    let mut fractions = Vec::new();
    let mut messages = Vec::new();
    let mut report = |message: &str, fraction: f64| {
        messages.push(message.to_string());
        fractions.push(fraction);
    };
    pipeline.run(&collection(), Some(&mut report));

    // tags done, two records judged, semantic step done
    assert_eq!(fractions, vec![0.5, 0.75, 1.0, 1.0]);
    assert!(messages[0].starts_with("Step 1/2 (tags) done"));
    assert!(messages[1].starts_with("Step 2/2 (llm): Judged 1/2"));
}

#[test]
fn test_project_candidates_apply() {
    let records = vec![Record::from_value(&json!({
        "Input": {"utterance": "jazz please"},
        "Result": {"id": 7}
    }))
    .unwrap()];
    let candidates = FieldCandidates {
        input_text: vec!["utterance".into()],
        ..FieldCandidates::default()
    };
    let steps = vec![FilterStep::tags(["jazz"])];

    let default = FilterPipeline::<MockProvider>::new(&steps, None).unwrap();
    assert!(default.run(&records, None).is_empty());

    let custom = FilterPipeline::<MockProvider>::new(&steps, None)
        .unwrap()
        .with_candidates(candidates);
    assert_eq!(ids(&custom.run(&records, None)), vec![7]);
}

fn arb_record() -> impl Strategy<Value = Record> {
    ("[a-z ]{0,20}", "[a-z ]{0,10}", 0i64..100).prop_map(|(query, intent, id)| {
        Record::from_value(&json!({
            "Input": {"query": query},
            "Result": {"id": id, "intent": intent}
        }))
        .unwrap()
    })
}

fn is_subsequence(sub: &[Record], full: &[Record]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|r| rest.any(|f| f == r))
}

proptest! {
    #[test]
    fn prop_tag_filter_is_ordered_subset(
        records in prop::collection::vec(arb_record(), 0..20),
        tags in prop::collection::vec("[a-z]{1,3}", 1..3),
    ) {
        let candidates = FieldCandidates::default();
        let kept = TagFilter::new(&tags).apply(&records, &candidates);

        prop_assert!(is_subsequence(&kept, &records));
        for record in &records {
            let text = record.search_text(&candidates);
            let expected = tags.iter().all(|t| text.contains(t.as_str()));
            prop_assert_eq!(kept.contains(record), expected);
        }
    }

    #[test]
    fn prop_regex_filter_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..20),
        pattern in "[a-z]{1,2}|\"id\": [0-9]",
    ) {
        let filter = RegexFilter::new(&pattern).unwrap();
        let once = filter.apply(&records);
        let twice = filter.apply(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(is_subsequence(&once, &records));
    }

    #[test]
    fn prop_progress_never_decreases(
        kinds in prop::collection::vec(0u8..4, 1..6),
        records in prop::collection::vec(arb_record(), 0..8),
    ) {
        let llm = MockProvider::new("true");
        let steps: Vec<FilterStep> = kinds
            .iter()
            .map(|k| match k {
                0 => FilterStep::tags(["a"]),
                1 => FilterStep::regex("id"),
                2 => FilterStep::semantic("q", "m"),
                _ => serde_json::from_value(json!({"type": "other"})).unwrap(),
            })
            .collect();
        let pipeline = FilterPipeline::new(&steps, Some(&llm)).unwrap();

        let mut fractions = Vec::new();
        let mut report = |_: &str, f: f64| fractions.push(f);
        pipeline.run(&records, Some(&mut report));

        prop_assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(fractions.last().copied(), Some(1.0));
    }
}

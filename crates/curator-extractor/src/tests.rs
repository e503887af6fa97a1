//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{
        extract_json, extract_pairs, ExtractorError, Generator, GeneratorConfig, PairStrategy,
    };
    use curator_llm::MockProvider;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    #[test]
    fn test_generate_pairs_from_fenced_output() {
        let llm = MockProvider::new(
            "Sure, here are two examples:\n```json\n[\
             {\"Input\": {\"query\": \"play jazz\"}, \"Result\": {\"intent\": \"music\"}},\
             {\"Input\": {\"query\": \"weather\"}, \"Result\": {\"intent\": \"weather\"}}\
             ]\n```",
        );
        let generator = Generator::new(llm.clone(), GeneratorConfig::default());

        let generation = generator.generate_pairs("You write examples.", None).unwrap();
        assert_eq!(generation.records.len(), 2);
        assert_eq!(generation.strategy, Some(PairStrategy::Json));
        assert_eq!(generation.records[1].result["intent"], "weather");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "qwen-max");
        assert!(calls[0].prompt.starts_with("You write examples."));
    }

    #[test]
    fn test_generate_pairs_with_nothing_recoverable() {
        let llm = MockProvider::new("I am unable to help with that.");
        let generator = Generator::new(llm, GeneratorConfig::default());

        let generation = generator.generate_pairs("prompt", Some("qwen-turbo")).unwrap();
        assert!(generation.records.is_empty());
        assert_eq!(generation.strategy, None);
        assert_eq!(generation.raw, "I am unable to help with that.");
    }

    #[test]
    fn test_generate_pairs_model_failure_is_an_error() {
        let generator = Generator::new(MockProvider::failing(), GeneratorConfig::default());
        let result = generator.generate_pairs("prompt", None);
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[test]
    fn test_forward_builds_input_from_user_text() {
        let llm = MockProvider::new("Result: {\"id\": 1, \"intent\": \"music\"}");
        let generator = Generator::new(llm, GeneratorConfig::default());

        let record = generator.forward("system", "play jazz", None).unwrap();
        assert_eq!(
            record.to_value(),
            json!({
                "Input": {"history": [], "query": "play jazz"},
                "Result": {"id": 1, "intent": "music"}
            })
        );
    }

    #[test]
    fn test_forward_rejects_non_object_result() {
        let llm = MockProvider::new("[1, 2, 3]");
        let generator = Generator::new(llm, GeneratorConfig::default());
        let result = generator.forward("system", "hi", None);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_forward_unparseable_output() {
        let llm = MockProvider::new("no json at all");
        let generator = Generator::new(llm, GeneratorConfig::default());
        let result = generator.forward("system", "hi", None);
        assert!(matches!(result, Err(ExtractorError::Extraction { .. })));
    }

    #[test]
    fn test_backward_reads_inferred_input() {
        let llm = MockProvider::new("{\"user_input\": \"any jazz?\", \"intent\": \"music\"}");
        let config = GeneratorConfig {
            query_field: "current_query".to_string(),
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(llm, config);

        let record = generator.backward("system", "{\"intent\": \"music\"}", None).unwrap();
        assert_eq!(record.input["current_query"], "any jazz?");
        assert_eq!(record.result["intent"], "music");
    }

    #[test]
    fn test_backward_falls_back_to_query_then_empty() {
        let llm = MockProvider::new("{\"query\": \"from query\"}");
        let generator = Generator::new(llm, GeneratorConfig::default());
        let record = generator.backward("system", "x", None).unwrap();
        assert_eq!(record.input["query"], "from query");

        let llm = MockProvider::new("{\"intent\": \"none\"}");
        let generator = Generator::new(llm, GeneratorConfig::default());
        let record = generator.backward("system", "x", None).unwrap();
        assert_eq!(record.input["query"], "");
    }

    #[test]
    fn test_backward_keeps_full_pair() {
        let llm = MockProvider::new("{\"Input\": {\"query\": \"q\"}, \"Result\": {\"id\": 9}}");
        let generator = Generator::new(llm, GeneratorConfig::default());
        let record = generator.backward("system", "x", None).unwrap();
        assert_eq!(record.id(), Some(9));
        assert_eq!(record.input["query"], "q");
    }

    #[test]
    fn test_batch_skips_failed_rounds() {
        let mut llm = MockProvider::new(
            "[{\"Input\": {\"query\": \"a\"}, \"Result\": {\"intent\": \"x\"}}]",
        );
        llm.fail_when_contains("broken system");
        let generator = Generator::new(llm.clone(), GeneratorConfig::default());

        let records = generator.generate_batch("good system", 3, None);
        assert_eq!(records.len(), 3);

        let records = generator.generate_batch("broken system", 2, None);
        assert!(records.is_empty());
        assert_eq!(llm.call_count(), 5);
    }

    fn flat_object() -> impl Strategy<Value = Map<String, Value>> {
        prop::collection::btree_map("[a-z{}\" ]{1,8}", any::<i64>(), 1..5)
            .prop_map(|m| m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }

    proptest! {
        #[test]
        fn prop_extract_pairs_never_panics(text in ".{0,200}") {
            let _ = extract_pairs(&text);
        }

        #[test]
        fn prop_flat_object_recovered_from_prose(
            object in flat_object(),
            prefix in "[a-zA-Z ,.:]{0,40}",
            suffix in "[a-zA-Z ,.:]{0,40}",
        ) {
            let text = format!("{}{}{}", prefix, Value::Object(object.clone()), suffix);
            prop_assert_eq!(extract_json(&text).unwrap(), Value::Object(object));
        }
    }
}

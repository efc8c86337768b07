use serde_json::{json, Map, Value};

use super::*;
use crate::protocols::ChatCompletionRequest;

#[test]
fn test_factory_registers_builtin_parsers() {
    let factory = ParserFactory::new();
    assert_eq!(
        factory.registry().list_parsers(),
        vec!["new_model_json", "passthrough"]
    );
    assert_eq!(factory.registry().default_parser(), "passthrough");
}

#[test]
fn test_factory_unknown_parser() {
    let factory = ParserFactory::new();
    match factory.create_parser("mistral") {
        Err(ParserError::UnknownParser(name)) => assert_eq!(name, "mistral"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected unknown parser error"),
    }
}

#[test]
fn test_registry_model_resolution() {
    let mut factory = ParserFactory::new();
    let registry = factory.registry_mut();
    registry.map_model("llama-*", "passthrough");
    registry.map_model("llama-3.1*", "new_model_json");
    registry.map_model("exact-model", "new_model_json");

    let registry = factory.registry();
    assert_eq!(registry.resolve_parser_name("exact-model"), "new_model_json");
    // Longest prefix wins
    assert_eq!(
        registry.resolve_parser_name("llama-3.1-8b-instruct"),
        "new_model_json"
    );
    assert_eq!(registry.resolve_parser_name("llama-2-7b"), "passthrough");
    assert_eq!(registry.resolve_parser_name("unknown"), "passthrough");
}

#[test]
fn test_registry_custom_default() {
    let mut registry = ParserRegistry::new();
    registry.register_parser("new_model_json", || Box::new(NewModelParser::new()));
    registry.set_default_parser("new_model_json");

    let parser = registry.create_for_model("anything").unwrap();
    assert!(parser.has_tool_markers(r#"<|python_tag|>f.call()"#));
}

#[test]
fn test_registry_creates_independent_instances() {
    let factory = ParserFactory::new();
    let request = ChatCompletionRequest::new("m");
    let text = "<|python_tag|>ping.call()<|eom_id|>";
    let delta = crate::protocols::StreamingDelta::from_text("", text, text);

    let mut first = factory.create_parser("new_model_json").unwrap();
    assert!(first
        .extract_tool_calls_streaming(delta, &request)
        .unwrap()
        .is_some());

    // A second turn gets its own gate
    let mut second = factory.create_parser("new_model_json").unwrap();
    assert!(second
        .extract_tool_calls_streaming(delta, &request)
        .unwrap()
        .is_some());
}

#[test]
fn test_extracted_info_from_invocation() {
    let mut arguments = Map::new();
    arguments.insert("city".to_string(), json!("Boston"));
    let outcome = ExtractionOutcome::Invocation(Invocation::new("get_weather", arguments));
    assert!(outcome.tools_called());

    let info = ExtractedToolCallInformation::from_outcome(outcome);
    assert!(info.tools_called);
    assert_eq!(info.content, None);
    assert_eq!(info.tool_calls.len(), 1);

    let call = &info.tool_calls[0];
    assert!(call.id.starts_with("call_"));
    assert_eq!(call.tool_type, "function");
    assert_eq!(call.function.name, "get_weather");
    let args: Value = serde_json::from_str(&call.function.arguments).unwrap();
    assert_eq!(args, json!({"city": "Boston"}));
}

#[test]
fn test_extracted_info_from_plain_text() {
    let outcome = ExtractionOutcome::PlainText("hello".to_string());
    assert!(!outcome.tools_called());
    assert!(outcome.invocation().is_none());

    let info = ExtractedToolCallInformation::from_outcome(outcome);
    assert!(!info.tools_called);
    assert!(info.tool_calls.is_empty());
    assert_eq!(info.content.as_deref(), Some("hello"));
}

#[test]
fn test_tool_call_arguments_keep_model_key_order() {
    let mut arguments = Map::new();
    arguments.insert("z".to_string(), json!(1));
    arguments.insert("a".to_string(), json!(2));
    let call = Invocation::new("sort", arguments).to_tool_call();
    assert_eq!(call.function.arguments, r#"{"z":1,"a":2}"#);

    let parser = NewModelParser::new();
    let output = r#"{"name": "sort", "parameters": {"z": 1, "a": 2}}<|eot_id|>"#;
    let info = parser
        .extract_tool_calls(output, &ChatCompletionRequest::new("m"))
        .unwrap();
    assert_eq!(info.tool_calls[0].function.arguments, r#"{"z":1,"a":2}"#);
}

#[test]
fn test_outcome_serialization() {
    let outcome = ExtractionOutcome::Invocation(Invocation::new("ping", Map::new()));
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        value,
        json!({"type": "invocation", "value": {"name": "ping", "arguments": {}}})
    );

    let value = serde_json::to_value(ExtractionOutcome::PlainText("hi".to_string())).unwrap();
    assert_eq!(value, json!({"type": "plain_text", "value": "hi"}));
}

#[test]
fn test_markers() {
    assert_eq!(markers::EOT, "<|eot_id|>");
    assert_eq!(markers::EOM, "<|eom_id|>");
    assert_eq!(markers::PYTHON_TAG, "<|python_tag|>");
    assert_eq!(
        markers::START_ASSISTANT,
        "<|start_header_id|>assistant<|end_header_id|>"
    );
}

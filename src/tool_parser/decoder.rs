use serde_json::{Map, Value};

use crate::tool_parser::{
    errors::{ParserError, ParserResult},
    helpers::{split_top_level, strip_matching_quotes},
    types::{EncodingKind, RawMatch},
};

/// Decode the captured argument text of a match into a name -> value map.
pub fn decode_arguments(raw: &RawMatch) -> ParserResult<Map<String, Value>> {
    decode(raw.kind, &raw.raw_arguments)
}

pub fn decode(kind: EncodingKind, raw_arguments: &str) -> ParserResult<Map<String, Value>> {
    match kind {
        EncodingKind::Structured => decode_structured(raw_arguments),
        EncodingKind::CallSyntax => decode_call_syntax(raw_arguments),
    }
}

/// The `parameters` object of the structured form.
pub fn decode_structured(raw_arguments: &str) -> ParserResult<Map<String, Value>> {
    serde_json::from_str::<Map<String, Value>>(raw_arguments).map_err(|e| {
        ParserError::malformed(format!("parameters are not a valid JSON object: {}", e))
    })
}

/// The `key=value, ...` list of the call form.
///
/// Values starting with `{` or `[` are parsed as JSON. Everything else is a
/// string with one layer of matching quotes removed, so `limit=5` yields
/// `"5"`, not a number.
pub fn decode_call_syntax(raw_arguments: &str) -> ParserResult<Map<String, Value>> {
    let mut arguments = Map::new();
    if raw_arguments.trim().is_empty() {
        return Ok(arguments);
    }

    for piece in split_top_level(raw_arguments, ',') {
        // Tolerate a trailing comma
        if piece.trim().is_empty() {
            continue;
        }

        let (key, value) = piece.split_once('=').ok_or_else(|| {
            ParserError::malformed(format!("argument `{}` has no '='", piece.trim()))
        })?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(ParserError::malformed(format!(
                "argument `{}` has an empty name",
                piece.trim()
            )));
        }

        let value = if value.starts_with('{') || value.starts_with('[') {
            serde_json::from_str::<Value>(value).map_err(|e| {
                ParserError::malformed(format!("argument `{}` is not valid JSON: {}", key, e))
            })?
        } else {
            Value::String(strip_matching_quotes(value).to_string())
        };

        arguments.insert(key.to_string(), value);
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_structured() {
        let args = decode_structured(r#"{"city": "Boston", "days": 3}"#).unwrap();
        assert_eq!(Value::Object(args), json!({"city": "Boston", "days": 3}));
    }

    #[test]
    fn test_decode_structured_invalid() {
        let err = decode_structured("{bad json}").unwrap_err();
        assert!(err.is_malformed_arguments());
    }

    #[test]
    fn test_decode_structured_rejects_non_object() {
        assert!(decode_structured("[1, 2]").unwrap_err().is_malformed_arguments());
    }

    #[test]
    fn test_decode_call_syntax_mixed_types() {
        let args =
            decode_call_syntax(r#"query="rust ownership", limit=5, tags=["lang","safety"]"#)
                .unwrap();
        assert_eq!(
            Value::Object(args),
            json!({"query": "rust ownership", "limit": "5", "tags": ["lang", "safety"]})
        );
    }

    #[test]
    fn test_decode_call_syntax_empty() {
        assert!(decode_call_syntax("").unwrap().is_empty());
        assert!(decode_call_syntax("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_decode_call_syntax_single_quotes_and_objects() {
        let args = decode_call_syntax(r#"name='Ada', opts={"deep": {"x": 1}}"#).unwrap();
        assert_eq!(
            Value::Object(args),
            json!({"name": "Ada", "opts": {"deep": {"x": 1}}})
        );
    }

    #[test]
    fn test_decode_call_syntax_comma_in_quoted_value() {
        let args = decode_call_syntax(r#"city="Paris, France", units=metric"#).unwrap();
        assert_eq!(
            Value::Object(args),
            json!({"city": "Paris, France", "units": "metric"})
        );
    }

    #[test]
    fn test_decode_call_syntax_splits_on_first_equals() {
        let args = decode_call_syntax(r#"expr="a=b""#).unwrap();
        assert_eq!(args["expr"], json!("a=b"));
    }

    #[test]
    fn test_decode_call_syntax_apostrophe_in_bare_value() {
        let args = decode_call_syntax("query=what's new, limit=5").unwrap();
        assert_eq!(
            Value::Object(args),
            json!({"query": "what's new", "limit": "5"})
        );
    }

    #[test]
    fn test_decode_call_syntax_mismatched_closer() {
        let args = decode_call_syntax("a=], b=x)").unwrap();
        assert_eq!(Value::Object(args), json!({"a": "]", "b": "x)"}));
    }

    #[test]
    fn test_decode_keeps_key_order() {
        let args = decode_structured(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let args = decode_call_syntax("zeta=1, alpha=2").unwrap();
        assert_eq!(Value::Object(args).to_string(), r#"{"zeta":"1","alpha":"2"}"#);
    }

    #[test]
    fn test_decode_call_syntax_trailing_comma() {
        let args = decode_call_syntax("a=1,").unwrap();
        assert_eq!(Value::Object(args), json!({"a": "1"}));
    }

    #[test]
    fn test_decode_call_syntax_invalid_json_value() {
        let err = decode_call_syntax("items=[1, 2,]").unwrap_err();
        assert!(err.is_malformed_arguments());
    }

    #[test]
    fn test_decode_call_syntax_missing_equals() {
        let err = decode_call_syntax(r#""positional""#).unwrap_err();
        assert!(err.is_malformed_arguments());
        let err = decode_call_syntax("=1").unwrap_err();
        assert!(err.is_malformed_arguments());
    }

    #[test]
    fn test_decode_dispatches_on_kind() {
        let structured = decode(EncodingKind::Structured, r#"{"a": 1}"#).unwrap();
        assert_eq!(structured["a"], json!(1));
        let call = decode(EncodingKind::CallSyntax, "a=1").unwrap();
        assert_eq!(call["a"], json!("1"));
    }
}

use std::ops::Range;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocols::common::ToolCall;

/// Literal markers of the chat template, matched case-sensitively.
pub mod markers {
    /// End of an assistant turn; terminates the structured JSON form.
    pub const EOT: &str = "<|eot_id|>";
    /// End of a message that expects a tool result; terminates the call form.
    pub const EOM: &str = "<|eom_id|>";
    /// Prefix of the `name.call(...)` form.
    pub const PYTHON_TAG: &str = "<|python_tag|>";
    /// Assistant header. Not used for extraction.
    pub const START_ASSISTANT: &str = "<|start_header_id|>assistant<|end_header_id|>";
}

/// Which surface syntax a tool call was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingKind {
    /// `{"name": "...", "parameters": {...}}`
    Structured,
    /// `<|python_tag|>name.call(key=value, ...)`
    CallSyntax,
}

/// A located but not yet decoded tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub kind: EncodingKind,
    pub name: String,
    /// Argument text exactly as it appeared in the output
    pub raw_arguments: String,
    /// Byte range of the whole call within the searched text
    pub span: Range<usize>,
}

/// A decoded tool invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Convert to the API shape, serializing arguments to a JSON string.
    pub fn to_tool_call(&self) -> ToolCall {
        let arguments = Value::Object(self.arguments.clone()).to_string();
        ToolCall::new(self.name.clone(), arguments)
    }
}

/// Result of a non-streaming extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// A tool call was found
    Invocation(Invocation),
    /// No tool call; the complete model output
    PlainText(String),
}

impl ExtractionOutcome {
    pub fn tools_called(&self) -> bool {
        matches!(self, ExtractionOutcome::Invocation(_))
    }

    pub fn invocation(&self) -> Option<&Invocation> {
        match self {
            ExtractionOutcome::Invocation(invocation) => Some(invocation),
            ExtractionOutcome::PlainText(_) => None,
        }
    }

    pub fn into_invocation(self) -> Option<Invocation> {
        match self {
            ExtractionOutcome::Invocation(invocation) => Some(invocation),
            ExtractionOutcome::PlainText(_) => None,
        }
    }
}

/// Extraction result in the shape API layers consume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedToolCallInformation {
    pub tools_called: bool,
    pub tool_calls: Vec<ToolCall>,
    /// Assistant text; `None` when a tool call was extracted
    pub content: Option<String>,
}

impl ExtractedToolCallInformation {
    pub fn from_outcome(outcome: ExtractionOutcome) -> Self {
        match outcome {
            ExtractionOutcome::Invocation(invocation) => Self {
                tools_called: true,
                tool_calls: vec![invocation.to_tool_call()],
                content: None,
            },
            ExtractionOutcome::PlainText(text) => Self {
                tools_called: false,
                tool_calls: Vec::new(),
                content: Some(text),
            },
        }
    }
}

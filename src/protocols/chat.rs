use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Tool, ToolCall};

fn default_true() -> bool {
    true
}

/// The subset of a chat completion request the tool parser cares about.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,

    #[serde(default)]
    pub messages: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    #[serde(default)]
    pub stream: bool,

    /// Whether special tokens are dropped when detokenizing model output
    #[serde(default = "default_true")]
    pub skip_special_tokens: bool,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: None,
            stream: false,
            skip_special_tokens: true,
        }
    }
}

/// Streaming message fragment emitted once a tool call is complete
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeltaMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl DeltaMessage {
    /// Assistant message with no text content and the given tool calls.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Some("assistant".to_string()),
            content: None,
            tool_calls,
        }
    }
}

/// One streaming evaluation: the text before and after the latest delta.
///
/// Token ids are carried for callers that have them; text parsing only
/// reads the string fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingDelta<'a> {
    pub previous_text: &'a str,
    pub current_text: &'a str,
    pub delta_text: &'a str,
    pub previous_token_ids: &'a [u32],
    pub current_token_ids: &'a [u32],
    pub delta_token_ids: &'a [u32],
}

impl<'a> StreamingDelta<'a> {
    /// Text-only delta, for callers without token ids.
    pub fn from_text(previous_text: &'a str, current_text: &'a str, delta_text: &'a str) -> Self {
        Self {
            previous_text,
            current_text,
            delta_text,
            ..Default::default()
        }
    }
}

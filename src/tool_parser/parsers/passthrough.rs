//! Passthrough parser that returns text unchanged
//!
//! Used as the default for models with no tool call format. Every output is
//! plain assistant text.

use crate::{
    protocols::{ChatCompletionRequest, DeltaMessage, StreamingDelta},
    tool_parser::{errors::ParserResult, traits::ToolParser, types::ExtractionOutcome},
};

#[derive(Debug, Default)]
pub struct PassthroughParser;

impl PassthroughParser {
    pub fn new() -> Self {
        Self
    }
}

impl ToolParser for PassthroughParser {
    fn extract(&self, output: &str) -> ParserResult<ExtractionOutcome> {
        Ok(ExtractionOutcome::PlainText(output.to_string()))
    }

    fn extract_tool_calls_streaming(
        &mut self,
        _delta: StreamingDelta<'_>,
        _request: &ChatCompletionRequest,
    ) -> ParserResult<Option<DeltaMessage>> {
        Ok(None)
    }

    fn has_tool_markers(&self, _text: &str) -> bool {
        false
    }
}

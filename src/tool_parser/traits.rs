use crate::{
    protocols::{ChatCompletionRequest, DeltaMessage, StreamingDelta},
    tool_parser::{
        errors::ParserResult,
        types::{ExtractedToolCallInformation, ExtractionOutcome},
    },
};

/// Core trait for all tool parsers
pub trait ToolParser: Send + Sync {
    /// Adjust the request before generation so the output keeps what this
    /// parser needs to see.
    fn adjust_request(&self, request: ChatCompletionRequest) -> ChatCompletionRequest {
        request
    }

    /// Find the tool call in a complete model output, if any
    fn extract(&self, output: &str) -> ParserResult<ExtractionOutcome>;

    /// Non-streaming extraction in the API shape
    fn extract_tool_calls(
        &self,
        output: &str,
        _request: &ChatCompletionRequest,
    ) -> ParserResult<ExtractedToolCallInformation> {
        Ok(ExtractedToolCallInformation::from_outcome(self.extract(output)?))
    }

    /// Evaluate one streaming delta.
    ///
    /// Returns `Ok(None)` while there is nothing to emit. Parsers keep
    /// per-turn state, so use one instance per streamed turn.
    fn extract_tool_calls_streaming(
        &mut self,
        delta: StreamingDelta<'_>,
        request: &ChatCompletionRequest,
    ) -> ParserResult<Option<DeltaMessage>>;

    /// Check if text contains a tool call in this parser's format
    fn has_tool_markers(&self, text: &str) -> bool;

    /// Reset per-turn state so the instance can serve another turn.
    fn reset(&mut self) {}
}

use crate::{
    protocols::{ChatCompletionRequest, DeltaMessage, StreamingDelta},
    tool_parser::{
        decoder::decode_arguments,
        errors::ParserResult,
        gate::{GateState, ToolCallGate},
        matcher::MatcherChain,
        traits::ToolParser,
        types::{ExtractionOutcome, Invocation},
    },
};

/// Parser for the Llama-style chat template with two call encodings
///
/// Structured JSON, closed by `<|eot_id|>`:
/// ```text
/// {"name": "get_weather", "parameters": {"city": "Boston"}}<|eot_id|>
/// ```
///
/// Call syntax after the python tag, closed by `<|eom_id|>`:
/// ```text
/// <|python_tag|>search.call(query="rust", limit=5)<|eom_id|>
/// ```
///
/// The template emits at most one call per turn, so only the first match is
/// used. Streaming output is withheld until a terminator arrives and is then
/// parsed in one pass.
pub struct NewModelParser {
    matchers: MatcherChain,
    gate: ToolCallGate,
}

impl NewModelParser {
    pub fn new() -> Self {
        Self::with_matchers(MatcherChain::default())
    }

    pub fn with_matchers(matchers: MatcherChain) -> Self {
        Self {
            matchers,
            gate: ToolCallGate::new(),
        }
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }
}

impl Default for NewModelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolParser for NewModelParser {
    /// Detokenization must keep the template's special tokens; the markers
    /// are what the matchers look for.
    fn adjust_request(&self, mut request: ChatCompletionRequest) -> ChatCompletionRequest {
        request.skip_special_tokens = false;
        request
    }

    fn extract(&self, output: &str) -> ParserResult<ExtractionOutcome> {
        let Some(raw) = self.matchers.find_first(output) else {
            tracing::debug!(output_len = output.len(), "no tool call in model output");
            return Ok(ExtractionOutcome::PlainText(output.to_string()));
        };

        tracing::debug!(
            name = %raw.name,
            encoding = ?raw.kind,
            span = ?raw.span,
            "matched tool call"
        );
        let arguments = decode_arguments(&raw)?;
        Ok(ExtractionOutcome::Invocation(Invocation::new(
            raw.name, arguments,
        )))
    }

    fn extract_tool_calls_streaming(
        &mut self,
        delta: StreamingDelta<'_>,
        request: &ChatCompletionRequest,
    ) -> ParserResult<Option<DeltaMessage>> {
        if !self.gate.observe(delta.current_text) {
            return Ok(None);
        }

        let info = self.extract_tool_calls(delta.current_text, request)?;
        if !info.tools_called {
            tracing::warn!(
                model = %request.model,
                "turn terminated without a recognizable tool call"
            );
            return Ok(None);
        }

        Ok(Some(DeltaMessage::assistant_tool_calls(info.tool_calls)))
    }

    fn has_tool_markers(&self, text: &str) -> bool {
        self.matchers.find_first(text).is_some()
    }

    fn reset(&mut self) {
        self.gate.reset();
    }
}

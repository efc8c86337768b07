use thiserror::Error;

/// Result type for tool parser operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Errors that can occur during tool parsing
///
/// A missing tool call is not an error; it is reported as
/// [`ExtractionOutcome::PlainText`](crate::tool_parser::ExtractionOutcome::PlainText).
#[derive(Debug, Error)]
pub enum ParserError {
    /// A call was found but its argument payload could not be decoded.
    #[error("Malformed tool call arguments: {reason}")]
    MalformedArguments { reason: String },

    #[error("Unknown tool parser: {0}")]
    UnknownParser(String),
}

impl ParserError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ParserError::MalformedArguments {
            reason: reason.into(),
        }
    }

    /// True when the model produced a call whose arguments could not be decoded.
    pub fn is_malformed_arguments(&self) -> bool {
        matches!(self, ParserError::MalformedArguments { .. })
    }
}

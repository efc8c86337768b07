/// Tool parser module for extracting a function/tool call from model output
///
/// A [`MatcherChain`] locates the call, the decoder turns its argument text
/// into a JSON map, and in streaming mode a [`ToolCallGate`] defers both
/// until the turn's terminator has been generated.
// Core modules
pub mod decoder;
pub mod errors;
pub mod factory;
pub mod gate;
pub mod helpers;
pub mod matcher;
pub mod traits;
pub mod types;

// Parser implementations
pub mod parsers;

#[cfg(test)]
mod tests;

// Re-export types used outside this module
pub use errors::{ParserError, ParserResult};
pub use factory::{ParserFactory, ParserRegistry};
pub use gate::{GateState, ToolCallGate};
pub use matcher::{CallMatcher, CallSyntaxMatcher, MatcherChain, StructuredMatcher};
pub use parsers::{NewModelParser, PassthroughParser};
pub use traits::ToolParser;
pub use types::{
    markers, EncodingKind, ExtractedToolCallInformation, ExtractionOutcome, Invocation, RawMatch,
};

// OpenAI-compatible shapes the tool parser reads from and writes to.
pub mod chat;
pub mod common;

pub use chat::{ChatCompletionRequest, DeltaMessage, StreamingDelta};
pub use common::{Function, FunctionCall, Tool, ToolCall};

/// Parser implementations for chat-template tool call formats
pub mod new_model;
pub mod passthrough;

pub use new_model::NewModelParser;
pub use passthrough::PassthroughParser;

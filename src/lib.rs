pub mod config;
pub mod logging;
pub mod protocols;
pub mod tool_parser;

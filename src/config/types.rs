use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use super::ConfigResult;

/// Tool parser configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Parser for handling tool-call interactions. Takes precedence over
    /// `model_parsers` when set.
    pub tool_call_parser: Option<String>,
    /// Parser used when neither `tool_call_parser` nor a model mapping applies
    pub default_parser: String,
    /// Model name or `prefix*` pattern to parser name
    pub model_parsers: HashMap<String, String>,
    /// Log level (None = info)
    pub log_level: Option<String>,
    /// Log directory (None = stdout only)
    pub log_dir: Option<String>,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tool_call_parser: None,
            default_parser: "passthrough".to_string(),
            model_parsers: HashMap::new(),
            log_level: None,
            log_dir: None,
            log_json: false,
        }
    }
}

impl ParserConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn with_tool_call_parser(mut self, parser: impl Into<String>) -> Self {
        self.tool_call_parser = Some(parser.into());
        self
    }

    pub fn map_model(mut self, model: impl Into<String>, parser: impl Into<String>) -> Self {
        self.model_parsers.insert(model.into(), parser.into());
        self
    }
}

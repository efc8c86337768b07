// Registry and factory for creating tool parsers by name or model.

use std::collections::HashMap;

use crate::tool_parser::{
    errors::{ParserError, ParserResult},
    parsers::{NewModelParser, PassthroughParser},
    traits::ToolParser,
};

/// Type alias for parser creator functions.
type ParserCreator = Box<dyn Fn() -> Box<dyn ToolParser> + Send + Sync>;

/// Name-to-parser lookup with optional model pattern mappings.
///
/// Parsers hold per-turn state, so every lookup creates a fresh instance.
pub struct ParserRegistry {
    /// Creator functions keyed by parser name
    creators: HashMap<String, ParserCreator>,
    /// Model name or `prefix*` pattern to parser name
    model_mapping: HashMap<String, String>,
    /// Parser used when no model mapping applies
    default_parser: String,
}

impl ParserRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
            model_mapping: HashMap::new(),
            default_parser: "passthrough".to_string(),
        }
    }

    /// Register a parser creator under `name`, replacing any previous one.
    pub fn register_parser<F>(&mut self, name: &str, creator: F)
    where
        F: Fn() -> Box<dyn ToolParser> + Send + Sync + 'static,
    {
        self.creators.insert(name.to_string(), Box::new(creator));
    }

    /// Map a model name/pattern to a parser
    pub fn map_model(&mut self, model: impl Into<String>, parser: impl Into<String>) {
        self.model_mapping.insert(model.into(), parser.into());
    }

    pub fn has_parser(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// Create a parser by exact name.
    pub fn create_parser(&self, name: &str) -> ParserResult<Box<dyn ToolParser>> {
        self.creators
            .get(name)
            .map(|creator| creator())
            .ok_or_else(|| ParserError::UnknownParser(name.to_string()))
    }

    /// Parser name for a model: exact mapping first, then the longest
    /// matching `prefix*` pattern, then the default.
    pub fn resolve_parser_name(&self, model: &str) -> &str {
        if let Some(parser_name) = self.model_mapping.get(model) {
            return parser_name;
        }

        let best_match = self
            .model_mapping
            .iter()
            .filter(|(pattern, _)| {
                pattern
                    .strip_suffix('*')
                    .is_some_and(|prefix| model.starts_with(prefix))
            })
            .max_by_key(|(pattern, _)| pattern.len());

        match best_match {
            Some((_, parser_name)) => parser_name,
            None => &self.default_parser,
        }
    }

    /// Create a parser for a model.
    pub fn create_for_model(&self, model: &str) -> ParserResult<Box<dyn ToolParser>> {
        let name = self.resolve_parser_name(model);
        tracing::debug!(model, parser = name, "resolved tool parser");
        self.create_parser(name)
    }

    pub fn set_default_parser(&mut self, name: impl Into<String>) {
        self.default_parser = name.into();
    }

    pub fn default_parser(&self) -> &str {
        &self.default_parser
    }

    /// Registered parser names, sorted
    pub fn list_parsers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.creators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn list_mappings(&self) -> Vec<(&str, &str)> {
        self.model_mapping
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory with the built-in parsers registered.
pub struct ParserFactory {
    registry: ParserRegistry,
}

impl ParserFactory {
    pub const NEW_MODEL_JSON: &'static str = "new_model_json";
    pub const PASSTHROUGH: &'static str = "passthrough";

    /// Create a new factory with default parsers registered.
    pub fn new() -> Self {
        let mut registry = ParserRegistry::new();
        registry.register_parser(Self::PASSTHROUGH, || Box::new(PassthroughParser::new()));
        registry.register_parser(Self::NEW_MODEL_JSON, || Box::new(NewModelParser::new()));
        registry.set_default_parser(Self::PASSTHROUGH);
        Self { registry }
    }

    /// Create a fresh parser for the given model, falling back to the default parser.
    pub fn create_for_model(&self, model: &str) -> ParserResult<Box<dyn ToolParser>> {
        self.registry.create_for_model(model)
    }

    pub fn create_parser(&self, name: &str) -> ParserResult<Box<dyn ToolParser>> {
        self.registry.create_parser(name)
    }

    /// Get the internal registry for lookups.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Get the internal registry for custom registration.
    pub fn registry_mut(&mut self) -> &mut ParserRegistry {
        &mut self.registry
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

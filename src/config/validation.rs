use tracing::Level;

use super::*;
use crate::tool_parser::{ParserFactory, ParserRegistry, ToolParser};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate against the parsers registered in `registry`.
    pub fn validate(config: &ParserConfig, registry: &ParserRegistry) -> ConfigResult<()> {
        if let Some(parser) = &config.tool_call_parser {
            Self::validate_parser_name("tool_call_parser", parser, registry)?;
        }

        Self::validate_parser_name("default_parser", &config.default_parser, registry)?;

        for (model, parser) in &config.model_parsers {
            if model.is_empty() || model == "*" {
                return Err(ConfigError::InvalidValue {
                    field: "model_parsers".to_string(),
                    value: model.clone(),
                    reason: "Model pattern must name a model or prefix".to_string(),
                });
            }
            Self::validate_parser_name(&format!("model_parsers.{}", model), parser, registry)?;
        }

        if let Some(level) = &config.log_level {
            parse_log_level(level)?;
        }

        if let Some(dir) = &config.log_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log_dir".to_string(),
                    value: dir.clone(),
                    reason: "Must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_parser_name(
        field: &str,
        parser: &str,
        registry: &ParserRegistry,
    ) -> ConfigResult<()> {
        if parser.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: field.to_string(),
            });
        }
        if !registry.has_parser(parser) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: parser.to_string(),
                reason: format!(
                    "Unknown parser, expected one of: {}",
                    registry.list_parsers().join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Parse a log level name (case-insensitive)
pub fn parse_log_level(level: &str) -> ConfigResult<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(ConfigError::InvalidValue {
            field: "log_level".to_string(),
            value: level.to_string(),
            reason: "Must be one of trace, debug, info, warn, error".to_string(),
        }),
    }
}

impl ParserConfig {
    /// Build a factory whose registry reflects this config, after validating it.
    pub fn build_factory(&self) -> ConfigResult<ParserFactory> {
        let mut factory = ParserFactory::new();
        ConfigValidator::validate(self, factory.registry())?;

        let registry = factory.registry_mut();
        for (model, parser) in &self.model_parsers {
            registry.map_model(model.clone(), parser.clone());
        }
        registry.set_default_parser(self.default_parser.clone());
        Ok(factory)
    }

    /// Create the parser for one turn of `model`.
    pub fn create_parser(
        &self,
        factory: &ParserFactory,
        model: &str,
    ) -> ConfigResult<Box<dyn ToolParser>> {
        let parser = match &self.tool_call_parser {
            Some(name) => factory.create_parser(name),
            None => factory.create_for_model(model),
        };
        parser.map_err(|e| ConfigError::ValidationFailed {
            reason: e.to_string(),
        })
    }
}

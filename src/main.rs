use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use chat_tool_parser::{
    config::ParserConfig,
    logging::{self, LoggingConfig},
    protocols::{ChatCompletionRequest, StreamingDelta},
    tool_parser::ToolParser,
};
use clap::Parser;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "chat-tool-parser")]
#[command(about = "Extract the tool call from a chat-template model output")]
#[command(long_about = r#"
Extract the tool call from a chat-template model output

Reads the model output from a file or stdin and prints the extraction result
as JSON on stdout.

Examples:
  # Parse a complete output with the two-encoding parser
  chat-tool-parser --tool-call-parser new_model_json output.txt

  # Replay the output as 4-character deltas through the streaming path
  echo '<|python_tag|>search.call(q="x")<|eom_id|>' | \
    chat-tool-parser --tool-call-parser new_model_json --stream --chunk-size 4
"#)]
struct CliArgs {
    /// File containing the model output (stdin if omitted)
    input: Option<PathBuf>,

    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parser to use regardless of model
    #[arg(long)]
    tool_call_parser: Option<String>,

    /// Model name used to pick a parser from the config's model mappings
    #[arg(long, default_value = "default")]
    model: String,

    /// Feed the output through the streaming path
    #[arg(long, default_value_t = false)]
    stream: bool,

    /// Characters per streamed delta
    #[arg(long, default_value_t = 1)]
    chunk_size: usize,

    /// Log level
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// Directory to store log files
    #[arg(long)]
    log_dir: Option<String>,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

impl CliArgs {
    fn to_parser_config(&self) -> anyhow::Result<ParserConfig> {
        let mut config = match &self.config {
            Some(path) => ParserConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ParserConfig::default(),
        };

        if let Some(parser) = &self.tool_call_parser {
            config.tool_call_parser = Some(parser.clone());
        }
        if self.log_level.is_some() {
            config.log_level = self.log_level.clone();
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir.clone();
        }
        config.log_json |= self.log_json;
        Ok(config)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display())),
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("reading stdin")?;
                Ok(text)
            }
        }
    }
}

/// Split `text` into deltas of at most `chunk_size` characters.
fn char_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

fn run_streaming(
    parser: &mut dyn ToolParser,
    request: &ChatCompletionRequest,
    text: &str,
    chunk_size: usize,
) -> anyhow::Result<serde_json::Value> {
    let mut events = Vec::new();
    let mut end = 0;
    for (index, chunk) in char_chunks(text, chunk_size).into_iter().enumerate() {
        let previous = &text[..end];
        end += chunk.len();
        let delta = StreamingDelta::from_text(previous, &text[..end], chunk);
        if let Some(message) = parser.extract_tool_calls_streaming(delta, request)? {
            events.push(json!({ "delta_index": index, "message": message }));
        }
    }
    Ok(json!({ "events": events }))
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.to_parser_config()?;

    let _log_guard = logging::init_logging(LoggingConfig::from_parser_config(&config)?);

    let factory = config.build_factory()?;
    let mut parser = config.create_parser(&factory, &args.model)?;

    let mut request = ChatCompletionRequest::new(args.model.clone());
    request.stream = args.stream;
    let request = parser.adjust_request(request);

    let text = args.read_input()?;
    tracing::info!(
        model = %request.model,
        stream = request.stream,
        input_len = text.len(),
        "parsing model output"
    );

    let output = if args.stream {
        run_streaming(parser.as_mut(), &request, &text, args.chunk_size)?
    } else {
        serde_json::to_value(parser.extract_tool_calls(&text, &request)?)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

//! Locating a tool call in model output.
//!
//! Each [`CallMatcher`] recognises one surface syntax. A [`MatcherChain`]
//! tries its matchers in order and stops at the first hit, so the structured
//! JSON form wins over the call form when both appear.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tool_parser::{
    helpers::find_closing_delimiter,
    types::{EncodingKind, RawMatch},
};

/// Head of the structured form, up to and including the `{` that opens `parameters`.
static STRUCTURED_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\s*"name"\s*:\s*"(?P<name>[^"]+)"\s*,\s*"parameters"\s*:\s*\{"#)
        .expect("Valid regex pattern")
});

/// Head of the call form, up to and including the opening parenthesis.
static CALL_SYNTAX_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\|python_tag\|>(?P<name>\w+)\.call\(").expect("Valid regex pattern")
});

/// A strategy that finds the first call of one encoding in a text
pub trait CallMatcher: Send + Sync {
    fn kind(&self) -> EncodingKind;

    /// Find the first occurrence in `text`, searching anywhere.
    fn find(&self, text: &str) -> Option<RawMatch>;
}

/// Matches `{"name": "<name>", "parameters": {...}}`
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredMatcher;

impl StructuredMatcher {
    pub fn new() -> Self {
        Self
    }

    /// End of the `parameters` object starting at `params_start`.
    ///
    /// Prefers the brace that balances the object. When the object never
    /// balances, falls back to the first `}}` so the call is still reported
    /// and the broken payload surfaces as a decode error.
    fn parameters_end(text: &str, params_start: usize) -> Option<usize> {
        if let Some(close) = find_closing_delimiter(text, params_start, &['"']) {
            return Some(close);
        }
        text[params_start + 1..]
            .find("}}")
            .map(|offset| params_start + 1 + offset)
    }
}

impl CallMatcher for StructuredMatcher {
    fn kind(&self) -> EncodingKind {
        EncodingKind::Structured
    }

    fn find(&self, text: &str) -> Option<RawMatch> {
        for caps in STRUCTURED_HEAD.captures_iter(text) {
            let (Some(head), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let params_start = head.end() - 1;
            let Some(params_end) = Self::parameters_end(text, params_start) else {
                continue;
            };

            // The object holding name and parameters must close right after them.
            let rest = &text[params_end + 1..];
            let trimmed = rest.trim_start();
            if !trimmed.starts_with('}') {
                continue;
            }
            let outer_end = params_end + 1 + (rest.len() - trimmed.len()) + 1;

            return Some(RawMatch {
                kind: self.kind(),
                name: name.as_str().to_string(),
                raw_arguments: text[params_start..=params_end].to_string(),
                span: head.start()..outer_end,
            });
        }
        None
    }
}

/// Matches `<|python_tag|><name>.call(<args>)`
#[derive(Debug, Default, Clone, Copy)]
pub struct CallSyntaxMatcher;

impl CallSyntaxMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl CallMatcher for CallSyntaxMatcher {
    fn kind(&self) -> EncodingKind {
        EncodingKind::CallSyntax
    }

    fn find(&self, text: &str) -> Option<RawMatch> {
        for caps in CALL_SYNTAX_HEAD.captures_iter(text) {
            let (Some(head), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let open_idx = head.end() - 1;

            // Quoted or bracketed parentheses do not close the call. If the
            // text never balances, the first ')' does.
            let close_idx = find_closing_delimiter(text, open_idx, &['"', '\''])
                .or_else(|| text[head.end()..].find(')').map(|off| head.end() + off));
            let Some(close_idx) = close_idx else {
                continue;
            };

            return Some(RawMatch {
                kind: self.kind(),
                name: name.as_str().to_string(),
                raw_arguments: text[head.end()..close_idx].to_string(),
                span: head.start()..close_idx + 1,
            });
        }
        None
    }
}

/// Ordered list of matchers; the first to match wins
pub struct MatcherChain {
    matchers: Vec<Box<dyn CallMatcher>>,
}

impl MatcherChain {
    pub fn new(matchers: Vec<Box<dyn CallMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn find_first(&self, text: &str) -> Option<RawMatch> {
        self.matchers.iter().find_map(|matcher| matcher.find(text))
    }
}

impl Default for MatcherChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(StructuredMatcher::new()),
            Box::new(CallSyntaxMatcher::new()),
        ])
    }
}

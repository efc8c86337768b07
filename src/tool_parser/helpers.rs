/// What a single character meant to a [`DelimiterScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Part of a string literal, including its quotes
    Quoted,
    Open,
    Close,
    Other,
}

/// Character-at-a-time tracker for nested delimiters and string literals.
///
/// A quote opens a string only at the start of a value (after `=`) or inside
/// a `[`/`{` value, so apostrophes in bare words stay ordinary characters.
/// A closer only pops the opener it matches; any other closer is ordinary.
struct DelimiterScanner<'q> {
    quotes: &'q [char],
    closers: Vec<char>,
    in_string: Option<char>,
    escape_next: bool,
    value_start: bool,
}

impl<'q> DelimiterScanner<'q> {
    fn new(quotes: &'q [char]) -> Self {
        Self {
            quotes,
            closers: Vec::new(),
            in_string: None,
            escape_next: false,
            value_start: false,
        }
    }

    fn depth(&self) -> usize {
        self.closers.len()
    }

    fn step(&mut self, ch: char) -> Step {
        if let Some(quote) = self.in_string {
            if self.escape_next {
                self.escape_next = false;
            } else if ch == '\\' {
                self.escape_next = true;
            } else if ch == quote {
                self.in_string = None;
            }
            return Step::Quoted;
        }

        let in_json = matches!(self.closers.last(), Some(']' | '}'));
        if self.quotes.contains(&ch) && (self.value_start || in_json) {
            self.in_string = Some(ch);
            self.value_start = false;
            return Step::Quoted;
        }
        if ch.is_whitespace() {
            return Step::Other;
        }
        self.value_start = ch == '=' && !in_json;

        match ch {
            '(' => self.closers.push(')'),
            '[' => self.closers.push(']'),
            '{' => self.closers.push('}'),
            ')' | ']' | '}' if self.closers.last() == Some(&ch) => {
                self.closers.pop();
                return Step::Close;
            }
            _ => return Step::Other,
        }
        Step::Open
    }
}

/// Find the delimiter closing the one at `open_idx`.
///
/// Delimiters inside string literals opened by one of `quotes` are ignored;
/// backslash escapes the next character inside a string. Returns the byte
/// index of the closing delimiter, or `None` if the text ends first or
/// `open_idx` is not an opening delimiter.
pub fn find_closing_delimiter(text: &str, open_idx: usize, quotes: &[char]) -> Option<usize> {
    let mut scanner = DelimiterScanner::new(quotes);
    let mut chars = text.get(open_idx..)?.char_indices();

    let (_, first) = chars.next()?;
    if scanner.step(first) != Step::Open {
        return None;
    }

    chars
        .find(|&(_, ch)| scanner.step(ch) == Step::Close && scanner.depth() == 0)
        .map(|(offset, _)| open_idx + offset)
}

/// Split on `separator` where it is outside brackets and quoted strings.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut scanner = DelimiterScanner::new(&['"', '\'']);
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if scanner.step(ch) == Step::Other && ch == separator && scanner.depth() == 0 {
            pieces.push(&text[start..idx]);
            start = idx + ch.len_utf8();
        }
    }

    pieces.push(&text[start..]);
    pieces
}

/// Remove one layer of matching `"` or `'` quotes.
pub fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

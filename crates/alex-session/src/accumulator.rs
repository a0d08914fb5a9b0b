use std::collections::BTreeSet;

use alex_core::SessionConfig;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChange {
    Increased,
    Decreased,
    Unchanged,
    /// A closing token at level zero. The level stays at zero.
    Underflow,
}

/// Token rules deciding how a line shifts the continuation indent.
#[derive(Debug, Clone)]
pub struct IndentRules {
    step: usize,
    first_tokens: BTreeSet<String>,
    last_tokens: BTreeSet<String>,
    dedent_tokens: BTreeSet<String>,
    trailing_word: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shift {
    Open,
    Close,
    Keep,
}

impl IndentRules {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            step: config.indent_spaces,
            first_tokens: config.indent_first_tokens.clone(),
            last_tokens: config.indent_last_tokens.clone(),
            dedent_tokens: config.dedent_last_tokens.clone(),
            trailing_word: Regex::new(r"(\w+)\s*$").expect("trailing word regex should compile"),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    fn first_token<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.split_whitespace().next()
    }

    fn last_token<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.trailing_word
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|token| token.as_str())
    }

    fn shift(&self, line: &str) -> Shift {
        let first = self.first_token(line);
        let last = self.last_token(line);

        let opens_first = first.is_some_and(|token| self.first_tokens.contains(token));
        let opens_last = last.is_some_and(|token| self.last_tokens.contains(token));
        if opens_first || opens_last {
            return Shift::Open;
        }
        if last.is_some_and(|token| self.dedent_tokens.contains(token)) {
            return Shift::Close;
        }
        Shift::Keep
    }
}

/// Collects the lines of one statement and tracks the indent to show before the
/// next continuation line. The buffer, not the displayed indent, is what gets
/// evaluated.
#[derive(Debug)]
pub struct InputAccumulator<'a> {
    rules: &'a IndentRules,
    buffer: String,
    lines: usize,
    level: usize,
}

impl<'a> InputAccumulator<'a> {
    pub fn new(rules: &'a IndentRules) -> Self {
        Self {
            rules,
            buffer: String::new(),
            lines: 0,
            level: 0,
        }
    }

    pub fn append(&mut self, raw_line: &str) -> IndentChange {
        let line = raw_line.trim_end_matches(['\r', '\n']);
        if self.lines > 0 {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
        self.lines += 1;

        match self.rules.shift(line) {
            Shift::Open => {
                self.level += self.rules.step;
                IndentChange::Increased
            }
            Shift::Close if self.level == 0 => {
                tracing::warn!(line, "unmatched closing token; indent stays at zero");
                IndentChange::Underflow
            }
            Shift::Close => {
                self.level -= self.rules.step;
                IndentChange::Decreased
            }
            Shift::Keep => IndentChange::Unchanged,
        }
    }

    pub fn current_indent(&self) -> String {
        " ".repeat(self.level)
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.lines = 0;
        self.level = 0;
    }

    pub fn into_buffer(self) -> String {
        self.buffer
    }
}

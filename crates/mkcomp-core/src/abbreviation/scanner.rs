//! Character cursor shared by the abbreviation tokenizer
//!
//! Offsets are character indices into the source string, which is also what
//! every [`AbbreviationError`] reports.

use super::error::{AbbreviationError, AbbreviationErrorKind};

/// Cursor over a string with `peek`/`next`/`eat` primitives.
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    /// Start of the span returned by [`Scanner::current`]
    pub start: usize,
    /// Current read position
    pub pos: usize,
    end: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let end = chars.len();
        Self {
            chars,
            start: 0,
            pos: 0,
            end,
        }
    }

    /// Restrict scanning to `[start, end)`.
    pub fn with_bounds(text: &str, start: usize, end: usize) -> Self {
        let mut scanner = Self::new(text);
        scanner.end = end.min(scanner.chars.len());
        scanner.start = start.min(scanner.end);
        scanner.pos = scanner.start;
        scanner
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Character at the current position.
    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Character `offset` positions after the current one.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        let ix = self.pos + offset;
        if ix < self.end {
            self.chars.get(ix).copied()
        } else {
            None
        }
    }

    /// Character at an absolute index, ignoring the scan bounds.
    pub fn char_at(&self, ix: usize) -> Option<char> {
        self.chars.get(ix).copied()
    }

    /// Consume and return the current character.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        self.eat_if(|ch| ch == expected)
    }

    /// Consume the current character if it matches `pred`.
    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume characters while `pred` holds. Returns `true` if at least one
    /// character was consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let start = self.pos;
        while self.eat_if(&pred) {}
        self.pos != start
    }

    /// Move the cursor back by `n` characters.
    pub fn back_up(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    /// Text between `start` and the current position.
    pub fn current(&self) -> String {
        self.substring(self.start, self.pos)
    }

    pub fn substring(&self, from: usize, to: usize) -> String {
        let to = to.min(self.chars.len());
        let from = from.min(to);
        self.chars[from..to].iter().collect()
    }

    /// Build an error located at the current position.
    pub fn error(
        &self,
        kind: AbbreviationErrorKind,
        message: impl Into<String>,
    ) -> AbbreviationError {
        AbbreviationError::new(kind, message, Some(self.pos))
    }
}

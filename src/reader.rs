//! Character-cursor reader over a selector expression.
//!
//! [`Cursor`] is the only way the rest of the crate looks at input text: a
//! byte-indexed position over a borrowed `&str` with peek/read/rollback and a
//! handful of token readers (unquoted strings, quoted strings, numbers,
//! booleans). Every reader keeps the cursor untouched on failure paths where
//! the caller is documented to re-anchor, so error positions stay meaningful.
//!
//! Positions are byte offsets; `set_cursor` with an offset saved from
//! [`cursor`](Cursor::cursor) is always valid since saved offsets sit on char
//! boundaries.

use crate::error::{ParseError, ParseErrorKind};

const SYNTAX_ESCAPE: char = '\\';

/// Cursor over one selector expression.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

/// True for characters that may appear in a number token: digits, sign and
/// decimal point.
pub(crate) fn is_allowed_number(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == '.'
}

/// True for characters allowed in an unquoted string token.
fn is_allowed_unquoted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// The complete underlying input.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Roll the cursor back (or forward) to a previously saved offset.
    pub fn set_cursor(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Unconsumed remainder of the input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn can_read(&self) -> bool {
        self.pos < self.input.len()
    }

    /// True when at least `n` bytes remain.
    pub fn can_read_n(&self, n: usize) -> bool {
        self.pos + n <= self.input.len()
    }

    /// True when the remainder starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consume and return the next character.
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character, discarding it.
    pub fn skip(&mut self) {
        self.read();
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.skip();
        }
    }

    /// Consume `expected` or fail with `ExpectedChar` at the current position.
    pub fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.skip();
            Ok(())
        } else {
            Err(ParseError::at(ParseErrorKind::ExpectedChar(expected), self))
        }
    }

    /// Read a run of unquoted-string characters. May be empty.
    pub fn read_unquoted_string(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(is_allowed_unquoted) {
            self.skip();
        }
        &input[start..self.pos]
    }

    /// Read either a quoted string (with `\` escapes) or an unquoted token.
    pub fn read_string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(q) if is_quote(q) => {
                self.skip();
                self.read_quoted_body(q)
            }
            _ => Ok(self.read_unquoted_string().to_string()),
        }
    }

    fn read_quoted_body(&mut self, quote: char) -> Result<String, ParseError> {
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == SYNTAX_ESCAPE {
                escaped = true;
            } else if c == quote {
                return Ok(out);
            } else {
                out.push(c);
            }
        }
        Err(ParseError::at(ParseErrorKind::UnterminatedQuote, self))
    }

    /// Read an `i32`. Empty input fails with `ExpectedInt`; a malformed number
    /// fails with `InvalidInt` and rolls the cursor back to the token start.
    pub fn read_int(&mut self) -> Result<i32, ParseError> {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(is_allowed_number) {
            self.skip();
        }
        let text = &input[start..self.pos];
        if text.is_empty() {
            return Err(ParseError::at(ParseErrorKind::ExpectedInt, self));
        }
        text.parse().map_err(|_| {
            self.pos = start;
            ParseError::at(ParseErrorKind::InvalidInt(text.to_string()), self)
        })
    }

    /// Read an `f64`, with the same failure contract as [`read_int`](Self::read_int).
    pub fn read_float(&mut self) -> Result<f64, ParseError> {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(is_allowed_number) {
            self.skip();
        }
        let text = &input[start..self.pos];
        if text.is_empty() {
            return Err(ParseError::at(ParseErrorKind::ExpectedFloat, self));
        }
        text.parse().map_err(|_| {
            self.pos = start;
            ParseError::at(ParseErrorKind::InvalidFloat(text.to_string()), self)
        })
    }

    /// Read `true` or `false`.
    pub fn read_boolean(&mut self) -> Result<bool, ParseError> {
        let start = self.pos;
        let text = self.read_unquoted_string();
        if text.is_empty() {
            return Err(ParseError::at(ParseErrorKind::ExpectedBool, self));
        }
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => {
                self.pos = start;
                Err(ParseError::at(ParseErrorKind::InvalidBool(text.to_string()), self))
            }
        }
    }
}

//! Parse failure taxonomy.
//!
//! Every failure in the crate is a [`ParseError`]: a kind, the full input text
//! and the cursor position the error points at. That is enough for a caller to
//! re-render a caret under the offending character; the `Display` impl shows a
//! brigadier-style `<--[HERE]` excerpt.
//!
//! Errors are plain values propagated with `?`. Nothing in this crate retries
//! or aborts; the host decides whether to re-prompt the user.

use crate::reader::Cursor;

/// How much of the input to echo before the `<--[HERE]` marker.
const CONTEXT_CHARS: usize = 10;

/// Everything that can go wrong while parsing a selector expression.
///
/// The first group mirrors the selector grammar; the trailing group are
/// low-level reader failures surfaced by [`Cursor`](crate::reader::Cursor).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected at least one bound for range")]
    EmptyRange,
    #[error("range minimum cannot be bigger than maximum")]
    SwappedRange,
    #[error("missing selector type")]
    MissingSelectorBody,
    #[error("unknown selector type '{0}'")]
    UnknownSelectorType(String),
    #[error("selector not allowed here")]
    SelectorNotAllowed,
    #[error("expected ']' to close options")]
    UnterminatedOptions,
    #[error("expected value for option '{0}'")]
    ValuelessOption(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' isn't applicable here")]
    InapplicableOption(String),
    #[error("invalid or irreversible sort order '{0}'")]
    IrreversibleSort(String),
    #[error("invalid game mode '{0}'")]
    InvalidGameMode(String),
    #[error("invalid entity type '{0}'")]
    InvalidEntityType(String),
    #[error("invalid entity name or UUID")]
    InvalidEntity,
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("distance cannot be negative")]
    NegativeDistance,
    #[error("level cannot be negative")]
    NegativeLevel,
    #[error("limit must be at least 1")]
    LimitTooSmall,

    #[error("expected integer")]
    ExpectedInt,
    #[error("invalid integer '{0}'")]
    InvalidInt(String),
    #[error("expected float")]
    ExpectedFloat,
    #[error("invalid float '{0}'")]
    InvalidFloat(String),
    #[error("expected boolean")]
    ExpectedBool,
    #[error("invalid boolean '{0}'")]
    InvalidBool(String),
    #[error("expected '{0}'")]
    ExpectedChar(char),
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

impl ParseErrorKind {
    /// Stable translation key for this kind. The crate never formats final
    /// user-facing strings itself; a localizing host dispatches on this key
    /// and the `Display` arguments.
    pub fn translation_key(&self) -> &'static str {
        use ParseErrorKind::*;
        match self {
            EmptyRange => "argument.range.empty",
            SwappedRange => "argument.range.swapped",
            MissingSelectorBody => "argument.entity.selector.missing",
            UnknownSelectorType(_) => "argument.entity.selector.unknown",
            SelectorNotAllowed => "argument.entity.selector.not_allowed",
            UnterminatedOptions => "argument.entity.options.unterminated",
            ValuelessOption(_) => "argument.entity.options.valueless",
            UnknownOption(_) => "argument.entity.options.unknown",
            InapplicableOption(_) => "argument.entity.options.inapplicable",
            IrreversibleSort(_) => "argument.entity.options.sort.irreversible",
            InvalidGameMode(_) => "argument.entity.options.mode.invalid",
            InvalidEntityType(_) => "argument.entity.options.type.invalid",
            InvalidEntity => "argument.entity.invalid",
            InvalidIdentifier(_) => "argument.id.invalid",
            NegativeDistance => "argument.entity.options.distance.negative",
            NegativeLevel => "argument.entity.options.level.negative",
            LimitTooSmall => "argument.entity.options.limit.toosmall",
            ExpectedInt => "parsing.int.expected",
            InvalidInt(_) => "parsing.int.invalid",
            ExpectedFloat => "parsing.float.expected",
            InvalidFloat(_) => "parsing.float.invalid",
            ExpectedBool => "parsing.bool.expected",
            InvalidBool(_) => "parsing.bool.invalid",
            ExpectedChar(_) => "parsing.expected",
            UnterminatedQuote => "parsing.quote.expected.end",
        }
    }
}

/// A parse failure anchored to a position in the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    input: String,
    cursor: usize,
}

impl ParseError {
    /// Build an error pointing at the cursor's current position.
    pub(crate) fn at(kind: ParseErrorKind, cursor: &Cursor) -> Self {
        Self::at_pos(kind, cursor, cursor.cursor())
    }

    /// Build an error pointing at an explicit position (used when the anchor
    /// is the start of a token rather than wherever reading stopped).
    pub(crate) fn at_pos(kind: ParseErrorKind, cursor: &Cursor, pos: usize) -> Self {
        ParseError { kind, input: cursor.input().to_string(), cursor: pos }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The complete input text the error was raised against.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset into [`input`](Self::input) the error points at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Re-anchor the error at `pos`. Range sub-parses use this so the caller
    /// sees the start of the malformed range, not a mid-token offset.
    pub(crate) fn with_cursor(mut self, pos: usize) -> Self {
        self.cursor = pos;
        self
    }

    /// The input excerpt leading up to the error position, truncated to a few
    /// characters with a leading ellipsis.
    pub fn context(&self) -> String {
        let upto = self.cursor.min(self.input.len());
        let head = &self.input[..upto];
        let tail_start = head
            .char_indices()
            .rev()
            .nth(CONTEXT_CHARS - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);
        if tail_start > 0 { format!("...{}", &head[tail_start..]) } else { head.to_string() }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}: {}<--[HERE]", self.kind, self.cursor, self.context())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Cursor;

    #[test]
    fn display_includes_context_and_marker() {
        let mut cursor = Cursor::new("@e[limit=0]");
        cursor.set_cursor(9);
        let err = ParseError::at(ParseErrorKind::LimitTooSmall, &cursor);
        let rendered = err.to_string();
        assert!(rendered.contains("limit must be at least 1"));
        assert!(rendered.contains("@e[limit=<--[HERE]"));
        assert_eq!(err.cursor(), 9);
    }

    #[test]
    fn context_truncates_long_prefixes() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let mut cursor = Cursor::new(text);
        cursor.set_cursor(text.len());
        let err = ParseError::at(ParseErrorKind::UnterminatedOptions, &cursor);
        assert_eq!(err.context(), "...qrstuvwxyz");
    }

    #[test]
    fn translation_keys_are_stable() {
        assert_eq!(ParseErrorKind::EmptyRange.translation_key(), "argument.range.empty");
        assert_eq!(
            ParseErrorKind::UnknownOption("bogus".into()).translation_key(),
            "argument.entity.options.unknown"
        );
    }
}

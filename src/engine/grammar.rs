//! The selector grammar.
//!
//! `SelectorParser` drives one forward pass over the input: selector prefix,
//! variant character, then the bracketed option list with per-key dispatch
//! into the option table. The parser owns the cursor and the growing
//! [`SelectorState`]; option handlers receive the whole parser mutably so the
//! cursor and state never alias.
//!
//! Two disciplines hold everywhere:
//!
//! - **Rollback anchors.** Whoever raises an error first rolls the cursor
//!   back to the start of the offending token and anchors the error there.
//!   The outermost [`parse`](SelectorParser::parse) additionally resets the
//!   cursor to the expression start, so a failed call leaves the cursor where
//!   it began while the error keeps its own position.
//! - **Suggestion rebinding.** At every position where the set of valid next
//!   tokens changes, the parser swaps in a fresh completion provider. The
//!   provider captures whatever state it needs by value, so a later
//!   [`suggest`](SelectorParser::suggest) call is a pure read.

use uuid::Uuid;

use super::options;
use super::state::{SelectorState, StateFlags};
use super::suggest::{Suggestion, SuggestionFn, SuggestionsBuilder};
use super::{debug_enabled, suggest_matching};
use crate::Sorter;
use crate::api::CompiledSelector;
use crate::error::{ParseError, ParseErrorKind};
use crate::reader::Cursor;
use crate::text::Message;

const SELECTOR_PREFIX: char = '@';
const OPTIONS_OPENING: char = '[';
const OPTIONS_CLOSING: char = ']';
const OPTION_DEFINER: char = '=';
const OPTION_SEPARATOR: char = ',';

/// Maximum accepted length of a bare player name.
const MAX_NAME_LENGTH: usize = 16;

/// Recursive-descent parser for one selector expression.
pub struct SelectorParser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) state: SelectorState,
    at_allowed: bool,
    suggestor: SuggestionFn,
    suggestion_start: usize,
}

impl<'a> SelectorParser<'a> {
    /// Parser over `input` with `@` selectors permitted.
    pub fn new(input: &'a str) -> Self {
        Self::with_at_allowed(input, true)
    }

    /// Parser over `input`; `at_allowed = false` restricts the grammar to
    /// bare names and UUIDs, for argument positions where `@` selectors are
    /// forbidden.
    pub fn with_at_allowed(input: &'a str, at_allowed: bool) -> Self {
        SelectorParser {
            cursor: Cursor::new(input),
            state: SelectorState::new(),
            at_allowed,
            suggestor: Box::new(|_| {}),
            suggestion_start: 0,
        }
    }

    /// Parse the whole expression into a [`CompiledSelector`].
    ///
    /// On failure the cursor is reset to where the expression began; the
    /// returned error carries its own anchor position.
    pub fn parse(&mut self) -> Result<CompiledSelector, ParseError> {
        let start = self.cursor.cursor();
        self.state = SelectorState::new();
        self.bind_selector_suggestor(start);
        match self.parse_inner() {
            Ok(()) => Ok(CompiledSelector::from_state(std::mem::take(&mut self.state))),
            Err(err) => {
                self.cursor.set_cursor(start);
                Err(err)
            }
        }
    }

    fn parse_inner(&mut self) -> Result<(), ParseError> {
        if self.cursor.peek() == Some(SELECTOR_PREFIX) {
            let at_pos = self.cursor.cursor();
            if !self.at_allowed {
                return Err(ParseError::at_pos(
                    ParseErrorKind::SelectorNotAllowed,
                    &self.cursor,
                    at_pos,
                ));
            }
            self.cursor.skip();
            self.read_shorthand(at_pos)
        } else {
            self.read_regular()
        }
    }

    /// `@` has been consumed; read the variant character and its option list.
    fn read_shorthand(&mut self, at_pos: usize) -> Result<(), ParseError> {
        self.state.flags |= StateFlags::USES_SHORTHAND;
        self.bind_shorthand_suggestor(at_pos);
        let class_pos = self.cursor.cursor();
        let Some(class) = self.cursor.read() else {
            return Err(ParseError::at(ParseErrorKind::MissingSelectorBody, &self.cursor));
        };
        match class {
            'p' => {
                self.state.limit = 1;
                self.state.sorter = Sorter::Nearest;
            }
            'a' => {
                self.state.limit = i32::MAX;
                self.state.sorter = Sorter::Arbitrary;
            }
            'r' => {
                self.state.limit = 1;
                self.state.sorter = Sorter::Random;
            }
            's' => {
                self.state.limit = 1;
                self.state.flags |= StateFlags::INCLUDES_NON_PLAYERS | StateFlags::SENDER_ONLY;
            }
            'e' => {
                self.state.limit = i32::MAX;
                self.state.sorter = Sorter::Arbitrary;
                self.state.flags |= StateFlags::INCLUDES_NON_PLAYERS;
                self.state.and_predicate(|entity| entity.is_alive());
            }
            other => {
                self.cursor.set_cursor(class_pos);
                return Err(ParseError::at_pos(
                    ParseErrorKind::UnknownSelectorType(format!("@{other}")),
                    &self.cursor,
                    class_pos,
                ));
            }
        }
        if debug_enabled() {
            eprintln!("[selector:variant] @{class} limit={} sorter={:?}", self.state.limit, self.state.sorter);
        }
        self.bind_open_suggestor();
        if self.cursor.peek() == Some(OPTIONS_OPENING) {
            self.cursor.skip();
            self.bind_option_suggestor(true);
            self.read_options()?;
        }
        Ok(())
    }

    /// No `@` prefix: a bare UUID or player name selecting exactly one
    /// entity.
    fn read_regular(&mut self) -> Result<(), ParseError> {
        self.bind_none();
        let start = self.cursor.cursor();
        let token = self.cursor.read_string()?;
        if let Ok(uuid) = Uuid::parse_str(&token) {
            self.state.uuid = Some(uuid);
            self.state.flags |= StateFlags::INCLUDES_NON_PLAYERS;
        } else {
            if token.is_empty() || token.len() > MAX_NAME_LENGTH {
                self.cursor.set_cursor(start);
                return Err(ParseError::at_pos(ParseErrorKind::InvalidEntity, &self.cursor, start));
            }
            self.state.player_name = Some(token);
        }
        self.state.limit = 1;
        Ok(())
    }

    /// `[` has been consumed; read `key=value` pairs until `]`.
    fn read_options(&mut self) -> Result<(), ParseError> {
        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.can_read() {
                return Err(ParseError::at(ParseErrorKind::UnterminatedOptions, &self.cursor));
            }
            if self.cursor.peek() == Some(OPTIONS_CLOSING) {
                self.cursor.skip();
                return Ok(());
            }
            let key_start = self.cursor.cursor();
            let key = self.cursor.read_unquoted_string().to_string();
            let handler = options::get_handler(self, &key, key_start)?;
            self.cursor.skip_whitespace();
            if self.cursor.peek() != Some(OPTION_DEFINER) {
                self.cursor.set_cursor(key_start);
                return Err(ParseError::at_pos(
                    ParseErrorKind::ValuelessOption(key),
                    &self.cursor,
                    key_start,
                ));
            }
            self.cursor.skip();
            self.cursor.skip_whitespace();
            self.bind_none();
            handler(self)?;
            self.cursor.skip_whitespace();
            self.bind_end_next_suggestor();
            match self.cursor.peek() {
                Some(OPTION_SEPARATOR) => {
                    self.cursor.skip();
                    self.bind_option_suggestor(false);
                }
                Some(OPTIONS_CLOSING) => {
                    self.cursor.skip();
                    return Ok(());
                }
                _ => {
                    return Err(ParseError::at(
                        ParseErrorKind::UnterminatedOptions,
                        &self.cursor,
                    ));
                }
            }
        }
    }

    /// Consume an optional `!` before an option value.
    pub(crate) fn read_negation(&mut self) -> bool {
        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some('!') {
            self.cursor.skip();
            self.cursor.skip_whitespace();
            true
        } else {
            false
        }
    }

    /// Consume an optional `#` group marker before a `type` value.
    pub(crate) fn read_tag_marker(&mut self) -> bool {
        if self.cursor.peek() == Some('#') {
            self.cursor.skip();
            true
        } else {
            false
        }
    }

    // --- Suggestion rebinding ------------------------------------------------

    /// Replace the bound completion provider, anchored at the current cursor
    /// position.
    pub(crate) fn bind_suggestor(&mut self, suggestor: SuggestionFn) {
        self.suggestion_start = self.cursor.cursor();
        self.suggestor = suggestor;
    }

    fn bind_selector_suggestor(&mut self, start: usize) {
        let at_allowed = self.at_allowed;
        self.suggestion_start = start;
        self.suggestor = Box::new(move |builder| {
            if at_allowed {
                suggest_variants(builder);
            }
        });
    }

    fn bind_shorthand_suggestor(&mut self, at_pos: usize) {
        self.suggestion_start = at_pos;
        self.suggestor = Box::new(suggest_variants);
    }

    fn bind_open_suggestor(&mut self) {
        self.bind_suggestor(Box::new(|builder| {
            if builder.remaining().is_empty() {
                builder.suggest("[");
            }
        }));
    }

    /// Suggest the option ids still applicable to the current state, plus a
    /// closing `]` when the list may end here. The applicable set is
    /// snapshotted now; mutating the parser afterwards does not change what
    /// gets suggested.
    fn bind_option_suggestor(&mut self, include_end: bool) {
        let candidates = options::suggestable(&self.state);
        self.bind_suggestor(Box::new(move |builder| {
            if include_end && builder.remaining().is_empty() {
                builder.suggest("]");
            }
            let remaining = builder.remaining_lowercase().to_string();
            for (id, description) in &candidates {
                if id.starts_with(&remaining) {
                    builder.suggest_with(format!("{id}="), description.clone());
                }
            }
        }));
    }

    fn bind_end_next_suggestor(&mut self) {
        self.bind_suggestor(Box::new(|builder| {
            if builder.remaining().is_empty() {
                builder.suggest(",");
                builder.suggest("]");
            }
        }));
    }

    pub(crate) fn bind_none(&mut self) {
        self.bind_suggestor(Box::new(|_| {}));
    }

    /// Completions for the position the parser last rebound at. Meaningful
    /// after a [`parse`](Self::parse) call, successful or not.
    pub fn suggest(&self) -> Vec<Suggestion> {
        let mut builder = SuggestionsBuilder::new(self.cursor.input(), self.suggestion_start);
        (self.suggestor)(&mut builder);
        builder.build()
    }

    /// Offset the current suggestions replace from.
    pub fn suggestion_start(&self) -> usize {
        self.suggestion_start
    }
}

fn suggest_variants(builder: &mut SuggestionsBuilder) {
    const VARIANTS: [(&str, &str); 5] = [
        ("@p", "argument.entity.selector.nearestPlayer"),
        ("@a", "argument.entity.selector.allPlayers"),
        ("@r", "argument.entity.selector.randomPlayer"),
        ("@s", "argument.entity.selector.self"),
        ("@e", "argument.entity.selector.allEntities"),
    ];
    let remaining = builder.remaining_lowercase().to_string();
    for (text, key) in VARIANTS {
        if text.starts_with(&remaining) {
            builder.suggest_with(text, Message::translatable(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEntity;

    fn parse(input: &str) -> CompiledSelector {
        crate::parse(input).unwrap()
    }

    fn parse_err(input: &str) -> ParseError {
        crate::parse(input).unwrap_err()
    }

    #[test]
    fn shorthand_variants_set_their_defaults() {
        let p = parse("@p");
        assert_eq!(p.limit(), 1);
        assert_eq!(p.sorter(), Sorter::Nearest);
        assert!(!p.includes_non_players());
        assert!(!p.sender_only());

        let a = parse("@a");
        assert_eq!(a.limit(), i32::MAX);
        assert_eq!(a.sorter(), Sorter::Arbitrary);
        assert!(!a.includes_non_players());

        let r = parse("@r");
        assert_eq!(r.limit(), 1);
        assert_eq!(r.sorter(), Sorter::Random);

        let s = parse("@s");
        assert_eq!(s.limit(), 1);
        assert!(s.includes_non_players());
        assert!(s.sender_only());

        let e = parse("@e");
        assert_eq!(e.limit(), i32::MAX);
        assert!(e.includes_non_players());
        assert!(e.uses_shorthand());
    }

    #[test]
    fn all_entities_variant_skips_dead_entities() {
        let sel = parse("@e");
        let alive = TestEntity::new("a", "pig");
        let dead = TestEntity::new("d", "pig").dead();
        assert!(sel.matches(&alive));
        assert!(!sel.matches(&dead));
    }

    #[test]
    fn bare_at_reports_missing_body() {
        let err = parse_err("@");
        assert_eq!(*err.kind(), ParseErrorKind::MissingSelectorBody);
        assert_eq!(err.cursor(), 1);
    }

    #[test]
    fn unknown_variant_is_reported_at_its_character() {
        let err = parse_err("@c");
        assert_eq!(*err.kind(), ParseErrorKind::UnknownSelectorType("@c".to_string()));
        assert_eq!(err.cursor(), 1);
    }

    #[test]
    fn at_selectors_can_be_forbidden() {
        let err = crate::parse_with("@e", false).unwrap_err();
        assert_eq!(*err.kind(), ParseErrorKind::SelectorNotAllowed);
        assert!(crate::parse_with("alice", false).is_ok());
    }

    #[test]
    fn bare_name_selects_one_player_by_name() {
        let sel = parse("alice");
        assert_eq!(sel.player_name(), Some("alice"));
        assert_eq!(sel.limit(), 1);
        assert!(!sel.includes_non_players());
        assert!(!sel.uses_shorthand());
    }

    #[test]
    fn quoted_names_may_contain_spaces() {
        let sel = parse("\"Dr. Who\"");
        assert_eq!(sel.player_name(), Some("Dr. Who"));
    }

    #[test]
    fn bare_uuid_selects_any_entity_kind() {
        let sel = parse("f7c2ef62-52e5-4b8a-91b0-6d43d642bd1a");
        assert!(sel.uuid().is_some());
        assert!(sel.player_name().is_none());
        assert!(sel.includes_non_players());
        assert_eq!(sel.limit(), 1);
    }

    #[test]
    fn overlong_names_are_invalid() {
        let err = parse_err("thisnameiswaytoolongtobevalid");
        assert_eq!(*err.kind(), ParseErrorKind::InvalidEntity);
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn empty_option_list_is_allowed() {
        let sel = parse("@e[]");
        assert_eq!(sel.limit(), i32::MAX);
    }

    #[test]
    fn whitespace_inside_options_is_tolerated() {
        assert!(crate::parse("@e[ type = zombie , limit = 2 ]").is_ok());
    }

    #[test]
    fn unterminated_options_are_reported_at_end() {
        let err = parse_err("@a[name=foo");
        assert_eq!(*err.kind(), ParseErrorKind::UnterminatedOptions);
        assert_eq!(err.cursor(), 11);
    }

    #[test]
    fn option_without_value_is_reported_at_its_key() {
        let err = parse_err("@e[limit]");
        assert_eq!(*err.kind(), ParseErrorKind::ValuelessOption("limit".to_string()));
        assert_eq!(err.cursor(), 3);
    }

    #[test]
    fn parse_failure_resets_the_cursor() {
        let mut parser = SelectorParser::new("@e[limit=0]");
        let err = parser.parse().unwrap_err();
        assert_eq!(parser.cursor.cursor(), 0);
        assert_eq!(err.cursor(), 9);
    }

    #[test]
    fn variants_are_suggested_at_the_start() {
        let mut parser = SelectorParser::new("@");
        let _ = parser.parse();
        let texts: Vec<_> = parser.suggest().into_iter().map(|s| s.text).collect();
        assert_eq!(texts, ["@a", "@e", "@p", "@r", "@s"]);
        assert_eq!(parser.suggestion_start(), 0);
    }

    #[test]
    fn nothing_is_suggested_when_selectors_are_forbidden() {
        let mut parser = SelectorParser::with_at_allowed("@", false);
        let _ = parser.parse();
        assert!(parser.suggest().is_empty());
    }

    #[test]
    fn open_bracket_is_suggested_after_a_variant() {
        let mut parser = SelectorParser::new("@e");
        let _ = parser.parse();
        let texts: Vec<_> = parser.suggest().into_iter().map(|s| s.text).collect();
        assert_eq!(texts, ["["]);
    }

    #[test]
    fn option_ids_are_suggested_inside_brackets() {
        let mut parser = SelectorParser::new("@e[");
        let _ = parser.parse();
        let suggestions = parser.suggest();
        let texts: Vec<_> = suggestions.iter().map(|s| s.text.as_str()).collect();
        assert!(texts.contains(&"]"));
        assert!(texts.contains(&"limit="));
        assert!(texts.contains(&"type="));
        let limit = suggestions.iter().find(|s| s.text == "limit=").unwrap();
        assert_eq!(
            limit.tooltip.as_ref().unwrap().key(),
            "argument.entity.options.limit.description"
        );
    }

    #[test]
    fn option_suggestions_are_prefix_filtered() {
        let mut parser = SelectorParser::new("@e[di");
        let _ = parser.parse();
        let texts: Vec<_> = parser.suggest().into_iter().map(|s| s.text).collect();
        assert_eq!(texts, ["distance="]);
    }

    #[test]
    fn consumed_options_drop_out_of_suggestions() {
        let mut parser = SelectorParser::new("@e[limit=2,");
        let _ = parser.parse();
        let texts: Vec<_> = parser.suggest().into_iter().map(|s| s.text).collect();
        assert!(!texts.contains(&"limit=".to_string()));
        assert!(texts.contains(&"sort=".to_string()));
        // After a separator the list can't close immediately in suggestions.
        assert!(!texts.contains(&"]".to_string()));
    }

    #[test]
    fn separator_or_close_is_suggested_after_a_value() {
        let mut parser = SelectorParser::new("@e[limit=2");
        let _ = parser.parse();
        let texts: Vec<_> = parser.suggest().into_iter().map(|s| s.text).collect();
        assert_eq!(texts, [",", "]"]);
    }

    #[test]
    fn sender_variant_rejects_limit_and_sort() {
        let err = parse_err("@s[limit=1]");
        assert_eq!(*err.kind(), ParseErrorKind::InapplicableOption("limit".to_string()));
        let err = parse_err("@s[sort=nearest]");
        assert_eq!(*err.kind(), ParseErrorKind::InapplicableOption("sort".to_string()));
    }
}

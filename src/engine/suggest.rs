//! Completion suggestions.
//!
//! A side channel, not a parser phase. The state machine rebinds the current
//! provider at every meaningful position ("suggest `[`", "suggest applicable
//! option ids", "suggest `,` or `]`", ...). Providers capture the state
//! snapshot they need **by value** at bind time, so invoking one is a pure
//! read: it can never mutate parse state or move the cursor.

use crate::text::Message;

/// One ranked completion: the replacement text and an optional tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub tooltip: Option<Message>,
}

/// Collects suggestions relative to a start offset in the input.
///
/// `remaining` is the text between the start offset and the end of input;
/// providers use it to prefix-filter their candidates.
#[derive(Debug)]
pub struct SuggestionsBuilder {
    start: usize,
    remaining: String,
    remaining_lowercase: String,
    suggestions: Vec<Suggestion>,
}

impl SuggestionsBuilder {
    pub fn new(input: &str, start: usize) -> Self {
        let start = start.min(input.len());
        let remaining = input[start..].to_string();
        let remaining_lowercase = remaining.to_lowercase();
        SuggestionsBuilder { start, remaining, remaining_lowercase, suggestions: Vec::new() }
    }

    /// Offset the suggestions replace from.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    pub fn remaining_lowercase(&self) -> &str {
        &self.remaining_lowercase
    }

    pub fn suggest(&mut self, text: impl Into<String>) {
        self.suggestions.push(Suggestion { text: text.into(), tooltip: None });
    }

    pub fn suggest_with(&mut self, text: impl Into<String>, tooltip: Message) {
        self.suggestions.push(Suggestion { text: text.into(), tooltip: Some(tooltip) });
    }

    /// Finish: suggestions sorted by text, deduplicated.
    pub fn build(mut self) -> Vec<Suggestion> {
        self.suggestions.sort_by(|a, b| a.text.cmp(&b.text));
        self.suggestions.dedup_by(|a, b| a.text == b.text);
        self.suggestions
    }
}

/// The currently-bound completion provider.
pub(crate) type SuggestionFn = Box<dyn Fn(&mut SuggestionsBuilder)>;

/// Suggest every candidate the builder's remaining text is a prefix of
/// (case-insensitive).
pub(crate) fn suggest_matching<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    builder: &mut SuggestionsBuilder,
) {
    let remaining = builder.remaining_lowercase().to_string();
    for candidate in candidates {
        if candidate.to_lowercase().starts_with(&remaining) {
            builder.suggest(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_sorts_and_deduplicates() {
        let mut b = SuggestionsBuilder::new("", 0);
        b.suggest("nearest");
        b.suggest("arbitrary");
        b.suggest("nearest");
        let out = b.build();
        let texts: Vec<_> = out.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["arbitrary", "nearest"]);
    }

    #[test]
    fn suggest_matching_filters_by_remaining_prefix() {
        let mut b = SuggestionsBuilder::new("@e[sort=ne", 8);
        assert_eq!(b.remaining(), "ne");
        suggest_matching(["nearest", "furthest", "random", "arbitrary"], &mut b);
        let out = b.build();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "nearest");
    }

    #[test]
    fn tooltips_ride_along() {
        let mut b = SuggestionsBuilder::new("", 0);
        b.suggest_with("limit=", Message::translatable("argument.entity.options.limit.description"));
        let out = b.build();
        assert_eq!(out[0].tooltip.as_ref().unwrap().key(), "argument.entity.options.limit.description");
    }

    #[test]
    fn start_is_clamped_to_input_length() {
        let b = SuggestionsBuilder::new("abc", 99);
        assert_eq!(b.start(), 3);
        assert_eq!(b.remaining(), "");
    }
}

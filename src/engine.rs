//! Selector parsing engine.
//!
//! This module is the entry point for the selector state machine. The engine
//! is split into focused submodules under `src/engine/` while keeping public
//! paths stable (for example `crate::engine::SelectorParser`).
//!
//! ## How the parts work together
//!
//! Parsing one selector expression is a single forward pass:
//!
//! ```text
//! input ── Cursor ──> SelectorParser::parse          (grammar.rs)
//!                       │  '@' + class char  ── set variant defaults
//!                       │  '[' key '=' value ── dispatch per key
//!                       │        │
//!                       │        └── option registry  (options.rs)
//!                       │              - applicability gate
//!                       │              - handler mutates SelectorState
//!                       │                (state.rs): flags, ranges,
//!                       │                predicate conjunction
//!                       │
//!                       └── suggestion provider rebound at every
//!                           meaningful position      (suggest.rs)
//!                               │
//!                               v
//!                        CompiledSelector            (api.rs)
//! ```
//!
//! The state machine owns a [`Cursor`](crate::reader::Cursor) and one
//! `SelectorState` per call; handlers receive the whole parser by exclusive
//! mutable reference, so there is no hidden aliasing between the cursor and
//! the state they mutate.
//!
//! ## Responsibilities by module
//!
//! - `state.rs`: the mutable parse record (`SelectorState`, `StateFlags`) and
//!   the predicate-conjunction rule.
//! - `grammar.rs`: the recursive-descent grammar (`SelectorParser`), cursor
//!   rollback anchors and suggestion-provider rebinding.
//! - `options.rs`: the fixed option table and every option handler.
//! - `suggest.rs`: `SuggestionsBuilder` and the completion surface.
//!
//! ## Error discipline
//!
//! Every fallible step returns `Result<_, ParseError>`; cursor rollback is
//! performed explicitly by the failing layer at its documented anchor, never
//! by unwinding. The outermost `parse` resets to the expression start.
//!
//! ## Debugging
//!
//! Set `QUARRY_DEBUG_SELECTOR=1` to print option dispatch and variant traces.

#[path = "engine/grammar.rs"]
mod grammar;
#[path = "engine/options.rs"]
pub(crate) mod options;
#[path = "engine/state.rs"]
mod state;
#[path = "engine/suggest.rs"]
mod suggest;

pub use grammar::SelectorParser;
pub use suggest::{Suggestion, SuggestionsBuilder};

pub(crate) use state::{SelectorState, StateFlags};
pub(crate) use suggest::suggest_matching;

/// True when `QUARRY_DEBUG_SELECTOR` is set in the environment.
pub(crate) fn debug_enabled() -> bool {
    std::env::var_os("QUARRY_DEBUG_SELECTOR").is_some()
}

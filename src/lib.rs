extern crate self as quarry;

#[macro_use]
mod macros;
mod api;
mod engine;
mod entity;
mod error;
mod range;
mod reader;
mod text;

#[cfg(test)]
pub(crate) mod testutil;

pub use api::{CompiledSelector, parse, parse_with};
pub use engine::{SelectorParser, Suggestion, SuggestionsBuilder};
pub use entity::{GameMode, SelectorEntity, Vec3};
pub use error::{ParseError, ParseErrorKind};
pub use range::{FloatRange, IntRange};
pub use reader::Cursor;
pub use text::Message;

// --- Internal shared types ---------------------------------------------------

/// A compiled boolean test over one entity. Handlers only ever extend the
/// current predicate by conjunction; see `SelectorState::and_predicate`.
pub(crate) type EntityPredicate = Box<dyn Fn(&dyn SelectorEntity) -> bool>;

/// Ordering strategy applied to the filtered result set before limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sorter {
    /// Ascending squared distance to the reference point.
    Nearest,
    /// Descending squared distance to the reference point.
    Furthest,
    /// Uniform shuffle.
    Random,
    /// No reordering; whatever order the caller supplied. Stable within a
    /// single call.
    #[default]
    Arbitrary,
}

impl Sorter {
    pub const NAMES: [&'static str; 4] = ["nearest", "furthest", "random", "arbitrary"];

    pub fn name(&self) -> &'static str {
        match self {
            Sorter::Nearest => "nearest",
            Sorter::Furthest => "furthest",
            Sorter::Random => "random",
            Sorter::Arbitrary => "arbitrary",
        }
    }

    pub fn from_name(name: &str) -> Option<Sorter> {
        match name {
            "nearest" => Some(Sorter::Nearest),
            "furthest" => Some(Sorter::Furthest),
            "random" => Some(Sorter::Random),
            "arbitrary" => Some(Sorter::Arbitrary),
            _ => None,
        }
    }

    /// Reorder `entities` in place relative to `origin`.
    pub fn apply(&self, origin: Vec3, entities: &mut [&dyn SelectorEntity]) {
        use rand::seq::SliceRandom;
        match self {
            Sorter::Nearest => entities.sort_by(|a, b| {
                let da = a.position().squared_distance_to(origin);
                let db = b.position().squared_distance_to(origin);
                da.total_cmp(&db)
            }),
            Sorter::Furthest => entities.sort_by(|a, b| {
                let da = a.position().squared_distance_to(origin);
                let db = b.position().squared_distance_to(origin);
                db.total_cmp(&da)
            }),
            Sorter::Random => entities.shuffle(&mut rand::thread_rng()),
            Sorter::Arbitrary => {}
        }
    }
}

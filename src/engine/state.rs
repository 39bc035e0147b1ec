//! The mutable record built while parsing one selector expression.
//!
//! One `SelectorState` exists per parse call: created empty, mutated
//! exclusively by the grammar and the option handlers, converted into a
//! read-only `CompiledSelector` on success and dropped on failure. Nothing is
//! shared across calls.

use crate::entity::SelectorEntity;
use crate::range::{FloatRange, IntRange};
use crate::{EntityPredicate, Sorter};
use uuid::Uuid;

bitflags::bitflags! {
    /// Boolean facts accumulated during one parse.
    ///
    /// `SELECTS_*`/`EXCLUDES_*` pairs implement the negation convention: a
    /// non-negated occurrence of an option sets `SELECTS_*` and makes further
    /// occurrences inapplicable, while negated occurrences set `EXCLUDES_*`
    /// and may be repeated (their predicates AND together).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StateFlags: u32 {
        const INCLUDES_NON_PLAYERS = 1 << 0;
        const LOCAL_WORLD_ONLY     = 1 << 1;
        const SENDER_ONLY          = 1 << 2;
        const HAS_LIMIT            = 1 << 3;
        const HAS_SORTER           = 1 << 4;
        const SELECTS_NAME         = 1 << 5;
        const EXCLUDES_NAME        = 1 << 6;
        const SELECTS_GAME_MODE    = 1 << 7;
        const EXCLUDES_GAME_MODE   = 1 << 8;
        const SELECTS_TEAM         = 1 << 9;
        const EXCLUDES_TEAM        = 1 << 10;
        const SELECTS_TYPE         = 1 << 11;
        const EXCLUDES_TYPE        = 1 << 12;
        const SELECTS_SCORES       = 1 << 13;
        const SELECTS_ADVANCEMENTS = 1 << 14;
        const USES_SHORTHAND       = 1 << 15;
    }
}

/// Mutable parse state for one selector expression.
///
/// Ranges default to "any", the predicate to constant-true (`None`), the
/// sorter to arbitrary. Shorthand classes overwrite `limit`, `sorter` and the
/// player flags atomically before any option runs.
#[derive(Default)]
pub struct SelectorState {
    pub flags: StateFlags,
    pub distance: FloatRange,
    pub level: IntRange,
    pub pitch: FloatRange,
    pub yaw: FloatRange,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    pub dz: Option<f64>,
    pub limit: i32,
    pub sorter: Sorter,
    pub entity_type: Option<String>,
    pub player_name: Option<String>,
    pub uuid: Option<Uuid>,
    /// Conjunction of every handler-contributed predicate; `None` is
    /// constant-true.
    pub predicate: Option<EntityPredicate>,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND `next` onto the accumulated predicate. This is the only way
    /// handlers contribute predicates; an existing predicate is never
    /// replaced.
    pub fn and_predicate(&mut self, next: impl Fn(&dyn SelectorEntity) -> bool + 'static) {
        self.predicate = Some(match self.predicate.take() {
            Some(prev) => Box::new(move |entity| prev(entity) && next(entity)),
            None => Box::new(next),
        });
    }

    /// Evaluate the accumulated predicate against one entity.
    pub fn test_predicate(&self, entity: &dyn SelectorEntity) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(entity))
    }
}

impl std::fmt::Debug for SelectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorState")
            .field("flags", &self.flags)
            .field("distance", &self.distance)
            .field("level", &self.level)
            .field("limit", &self.limit)
            .field("sorter", &self.sorter)
            .field("entity_type", &self.entity_type)
            .field("player_name", &self.player_name)
            .field("uuid", &self.uuid)
            .field("predicate", &self.predicate.as_ref().map(|_| "<function>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEntity;

    #[test]
    fn empty_state_matches_everything() {
        let state = SelectorState::new();
        let entity = TestEntity::new("anything", "pig");
        assert!(state.test_predicate(&entity));
        assert!(state.distance.is_any());
        assert_eq!(state.sorter, Sorter::Arbitrary);
        assert!(state.flags.is_empty());
    }

    #[test]
    fn and_predicate_composes_by_conjunction() {
        let mut state = SelectorState::new();
        state.and_predicate(|e| e.display_name() != "alice");
        state.and_predicate(|e| e.type_id() == "pig");

        let pig = TestEntity::new("bob", "pig");
        let named_pig = TestEntity::new("alice", "pig");
        let cow = TestEntity::new("bob", "cow");
        assert!(state.test_predicate(&pig));
        assert!(!state.test_predicate(&named_pig));
        assert!(!state.test_predicate(&cow));
    }
}

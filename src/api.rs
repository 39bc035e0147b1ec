//! Public entry points.
//!
//! [`parse`] turns one selector expression into a [`CompiledSelector`], the
//! read-only product of a successful parse. Matching is split in two:
//! [`CompiledSelector::matches`] evaluates everything that needs no origin
//! (name, uuid, type, the compiled predicate, level and rotation ranges),
//! while [`CompiledSelector::select`] additionally applies the
//! origin-relative constraints (distance, the dx/dy/dz volume), sorts and
//! truncates to the limit.

use uuid::Uuid;

use crate::Sorter;
use crate::EntityPredicate;
use crate::engine::{SelectorState, StateFlags};
use crate::entity::{SelectorEntity, Vec3};
use crate::error::ParseError;
use crate::range::{FloatRange, IntRange};

/// Parse one selector expression.
pub fn parse(input: &str) -> Result<CompiledSelector, ParseError> {
    crate::engine::SelectorParser::new(input).parse()
}

/// Parse one selector expression, optionally forbidding `@` selectors.
pub fn parse_with(input: &str, at_allowed: bool) -> Result<CompiledSelector, ParseError> {
    crate::engine::SelectorParser::with_at_allowed(input, at_allowed).parse()
}

/// The immutable result of parsing a selector expression.
pub struct CompiledSelector {
    flags: StateFlags,
    distance: FloatRange,
    level: IntRange,
    pitch: FloatRange,
    yaw: FloatRange,
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    dz: Option<f64>,
    limit: i32,
    sorter: Sorter,
    entity_type: Option<String>,
    player_name: Option<String>,
    uuid: Option<Uuid>,
    predicate: Option<EntityPredicate>,
}

impl CompiledSelector {
    pub(crate) fn from_state(state: SelectorState) -> Self {
        CompiledSelector {
            flags: state.flags,
            distance: state.distance,
            level: state.level,
            pitch: state.pitch,
            yaw: state.yaw,
            x: state.x,
            y: state.y,
            z: state.z,
            dx: state.dx,
            dy: state.dy,
            dz: state.dz,
            limit: state.limit,
            sorter: state.sorter,
            entity_type: state.entity_type,
            player_name: state.player_name,
            uuid: state.uuid,
            predicate: state.predicate,
        }
    }

    /// Maximum number of entities the selector yields.
    pub fn limit(&self) -> i32 {
        self.limit
    }

    pub fn sorter(&self) -> Sorter {
        self.sorter
    }

    /// Whether non-player entities can be selected at all.
    pub fn includes_non_players(&self) -> bool {
        self.flags.contains(StateFlags::INCLUDES_NON_PLAYERS)
    }

    /// Whether the selector is pinned to positions in the command's world.
    pub fn local_world_only(&self) -> bool {
        self.flags.contains(StateFlags::LOCAL_WORLD_ONLY)
    }

    /// Whether the selector can only ever yield the command sender (`@s`).
    pub fn sender_only(&self) -> bool {
        self.flags.contains(StateFlags::SENDER_ONLY)
    }

    /// Whether the expression used an `@` shorthand rather than a bare name
    /// or UUID.
    pub fn uses_shorthand(&self) -> bool {
        self.flags.contains(StateFlags::USES_SHORTHAND)
    }

    /// The pinned entity type, when `type=` named one non-negated.
    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    /// The exact name a bare-name expression selects.
    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// The exact id a bare-UUID expression selects.
    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    pub fn distance(&self) -> FloatRange {
        self.distance
    }

    pub fn level(&self) -> IntRange {
        self.level
    }

    /// The explicit x/y/z origin override, per axis.
    pub fn volume_anchor(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.x, self.y, self.z)
    }

    /// The dx/dy/dz volume extent, per axis.
    pub fn volume_size(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (self.dx, self.dy, self.dz)
    }

    /// Evaluate every origin-independent constraint against one entity.
    pub fn matches(&self, entity: &dyn SelectorEntity) -> bool {
        if let Some(name) = &self.player_name {
            if entity.display_name() != name {
                return false;
            }
        }
        if let Some(uuid) = self.uuid {
            if entity.uuid() != Some(uuid) {
                return false;
            }
        }
        if !self.includes_non_players() && !entity.is_player() {
            return false;
        }
        if !self.level.test(entity.experience_level()) {
            return false;
        }
        if !self.pitch.test(entity.pitch()) || !self.yaw.test(entity.yaw()) {
            return false;
        }
        self.predicate.as_ref().is_none_or(|p| p(entity))
    }

    /// The effective base position: `origin` with any explicit x/y/z
    /// substituted per axis.
    fn anchor(&self, origin: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(origin.x),
            self.y.unwrap_or(origin.y),
            self.z.unwrap_or(origin.z),
        )
    }

    /// Whether `position` lies inside the dx/dy/dz box anchored at `base`.
    /// Axes without an extent are unconstrained; negative extents reach in
    /// the negative direction.
    fn in_volume(&self, base: Vec3, position: Vec3) -> bool {
        let axis = |start: f64, size: Option<f64>, value: f64| match size {
            None => true,
            Some(d) => {
                let (lo, hi) = if d < 0.0 { (start + d, start) } else { (start, start + d) };
                value >= lo && value <= hi
            }
        };
        axis(base.x, self.dx, position.x)
            && axis(base.y, self.dy, position.y)
            && axis(base.z, self.dz, position.z)
    }

    /// Run the full selection over `candidates`: filter, apply the
    /// origin-relative constraints, sort from `origin`, truncate to the
    /// limit.
    pub fn select<'a>(
        &self,
        origin: Vec3,
        candidates: impl IntoIterator<Item = &'a dyn SelectorEntity>,
    ) -> Vec<&'a dyn SelectorEntity> {
        let base = self.anchor(origin);
        let mut selected: Vec<&dyn SelectorEntity> = candidates
            .into_iter()
            .filter(|entity| {
                self.matches(*entity)
                    && self.distance.test(entity.position().distance_to(base))
                    && self.in_volume(base, entity.position())
            })
            .collect();
        self.sorter.apply(base, &mut selected);
        selected.truncate(self.limit.max(0) as usize);
        selected
    }
}

impl std::fmt::Debug for CompiledSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSelector")
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

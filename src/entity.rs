//! The entity capability surface consumed by compiled predicates.
//!
//! The parser never touches a concrete world representation. Option handlers
//! compile predicates against [`SelectorEntity`], a narrow accessor trait the
//! host implements over its own entity type. Capabilities a host doesn't have
//! (teams, scoreboards, advancements) fall back to defaults that make the
//! corresponding predicates simply not match.

use crate::reader::Cursor;
use uuid::Uuid;

/// A point or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    /// Squared euclidean distance to `other`. Sorters compare on this to
    /// avoid the square root.
    pub fn squared_distance_to(&self, other: Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance_to(&self, other: Vec3) -> f64 {
        self.squared_distance_to(other).sqrt()
    }
}

/// Player game modes understood by the `gamemode` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    pub const ALL: [GameMode; 4] =
        [GameMode::Survival, GameMode::Creative, GameMode::Adventure, GameMode::Spectator];

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Survival => "survival",
            GameMode::Creative => "creative",
            GameMode::Adventure => "adventure",
            GameMode::Spectator => "spectator",
        }
    }

    pub fn from_name(name: &str) -> Option<GameMode> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// Accessors the compiled selector evaluates entities through.
///
/// Only `position`, `is_alive`, `display_name` and `type_id` are mandatory;
/// everything else defaults to "capability absent", which makes predicates
/// over that capability reject the entity.
pub trait SelectorEntity {
    fn position(&self) -> Vec3;

    fn is_alive(&self) -> bool;

    fn display_name(&self) -> &str;

    /// Registry identifier of the entity's type, e.g. `"zombie"`.
    fn type_id(&self) -> &str;

    /// True when the entity's type belongs to the named type group
    /// (the `type=#group` form).
    fn has_type_tag(&self, _tag: &str) -> bool {
        false
    }

    /// True for player-controlled entities. Gates `includes_non_players`.
    fn is_player(&self) -> bool {
        false
    }

    fn uuid(&self) -> Option<Uuid> {
        None
    }

    /// Game mode, for player-like entities only.
    fn game_mode(&self) -> Option<GameMode> {
        None
    }

    /// Current team name, if the entity belongs to one.
    fn team_name(&self) -> Option<&str> {
        None
    }

    /// Command tags attached to the entity.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Experience level; only meaningful for players.
    fn experience_level(&self) -> i32 {
        0
    }

    /// Pitch (x-rotation) in degrees.
    fn pitch(&self) -> f64 {
        0.0
    }

    /// Yaw (y-rotation) in degrees.
    fn yaw(&self) -> f64 {
        0.0
    }

    /// Scoreboard value for `objective`, if the entity has one.
    fn score(&self, _objective: &str) -> Option<i32> {
        None
    }

    /// Whether the named advancement is complete. `None` when unknown.
    fn advancement_done(&self, _advancement: &str) -> Option<bool> {
        None
    }

    /// Whether one criterion of an advancement has been obtained.
    fn criterion_obtained(&self, _advancement: &str, _criterion: &str) -> Option<bool> {
        None
    }
}

/// True for characters allowed in a resource identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.' | ':' | '/')
}

/// Read a resource identifier (`name` or `namespace:path`) from the cursor.
///
/// Returns `None` when the token is empty or structurally malformed (more
/// than one `:`, empty namespace or path); the cursor is left past whatever
/// was consumed and the caller decides the rollback anchor.
pub(crate) fn read_resource_id<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let input = cursor.input();
    let start = cursor.cursor();
    while cursor.peek().is_some_and(is_identifier_char) {
        cursor.skip();
    }
    let text = &input[start..cursor.cursor()];
    if text.is_empty() {
        return None;
    }
    let mut parts = text.split(':');
    let first = parts.next()?;
    match (parts.next(), parts.next()) {
        (None, _) => Some(text),
        (Some(path), None) if !first.is_empty() && !path.is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_distances() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.squared_distance_to(b), 25.0);
        assert_eq!(a.distance_to(b), 5.0);
    }

    #[test]
    fn game_mode_round_trips_names() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(GameMode::from_name("hardcore"), None);
    }

    #[test]
    fn resource_ids_accept_plain_and_namespaced_forms() {
        let mut c = Cursor::new("zombie]");
        assert_eq!(read_resource_id(&mut c), Some("zombie"));
        assert_eq!(c.peek(), Some(']'));

        let mut c = Cursor::new("mod:piglin/brute,");
        assert_eq!(read_resource_id(&mut c), Some("mod:piglin/brute"));
    }

    #[test]
    fn resource_ids_reject_malformed_forms() {
        assert_eq!(read_resource_id(&mut Cursor::new("")), None);
        assert_eq!(read_resource_id(&mut Cursor::new(":zombie")), None);
        assert_eq!(read_resource_id(&mut Cursor::new("a:b:c")), None);
        assert_eq!(read_resource_id(&mut Cursor::new("mod:")), None);
    }
}

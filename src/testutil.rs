//! Builder-style fake entity shared by the unit tests.

use std::collections::HashMap;

use uuid::Uuid;

use crate::entity::{GameMode, SelectorEntity, Vec3};

pub(crate) struct TestEntity {
    name: String,
    type_id: String,
    type_tags: Vec<String>,
    position: Vec3,
    alive: bool,
    player: bool,
    game_mode: Option<GameMode>,
    uuid: Option<Uuid>,
    team: Option<String>,
    tags: Vec<String>,
    level: i32,
    pitch: f64,
    yaw: f64,
    scores: HashMap<String, i32>,
    advancements: HashMap<String, bool>,
    criteria: HashMap<(String, String), bool>,
}

impl TestEntity {
    /// An alive non-player entity of the given type at the origin.
    pub fn new(name: &str, type_id: &str) -> Self {
        TestEntity {
            name: name.to_string(),
            type_id: type_id.to_string(),
            type_tags: Vec::new(),
            position: Vec3::ZERO,
            alive: true,
            player: false,
            game_mode: None,
            uuid: None,
            team: None,
            tags: Vec::new(),
            level: 0,
            pitch: 0.0,
            yaw: 0.0,
            scores: HashMap::new(),
            advancements: HashMap::new(),
            criteria: HashMap::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn dead(mut self) -> Self {
        self.alive = false;
        self
    }

    pub fn player(mut self, mode: GameMode) -> Self {
        self.player = true;
        self.game_mode = Some(mode);
        self
    }

    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(Uuid::parse_str(uuid).unwrap());
        self
    }

    pub fn in_team(mut self, team: &str) -> Self {
        self.team = Some(team.to_string());
        self
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn with_type_tag(mut self, tag: &str) -> Self {
        self.type_tags.push(tag.to_string());
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn rotation(mut self, pitch: f64, yaw: f64) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }

    pub fn with_score(mut self, objective: &str, value: i32) -> Self {
        self.scores.insert(objective.to_string(), value);
        self
    }

    pub fn with_advancement(mut self, advancement: &str, done: bool) -> Self {
        self.advancements.insert(advancement.to_string(), done);
        self
    }

    pub fn with_criterion(mut self, advancement: &str, criterion: &str, obtained: bool) -> Self {
        self.criteria.insert((advancement.to_string(), criterion.to_string()), obtained);
        self
    }
}

impl SelectorEntity for TestEntity {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn type_id(&self) -> &str {
        &self.type_id
    }

    fn has_type_tag(&self, tag: &str) -> bool {
        self.type_tags.iter().any(|t| t == tag)
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    fn game_mode(&self) -> Option<GameMode> {
        self.game_mode
    }

    fn team_name(&self) -> Option<&str> {
        self.team.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn experience_level(&self) -> i32 {
        self.level
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn yaw(&self) -> f64 {
        self.yaw
    }

    fn score(&self, objective: &str) -> Option<i32> {
        self.scores.get(objective).copied()
    }

    fn advancement_done(&self, advancement: &str) -> Option<bool> {
        self.advancements.get(advancement).copied()
    }

    fn criterion_obtained(&self, advancement: &str, criterion: &str) -> Option<bool> {
        self.criteria.get(&(advancement.to_string(), criterion.to_string())).copied()
    }
}

//! Simulation state
//!
//! The simulation owns every entity in one ordered collection. The player is
//! created first and only ever removed, so while alive it sits at index 0.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::lane_blocked;
use super::entity::{Adversary, Entity, EntityKind, Faction, Player, Projectile};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::input::InputSource;
use crate::tuning::Tuning;

/// Playfield dimensions. Only the vertical bounds are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Is `y` within [0, height]?
    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        (0.0..=self.height).contains(&y)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Text shown over the final frame
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Won => "You Win!",
            Outcome::Lost => "You Loose!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Terminal: ticks no longer change anything
    Over(Outcome),
}

/// Things the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player fired projectile `id`
    Shot { id: u32 },
    GameOver(Outcome),
}

pub struct Simulation {
    pub(crate) arena: Arena,
    pub(crate) tuning: Tuning,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) phase: GamePhase,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) time_ticks: u64,
    next_id: u32,
}

impl Simulation {
    /// Player plus the full adversary grid
    pub fn new(arena: Arena, tuning: Tuning, seed: u64, input: impl InputSource + 'static) -> Self {
        let mut sim = Self::with_player(arena, tuning, seed, input);
        let mut cells: Vec<Vec2> = Vec::with_capacity(sim.tuning.grid_size());
        cells.extend(sim.tuning.grid_positions());
        for center in cells {
            sim.spawn_adversary(center);
        }
        log::debug!(
            "Session {} started with {} adversaries",
            seed,
            sim.adversaries().count()
        );
        sim
    }

    /// Player only; callers lay out the rest with the `spawn_*` methods
    pub fn with_player(
        arena: Arena,
        tuning: Tuning,
        seed: u64,
        input: impl InputSource + 'static,
    ) -> Self {
        let mut sim = Self {
            arena,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            input: Box::new(input),
            entities: Vec::new(),
            phase: GamePhase::Playing,
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        };

        let size = sim.tuning.player_extent();
        let id = sim.next_entity_id();
        sim.entities.push(Entity {
            id,
            center: Vec2::new(arena.width / 2.0, arena.height - size.y),
            size,
            kind: EntityKind::Player(Player::default()),
        });
        sim
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_adversary(&mut self, center: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            center,
            size: self.tuning.adversary_extent(),
            kind: EntityKind::Adversary(Adversary::new(self.tuning.adversary_speed)),
        });
        id
    }

    pub fn spawn_projectile(&mut self, center: Vec2, velocity: Vec2, faction: Faction) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            center,
            size: self.tuning.projectile_extent(),
            kind: EntityKind::Projectile(Projectile { velocity, faction }),
        });
        id
    }

    /// Advance one step (no-op once the session is over)
    pub fn tick(&mut self) {
        super::tick::tick(self);
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Over(outcome) => Some(outcome),
            GamePhase::Playing => None,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.first().filter(|e| e.is_player())
    }

    pub fn adversaries(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_adversary())
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_projectile())
    }

    /// Is another adversary below `entity`, within half its width?
    pub fn invaders_below(&self, entity: &Entity) -> bool {
        let lanes: Vec<Vec2> = self.adversaries().map(|e| e.center).collect();
        lane_blocked(&lanes, entity.center, entity.size.x)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Entity list as JSON, for diagnostics
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Keyboard;

    #[test]
    fn test_new_session_layout() {
        let sim = Simulation::new(Arena::default(), Tuning::default(), 42, Keyboard::new());

        assert_eq!(sim.phase(), GamePhase::Playing);
        assert_eq!(sim.entities().len(), 25);
        assert_eq!(sim.adversaries().count(), 24);
        assert_eq!(sim.projectiles().count(), 0);

        let player = sim.player().expect("player spawned");
        assert_eq!(sim.entities()[0].id, player.id);
        assert_eq!(player.center, Vec2::new(150.0, 285.0));
        assert_eq!(player.size, Vec2::splat(15.0));
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut sim = Simulation::new(Arena::default(), Tuning::default(), 1, Keyboard::new());
        let extra = sim.spawn_projectile(Vec2::new(10.0, 10.0), Vec2::ZERO, Faction::Player);

        let mut ids: Vec<u32> = sim.entities().iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), sim.entities().len());
        assert_eq!(sim.entity(extra).map(|e| e.is_projectile()), Some(true));
    }

    #[test]
    fn test_invaders_below_query() {
        let mut sim =
            Simulation::with_player(Arena::default(), Tuning::default(), 1, Keyboard::new());
        let upper = sim.spawn_adversary(Vec2::new(100.0, 30.0));
        let lower = sim.spawn_adversary(Vec2::new(105.0, 60.0));
        let aside = sim.spawn_adversary(Vec2::new(200.0, 30.0));

        let get = |id| sim.entity(id).cloned().expect("spawned");
        assert!(sim.invaders_below(&get(upper)));
        assert!(!sim.invaders_below(&get(lower)));
        assert!(!sim.invaders_below(&get(aside)));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::Won.message(), "You Win!");
        assert_eq!(Outcome::Lost.message(), "You Loose!");
    }

    #[test]
    fn test_snapshot_json_lists_entities() {
        let sim = Simulation::new(Arena::default(), Tuning::default(), 9, Keyboard::new());
        let json = sim.snapshot_json().unwrap();
        let parsed: Vec<Entity> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sim.entities());
        assert!(json.contains("\"type\":\"Player\""));
    }

    #[test]
    fn test_arena_vertical_bounds() {
        let arena = Arena::new(300.0, 200.0);
        assert!(arena.contains_y(0.0));
        assert!(arena.contains_y(200.0));
        assert!(!arena.contains_y(-0.1));
        assert!(!arena.contains_y(200.1));
    }
}

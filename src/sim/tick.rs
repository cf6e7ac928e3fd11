//! Per-frame simulation step
//!
//! One tick runs in fixed phases so nothing is removed from the collection
//! while it is being iterated:
//! 1. collisions are judged against the whole pre-tick collection, then every
//!    hit entity is removed at once
//! 2. survivors advance; new shots are queued on the tick context
//! 3. queued shots join the collection and take their first step
//! 4. shots outside the vertical bounds are culled, then win/loss is decided

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::overlaps;
use super::entity::{Entity, EntityKind, Faction, Projectile};
use super::state::{GameEvent, GamePhase, Outcome, Simulation};
use crate::input::InputSource;
use crate::tuning::Tuning;

/// What an entity may see and do while advancing
pub struct TickContext<'a> {
    pub input: &'a dyn InputSource,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
    /// Adversary centers as of the start of the advance phase
    pub lanes: &'a [Vec2],
    /// Shots requested this tick: (spawn point, projectile)
    pub spawns: Vec<(Vec2, Projectile)>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        input: &'a dyn InputSource,
        tuning: &'a Tuning,
        rng: &'a mut Pcg32,
        lanes: &'a [Vec2],
    ) -> Self {
        Self {
            input,
            tuning,
            rng,
            lanes,
            spawns: Vec::new(),
        }
    }

    pub fn spawn(&mut self, center: Vec2, projectile: Projectile) {
        self.spawns.push((center, projectile));
    }

    /// Bernoulli trial. A chance of zero never touches the RNG.
    pub fn roll(&mut self, chance: f32) -> bool {
        chance > 0.0 && self.rng.random::<f32>() < chance
    }
}

/// Advance the simulation by one step
pub fn tick(state: &mut Simulation) {
    if state.is_over() {
        return;
    }
    state.time_ticks += 1;

    let removed = resolve_collisions(&mut state.entities);
    if removed > 0 {
        log::debug!("Tick {}: {} entities destroyed", state.time_ticks, removed);
    }

    let lanes: Vec<Vec2> = state
        .entities
        .iter()
        .filter(|e| e.is_adversary())
        .map(|e| e.center)
        .collect();

    let spawns = {
        let mut ctx = TickContext::new(
            state.input.as_ref(),
            &state.tuning,
            &mut state.rng,
            &lanes,
        );
        for entity in state.entities.iter_mut() {
            entity.advance(&mut ctx);
        }
        ctx.spawns
    };

    let size = state.tuning.projectile_extent();
    for (center, projectile) in spawns {
        let id = state.next_entity_id();
        let mut shot = Entity {
            id,
            center,
            size,
            kind: EntityKind::Projectile(projectile),
        };
        // A shot spawns touching its shooter; stepping it now means the next
        // collision pass sees it clear of the muzzle
        projectile.advance(&mut shot.center);
        if projectile.faction == Faction::Player {
            log::trace!("Player fired projectile {}", id);
            state.events.push(GameEvent::Shot { id });
        }
        state.entities.push(shot);
    }

    cull_projectiles(state);
    evaluate_outcome(state);
}

/// Remove every entity that overlaps any other, judged against the collection
/// as it was before any removal. Returns the number removed.
pub fn resolve_collisions(entities: &mut Vec<Entity>) -> usize {
    let doomed: Vec<bool> = entities
        .iter()
        .map(|a| entities.iter().any(|b| overlaps(a, b)))
        .collect();

    let before = entities.len();
    // retain visits elements in order, exactly once
    let mut flags = doomed.into_iter();
    entities.retain(|_| !flags.next().unwrap_or(false));
    before - entities.len()
}

/// Drop projectiles that left the arena vertically
fn cull_projectiles(state: &mut Simulation) {
    let arena = state.arena;
    state
        .entities
        .retain(|e| !e.is_projectile() || arena.contains_y(e.center.y));
}

fn evaluate_outcome(state: &mut Simulation) {
    let outcome = match state.entities.first() {
        Some(first) if first.is_player() => (state.entities.len() == 1).then_some(Outcome::Won),
        _ => Some(Outcome::Lost),
    };

    if let Some(outcome) = outcome {
        log::info!(
            "Game over after {} ticks: {}",
            state.time_ticks,
            outcome.message()
        );
        state.phase = GamePhase::Over(outcome);
        state.events.push(GameEvent::GameOver(outcome));
    }
}

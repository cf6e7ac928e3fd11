//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (collection order, player first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::{Aabb, lane_blocked, overlaps};
pub use entity::{Adversary, Entity, EntityKind, Faction, Player, Projectile};
pub use state::{Arena, GameEvent, GamePhase, Outcome, Simulation};
pub use tick::{TickContext, resolve_collisions, tick};

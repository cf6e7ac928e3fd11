//! Entity types and their per-tick behavior
//!
//! The variant set is closed (player, adversary, projectile), so an entity is
//! a common header plus an enum payload rather than a trait object.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, lane_blocked};
use super::tick::TickContext;
use crate::input::Key;

/// Which side fired a projectile. Presentation only: collisions ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Adversary,
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Fire has been released since the last shot (edge trigger)
    pub fire_released: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            fire_released: true,
        }
    }
}

impl Player {
    pub fn advance(&mut self, center: &mut Vec2, size: Vec2, ctx: &mut TickContext<'_>) {
        let step = ctx.tuning.player_step;
        // No clamping: the ship may leave the arena sideways
        if ctx.input.is_held(Key::Left) {
            center.x -= step;
        }
        if ctx.input.is_held(Key::Right) {
            center.x += step;
        }

        let fire_held = ctx.input.is_held(Key::Fire);
        if self.fire_released && fire_held {
            self.fire_released = false;
            let muzzle = Vec2::new(center.x, center.y - size.y / 2.0);
            ctx.spawn(
                muzzle,
                Projectile {
                    velocity: Vec2::new(0.0, -ctx.tuning.player_shot_speed),
                    faction: Faction::Player,
                },
            );
        }
        if !fire_held {
            self.fire_released = true;
        }
    }
}

/// A patrolling invader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adversary {
    /// Horizontal distance travelled relative to the spawn point
    pub patrol_x: f32,
    /// Signed horizontal speed (units/tick)
    pub speed_x: f32,
}

impl Adversary {
    pub fn new(speed: f32) -> Self {
        Self {
            patrol_x: 0.0,
            speed_x: speed,
        }
    }

    pub fn advance(&mut self, center: &mut Vec2, size: Vec2, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        // Range is lopsided, so the patrol drifts further right than left
        if self.patrol_x < tuning.patrol_min || self.patrol_x > tuning.patrol_max {
            self.speed_x = -self.speed_x;
        }
        center.x += self.speed_x;
        self.patrol_x += self.speed_x;

        if ctx.roll(tuning.fire_chance) && !lane_blocked(ctx.lanes, *center, size.x) {
            let drift = tuning.shot_drift();
            let vx = if drift > 0.0 {
                ctx.rng.random_range(-drift..drift)
            } else {
                0.0
            };
            ctx.spawn(
                Vec2::new(center.x, center.y + size.y / 2.0),
                Projectile {
                    velocity: Vec2::new(vx, tuning.adversary_shot_speed),
                    faction: Faction::Adversary,
                },
            );
        }
    }
}

/// A shot in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub velocity: Vec2,
    pub faction: Faction,
}

impl Projectile {
    /// Bounds are the simulation's business, not the projectile's
    #[inline]
    pub fn advance(&self, center: &mut Vec2) {
        *center += self.velocity;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityKind {
    Player(Player),
    Adversary(Adversary),
    Projectile(Projectile),
}

/// Anything in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub center: Vec2,
    /// Full extents; the box spans `center ± size / 2`
    pub size: Vec2,
    pub kind: EntityKind,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, self.size)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_adversary(&self) -> bool {
        matches!(self.kind, EntityKind::Adversary(_))
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile(_))
    }

    pub fn faction(&self) -> Faction {
        match self.kind {
            EntityKind::Player(_) => Faction::Player,
            EntityKind::Adversary(_) => Faction::Adversary,
            EntityKind::Projectile(p) => p.faction,
        }
    }

    /// Advance one tick
    pub fn advance(&mut self, ctx: &mut TickContext<'_>) {
        let Entity {
            center, size, kind, ..
        } = self;
        match kind {
            EntityKind::Player(player) => player.advance(center, *size, ctx),
            EntityKind::Adversary(adversary) => adversary.advance(center, *size, ctx),
            EntityKind::Projectile(projectile) => projectile.advance(center),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputSource, Keyboard};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn adversary_at(x: f32, y: f32) -> Entity {
        Entity {
            id: 1,
            center: Vec2::new(x, y),
            size: Vec2::splat(15.0),
            kind: EntityKind::Adversary(Adversary::new(0.3)),
        }
    }

    fn patrol(entity: &Entity) -> Adversary {
        match entity.kind {
            EntityKind::Adversary(a) => a,
            _ => panic!("not an adversary"),
        }
    }

    #[test]
    fn test_projectile_moves_by_velocity() {
        let mut center = Vec2::new(10.0, 10.0);
        let shot = Projectile {
            velocity: Vec2::new(0.25, 2.0),
            faction: Faction::Adversary,
        };
        shot.advance(&mut center);
        shot.advance(&mut center);
        assert_eq!(center, Vec2::new(10.5, 14.0));
    }

    #[test]
    fn test_player_moves_without_clamping() {
        let keyboard = Keyboard::new();
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = Player::default();
        let mut center = Vec2::new(1.0, 100.0);

        keyboard.press(Key::Left);
        let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &[]);
        player.advance(&mut center, tuning.player_extent(), &mut ctx);
        assert_eq!(center.x, -1.0);

        keyboard.press(Key::Right);
        player.advance(&mut center, tuning.player_extent(), &mut ctx);
        assert_eq!(center.x, -1.0, "left and right cancel out");
        assert!(ctx.spawns.is_empty());
    }

    #[test]
    fn test_player_shot_leaves_from_muzzle() {
        let keyboard = Keyboard::new();
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = Player::default();
        let mut center = Vec2::new(150.0, 285.0);

        keyboard.press(Key::Fire);
        let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &[]);
        player.advance(&mut center, tuning.player_extent(), &mut ctx);

        assert_eq!(ctx.spawns.len(), 1);
        let (at, shot) = ctx.spawns[0];
        assert_eq!(at, Vec2::new(150.0, 277.5));
        assert_eq!(shot.velocity, Vec2::new(0.0, -6.0));
        assert_eq!(shot.faction, Faction::Player);
        assert!(!player.fire_released);
        assert!(keyboard.is_held(Key::Fire));
    }

    #[test]
    fn test_patrol_reverses_asymmetrically() {
        let tuning = Tuning {
            fire_chance: 0.0,
            ..Tuning::default()
        };
        let keyboard = Keyboard::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut entity = adversary_at(100.0, 30.0);

        let mut reversals = Vec::new();
        for _ in 0..1000 {
            let before = patrol(&entity);
            let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &[]);
            entity.advance(&mut ctx);
            let after = patrol(&entity);
            if after.speed_x.signum() != before.speed_x.signum() {
                reversals.push(before.patrol_x);
            } else {
                assert!(
                    (tuning.patrol_min..=tuning.patrol_max).contains(&before.patrol_x),
                    "kept direction outside the patrol range at {}",
                    before.patrol_x
                );
            }
            if reversals.len() == 3 {
                break;
            }
        }

        assert_eq!(reversals.len(), 3);
        assert!(reversals[0] > 50.0);
        assert!(reversals[1] < -20.0);
        assert!(reversals[2] > 50.0);
        // Position tracks the patrol offset exactly
        let a = patrol(&entity);
        assert!((entity.center.x - (100.0 + a.patrol_x)).abs() < 1e-2);
    }

    #[test]
    fn test_blocked_adversary_never_fires() {
        let tuning = Tuning {
            fire_chance: 1.0,
            ..Tuning::default()
        };
        let keyboard = Keyboard::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut upper = adversary_at(100.0, 30.0);
        let mut lower = adversary_at(100.0, 60.0);
        lower.id = 2;

        // Both patrol in lockstep, so the column stays shared across a full
        // sweep of the patrol range
        for step in 0..500 {
            let lanes = [upper.center, lower.center];
            let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &lanes);
            upper.advance(&mut ctx);
            assert!(ctx.spawns.is_empty(), "upper fired on step {}", step);
            lower.advance(&mut ctx);
            assert_eq!(ctx.spawns.len(), 1);
            assert_eq!(ctx.spawns[0].0.y, 67.5);
        }
        assert_eq!(upper.center, Vec2::new(lower.center.x, 30.0));
    }

    #[test]
    fn test_huge_drift_still_fires() {
        let tuning = Tuning {
            fire_chance: 1.0,
            adversary_shot_drift: 3e38,
            ..Tuning::default()
        };
        let keyboard = Keyboard::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut lone = adversary_at(100.0, 30.0);
        let lanes = [lone.center];

        let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &lanes);
        for _ in 0..20 {
            lone.advance(&mut ctx);
        }
        assert_eq!(ctx.spawns.len(), 20);
        let limit = tuning.shot_drift();
        for (_, shot) in &ctx.spawns {
            assert!(shot.velocity.x.is_finite());
            assert!((-limit..limit).contains(&shot.velocity.x));
        }
    }

    #[test]
    fn test_unblocked_adversary_fires_downward() {
        let tuning = Tuning {
            fire_chance: 1.0,
            ..Tuning::default()
        };
        let keyboard = Keyboard::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut lone = adversary_at(100.0, 30.0);
        let lanes = [Vec2::new(100.0, 30.0)];

        let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &lanes);
        for _ in 0..50 {
            lone.advance(&mut ctx);
        }
        assert_eq!(ctx.spawns.len(), 50);
        for (at, shot) in &ctx.spawns {
            assert_eq!(at.y, 37.5);
            assert_eq!(shot.velocity.y, 2.0);
            assert!((-0.5..0.5).contains(&shot.velocity.x));
            assert_eq!(shot.faction, Faction::Adversary);
        }
    }

    #[test]
    fn test_zero_fire_chance_never_fires() {
        let tuning = Tuning {
            fire_chance: 0.0,
            ..Tuning::default()
        };
        let keyboard = Keyboard::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut lone = adversary_at(100.0, 30.0);

        let mut ctx = TickContext::new(&keyboard, &tuning, &mut rng, &[]);
        for _ in 0..10_000 {
            lone.advance(&mut ctx);
        }
        assert!(ctx.spawns.is_empty());
    }
}

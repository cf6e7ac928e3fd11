//! Data-driven game balance
//!
//! Every gameplay constant lives here so a session can be rebalanced from a
//! JSON file without recompiling. Missing fields fall back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Largest accepted horizontal drift for adversary shots (units/tick)
pub const MAX_SHOT_DRIFT: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player box (full extents)
    pub player_size: f32,
    /// Horizontal distance per tick while Left/Right is held
    pub player_step: f32,
    /// Upward speed of player shots (units/tick)
    pub player_shot_speed: f32,

    /// Adversary box (full extents)
    pub adversary_size: f32,
    /// Patrol speed magnitude (units/tick)
    pub adversary_speed: f32,
    /// Patrol reverses once `patrol_x` leaves [patrol_min, patrol_max]
    pub patrol_min: f32,
    pub patrol_max: f32,
    /// Per-tick probability that an unblocked adversary fires
    pub fire_chance: f32,
    /// Downward speed of adversary shots (units/tick)
    pub adversary_shot_speed: f32,
    /// Adversary shots get a horizontal velocity in [-drift, drift)
    pub adversary_shot_drift: f32,

    /// Projectile box (full extents)
    pub projectile_size: f32,

    /// Adversary grid layout
    pub grid_columns: u32,
    pub grid_rows: u32,
    pub grid_origin: f32,
    pub grid_spacing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 15.0,
            player_step: 2.0,
            player_shot_speed: 6.0,

            adversary_size: 15.0,
            adversary_speed: 0.3,
            patrol_min: -20.0,
            patrol_max: 50.0,
            fire_chance: 0.005,
            adversary_shot_speed: 2.0,
            adversary_shot_drift: 0.5,

            projectile_size: 2.0,

            grid_columns: 8,
            grid_rows: 3,
            grid_origin: 30.0,
            grid_spacing: 30.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (fields not present keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        if !(0.0..=MAX_SHOT_DRIFT).contains(&tuning.adversary_shot_drift) {
            return Err(serde::de::Error::custom(format!(
                "adversary_shot_drift must be within [0, {}], got {}",
                MAX_SHOT_DRIFT, tuning.adversary_shot_drift
            )));
        }
        Ok(tuning)
    }

    /// Shot drift usable as a sampling range, whatever the field holds
    pub fn shot_drift(&self) -> f32 {
        if self.adversary_shot_drift.is_nan() {
            0.0
        } else {
            self.adversary_shot_drift.clamp(0.0, MAX_SHOT_DRIFT)
        }
    }

    pub fn player_extent(&self) -> Vec2 {
        Vec2::splat(self.player_size)
    }

    pub fn adversary_extent(&self) -> Vec2 {
        Vec2::splat(self.adversary_size)
    }

    pub fn projectile_extent(&self) -> Vec2 {
        Vec2::splat(self.projectile_size)
    }

    /// Number of adversaries spawned at the start of a session
    pub fn grid_size(&self) -> usize {
        (self.grid_columns * self.grid_rows) as usize
    }

    /// Grid cell centers in row-major order
    pub fn grid_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.grid_rows).flat_map(move |row| {
            (0..self.grid_columns).map(move |col| {
                Vec2::new(
                    self.grid_origin + col as f32 * self.grid_spacing,
                    self.grid_origin + row as f32 * self.grid_spacing,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_eight_by_three() {
        let tuning = Tuning::default();
        let cells: Vec<Vec2> = tuning.grid_positions().collect();
        assert_eq!(cells.len(), 24);
        assert_eq!(tuning.grid_size(), 24);
        assert_eq!(cells[0], Vec2::new(30.0, 30.0));
        assert_eq!(cells[7], Vec2::new(240.0, 30.0));
        assert_eq!(cells[23], Vec2::new(240.0, 90.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "fire_chance": 1.0, "grid_rows": 1 }"#).unwrap();
        assert_eq!(tuning.fire_chance, 1.0);
        assert_eq!(tuning.grid_rows, 1);
        assert_eq!(tuning.player_step, 2.0);
        assert_eq!(tuning.patrol_max, 50.0);
    }

    #[test]
    fn test_out_of_range_drift_is_rejected() {
        assert!(Tuning::from_json(r#"{ "adversary_shot_drift": 3e38 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "adversary_shot_drift": -1.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "adversary_shot_drift": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_shot_drift_is_clamped() {
        let wild = Tuning {
            adversary_shot_drift: 3e38,
            ..Tuning::default()
        };
        assert_eq!(wild.shot_drift(), MAX_SHOT_DRIFT);

        let negative = Tuning {
            adversary_shot_drift: -2.0,
            ..Tuning::default()
        };
        assert_eq!(negative.shot_drift(), 0.0);
        assert_eq!(Tuning::default().shot_drift(), 0.5);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ fire_chance: }").is_err());
        assert!(Tuning::from_json(r#"{ "grid_rows": "three" }"#).is_err());
    }
}

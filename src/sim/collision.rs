//! Axis-aligned box overlap
//!
//! Everything in the arena is a rectangle, so collision is a plain interval
//! test on each axis. Touching edges count as contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centered at `center` with full extents `size`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True unless the boxes are separated along x or y
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.max.y < other.min.y
            || self.min.x > other.max.x
            || self.min.y > other.max.y)
    }
}

/// Do two entities collide? An entity never collides with itself.
///
/// Faction is deliberately not considered: a shot hits whatever it touches,
/// including entities on the shooter's own side.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    a.id != b.id && a.bounds().intersects(&b.bounds())
}

/// Is any position in `lanes` strictly below `center` and within half of
/// `width` horizontally? Used by adversaries to avoid shooting their own.
pub fn lane_blocked(lanes: &[Vec2], center: Vec2, width: f32) -> bool {
    lanes
        .iter()
        .any(|other| other.y > center.y && (other.x - center.x).abs() < width / 2.0)
}

//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{Aabb, Entity, EntityKind, Faction};
use crate::settings::Settings;

/// Fill and clear colors for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub player: [f32; 4],
    pub adversary: [f32; 4],
    pub player_shot: [f32; 4],
    pub adversary_shot: [f32; 4],
    pub background: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            player: colors::PLAYER,
            adversary: colors::ADVERSARY,
            player_shot: colors::PLAYER_SHOT,
            adversary_shot: colors::ADVERSARY_SHOT,
            background: colors::BACKGROUND,
        }
    }
}

impl Palette {
    pub fn high_contrast() -> Self {
        let fg = colors::HIGH_CONTRAST_FG;
        Self {
            player: fg,
            adversary: fg,
            player_shot: fg,
            adversary_shot: fg,
            background: colors::HIGH_CONTRAST_BG,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self::high_contrast()
        } else {
            Self::default()
        }
    }

    pub fn color_for(&self, entity: &Entity) -> [f32; 4] {
        match entity.kind {
            EntityKind::Player(_) => self.player,
            EntityKind::Adversary(_) => self.adversary,
            EntityKind::Projectile(p) => match p.faction {
                Faction::Player => self.player_shot,
                Faction::Adversary => self.adversary_shot,
            },
        }
    }
}

/// Generate vertices for a filled axis-aligned rectangle (two triangles)
pub fn rect(bounds: &Aabb, color: [f32; 4]) -> [Vertex; 6] {
    let Aabb { min, max } = *bounds;
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);

    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(top_right.x, top_right.y, color),
        Vertex::new(bottom_left.x, bottom_left.y, color),
        Vertex::new(bottom_left.x, bottom_left.y, color),
        Vertex::new(top_right.x, top_right.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// One rectangle per entity, in arena coordinates
pub fn entity_vertices(entities: &[Entity], palette: &Palette) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(entities.len() * 6);
    for entity in entities {
        vertices.extend_from_slice(&rect(&entity.bounds(), palette.color_for(entity)));
    }
    vertices
}

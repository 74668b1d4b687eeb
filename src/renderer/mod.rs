//! Presentation layer
//!
//! The simulation knows nothing about drawing. Hosts implement [`Scene`] and
//! let a [`Presenter`] translate drained `GameEvent`s into scene and audio
//! calls.

pub mod log_scene;
pub mod presenter;

pub use log_scene::LogScene;
pub use presenter::Presenter;

use glam::Vec3;

use crate::consts::PLAYER_COLOR;
use crate::sim::{EntityId, EntityKind, PowerUpKind};

/// Projectile tint
pub const PROJECTILE_COLOR: u32 = 0xffff00;

/// What a scene needs to create a visual
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub kind: EntityKind,
    pub pos: Vec3,
    pub color: u32,
    /// Box edge or sphere radius, depending on kind
    pub size: f32,
}

impl Visual {
    pub fn new(kind: EntityKind, pos: Vec3) -> Self {
        let (color, size) = match kind {
            EntityKind::Player => (PLAYER_COLOR, 0.5),
            EntityKind::SquadMember => (PowerUpKind::Squad.color(), 0.5),
            EntityKind::Enemy(enemy) => (enemy.color(), enemy.size()),
            EntityKind::PowerUp(power_up) => (power_up.color(), 0.3),
            EntityKind::Projectile => (PROJECTILE_COLOR, 0.1),
        };
        Self {
            kind,
            pos,
            color,
            size,
        }
    }
}

/// Scene failures. The presenter logs them and keeps going.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("no visual for entity {0}")]
    UnknownVisual(EntityId),
    #[error("entity {0} already has a visual")]
    DuplicateVisual(EntityId),
    #[error("scene is full ({limit} visuals)")]
    CapacityExceeded { limit: usize },
}

/// Narrow contract a rendering host implements
pub trait Scene {
    fn add_visual(&mut self, id: EntityId, visual: Visual) -> Result<(), SceneError>;

    fn remove_visual(&mut self, id: EntityId) -> Result<(), SceneError>;

    fn set_position(&mut self, id: EntityId, pos: Vec3) -> Result<(), SceneError>;

    fn set_color(&mut self, id: EntityId, color: u32) -> Result<(), SceneError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SceneError::UnknownVisual(EntityId(4)).to_string(),
            "no visual for entity 4"
        );
        assert_eq!(
            SceneError::DuplicateVisual(EntityId(9)).to_string(),
            "entity 9 already has a visual"
        );
        assert_eq!(
            SceneError::CapacityExceeded { limit: 1 }.to_string(),
            "scene is full (1 visuals)"
        );
    }

    #[test]
    fn test_visual_defaults_follow_kind() {
        let boss = Visual::new(EntityKind::Enemy(EnemyKind::Boss), Vec3::ZERO);
        assert_eq!(boss.color, EnemyKind::Boss.color());
        assert_eq!(boss.size, EnemyKind::Boss.size());
        assert_eq!(Visual::new(EntityKind::Projectile, Vec3::ZERO).color, PROJECTILE_COLOR);
    }
}

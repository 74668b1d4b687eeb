//! Enemies advancing down the lane

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::powerup::PowerUpKind;
use crate::consts::*;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Normal,
    /// Drops exactly one power-up on death
    Carrier,
    Boss,
}

impl EnemyKind {
    pub fn max_health(&self) -> i32 {
        match self {
            EnemyKind::Normal => 20,
            EnemyKind::Carrier => 50,
            EnemyKind::Boss => 800,
        }
    }

    /// Damage dealt to the player on contact
    pub fn damage(&self) -> i32 {
        match self {
            EnemyKind::Normal => 5,
            EnemyKind::Carrier => 10,
            EnemyKind::Boss => 50,
        }
    }

    /// Advance per tick along +Z
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.02,
            EnemyKind::Carrier => 0.015,
            EnemyKind::Boss => 0.02,
        }
    }

    /// Cube size, doubles as collision radius
    pub fn size(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.6,
            EnemyKind::Carrier => 0.8,
            EnemyKind::Boss => 1.2,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Normal => 0xff4444,
            EnemyKind::Carrier => 0xff00ff,
            EnemyKind::Boss => 0xff0000,
        }
    }

    /// Score for destroying one
    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Normal => 10,
            EnemyKind::Carrier => 30,
            EnemyKind::Boss => 100,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "normal",
            EnemyKind::Carrier => "carrier",
            EnemyKind::Boss => "boss",
        }
    }
}

/// How to spawn an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    /// Lateral position
    pub x: f32,
    /// Carrier drop override; a random type is rolled when `None`
    pub forced_drop: Option<PowerUpKind>,
    /// Multiplier over the base speed
    pub speed_scale: f32,
}

impl EnemySpawn {
    pub fn new(kind: EnemyKind, x: f32) -> Self {
        Self {
            kind,
            x,
            forced_drop: None,
            speed_scale: 1.0,
        }
    }

    pub fn with_drop(mut self, kind: PowerUpKind) -> Self {
        self.forced_drop = Some(kind);
        self
    }

    pub fn with_speed_scale(mut self, scale: f32) -> Self {
        self.speed_scale = scale;
        self
    }
}

/// Result of the damage that finished an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub id: EntityId,
    pub kind: EnemyKind,
    /// Last position before destruction
    pub pos: Vec3,
    /// Power-up to deposit at `pos`
    pub drop: Option<PowerUpKind>,
}

impl Kill {
    pub fn points(&self) -> u64 {
        self.kind.points()
    }
}

/// An enemy in the lane
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec3,
    pub health: i32,
    pub damage: i32,
    pub speed: f32,
    pub size: f32,
    pub forced_drop: Option<PowerUpKind>,
    active: bool,
}

impl Enemy {
    pub fn new(id: EntityId, spawn: EnemySpawn) -> Self {
        let kind = spawn.kind;
        let size = kind.size();
        Self {
            id,
            kind,
            pos: Vec3::new(spawn.x, size / 2.0 + 0.2, ENEMY_SPAWN_Z),
            health: kind.max_health(),
            damage: kind.damage(),
            speed: kind.speed() * spawn.speed_scale.max(0.0),
            size,
            forced_drop: spawn.forced_drop,
            active: true,
        }
    }

    /// Place the enemy somewhere other than the spawn line
    pub fn at(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn is_carrier(&self) -> bool {
        self.kind == EnemyKind::Carrier
    }

    /// Advance one tick.
    ///
    /// Returns `true` when the enemy crossed the boundary plane; it is destroyed
    /// in that case and the caller must end the run.
    pub fn update(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.pos.z += self.speed;
        if self.pos.z > BOUNDARY_Z {
            log::info!("{} enemy {:?} crossed the bridge", self.kind.as_str(), self.id);
            self.destroy();
            return true;
        }
        false
    }

    /// Apply damage. Returns the kill if this hit finished the enemy.
    pub fn take_damage<R: Rng + ?Sized>(&mut self, amount: i32, rng: &mut R) -> Option<Kill> {
        if !self.active {
            return None;
        }
        self.health -= amount.max(0);
        if self.health > 0 {
            return None;
        }

        let drop = if self.is_carrier() {
            Some(self.forced_drop.unwrap_or_else(|| {
                PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())]
            }))
        } else {
            None
        };
        if let Some(kind) = drop {
            log::debug!("Carrier {:?} dropping {}", self.id, kind.as_str());
        }
        self.destroy();

        Some(Kill {
            id: self.id,
            kind: self.kind,
            pos: self.pos,
            drop,
        })
    }

    /// Whether a point is inside this enemy's collision radius
    pub fn touches(&self, point: Vec3) -> bool {
        self.active && self.pos.distance(point) < self.size
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.pos
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn destroy(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

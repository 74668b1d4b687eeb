//! Events emitted by the simulation for presentation layers

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::entity::EntityId;
use super::powerup::PowerUpKind;

/// What kind of visual an entity needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    SquadMember,
    Enemy(EnemyKind),
    PowerUp(PowerUpKind),
    Projectile,
}

/// Something observable happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind, pos: Vec3 },
    Despawned { id: EntityId },
    /// One trigger of the auto-fire cadence
    ShotFired { projectiles: u32 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    EnemyKilled { id: EntityId, kind: EnemyKind, points: u64 },
    PlayerHit { damage: i32, health: i32 },
    /// Tint to apply to the player
    PlayerColor { color: u32 },
    WaveSizeRaised { wave_size: u32 },
    PauseChanged { paused: bool },
    GameOver { reason: String },
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers run on the simulation clock, never the wall clock
//! - No rendering or audio calls (presentation consumes `GameEvent`s)

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{CombatReport, resolve_collisions};
pub use enemy::{Enemy, EnemyKind, EnemySpawn, Kill};
pub use entity::{Entity, EntityId, IdAllocator, retain_active};
pub use events::{EntityKind, GameEvent};
pub use player::{ActiveSquad, ActiveWeapon, InputState, Player, SquadMember};
pub use powerup::{PowerUp, PowerUpEffect, PowerUpKind, PowerUpPayload, WeaponProfile};
pub use projectile::Projectile;
pub use spawner::{CarrierCooldowns, Spawner};
pub use state::{GamePhase, GameState, SimContext, REASON_BOUNDARY, REASON_PLAYER_DIED};
pub use tick::{InputEvent, TickInput, tick};
pub use timers::{TimerKey, Timers};

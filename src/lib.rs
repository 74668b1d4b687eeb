//! Bridge Defense - a lane shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, timers, collisions, spawning)
//! - `renderer`: Scene contract and the presenter that feeds it
//! - `platform`: Input mapping and frame pacing
//! - `tuning`: Data-driven game balance
//! - `hud`: Pull-based HUD snapshot

pub mod audio;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, SoundEffect};
pub use hud::HudSnapshot;
pub use settings::{Difficulty, Settings};
pub use tuning::GameConfig;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lane half width: the player is clamped to [-LANE_HALF_WIDTH, LANE_HALF_WIDTH]
    pub const LANE_HALF_WIDTH: f32 = 2.5;
    /// Projectiles past this lateral distance have left the playfield
    pub const PLAYFIELD_HALF_WIDTH: f32 = 6.0;
    /// Projectiles beyond this depth have left the playfield
    pub const PLAYFIELD_FAR_Z: f32 = -10.0;
    /// Depth at which enemies enter the lane
    pub const ENEMY_SPAWN_Z: f32 = -9.0;
    /// Crossing this plane means an enemy reached the player's side
    pub const BOUNDARY_Z: f32 = 9.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 0.0;
    pub const PLAYER_Y: f32 = 0.5;
    pub const PLAYER_Z: f32 = 8.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_MOVE_SPEED: f32 = 0.1;
    pub const BASE_DAMAGE: i32 = 20;
    pub const BASE_FIRE_RATE_MS: u64 = 50;
    /// Lowest fire rate accepted from configuration or power-ups
    pub const MIN_FIRE_RATE_MS: u64 = 10;
    pub const PLAYER_COLOR: u32 = 0x00ff00;

    /// Squad members sit on a circle of this radius around the player
    pub const SQUAD_RADIUS: f32 = 0.8;

    /// Projectile travel per tick
    pub const PROJECTILE_SPEED: f32 = 0.3;

    /// Pickups float at this height
    pub const PICKUP_Y: f32 = 0.5;
    /// Pickup touch radius in the XZ plane
    pub const PICKUP_RADIUS: f32 = 0.8;
    /// Pickup touch tolerance along Y
    pub const PICKUP_HEIGHT_TOLERANCE: f32 = 0.5;
    /// Uncollected pickups vanish after this long
    pub const PICKUP_DESPAWN_MS: u64 = 5000;

    /// Score for walking into a pickup
    pub const PICKUP_SCORE: u64 = 15;
}

/// Distance between two points projected on the XZ (ground) plane
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Unit direction for a shot fanned out by `spread` radians from straight ahead (-Z)
#[inline]
pub fn spread_direction(spread: f32) -> Vec3 {
    Vec3::new(spread.sin(), 0.0, -1.0).normalize()
}

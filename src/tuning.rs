//! Data-driven game balance
//!
//! Every knob has a default matching the stock game. Values loaded from JSON
//! pass through [`GameConfig::sanitized`], which clamps anything unusable and
//! logs what it changed; bad tuning never reaches the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PowerUpKind;

/// Player baseline stats (restored when a weapon power-up expires)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub damage: i32,
    pub fire_rate_ms: u64,
    pub move_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            damage: BASE_DAMAGE,
            fire_rate_ms: BASE_FIRE_RATE_MS,
            move_speed: PLAYER_MOVE_SPEED,
        }
    }
}

/// How carrier enemies are scheduled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CarrierCadence {
    /// One carrier with a random drop every `interval_ms`
    Fixed { interval_ms: u64 },
    /// Each power-up type has its own cooldown; every `check_interval_ms` the
    /// type furthest past its cooldown gets a carrier
    PerType {
        check_interval_ms: u64,
        cooldowns: Vec<(PowerUpKind, u64)>,
    },
}

impl Default for CarrierCadence {
    fn default() -> Self {
        CarrierCadence::PerType {
            check_interval_ms: 1000,
            cooldowns: vec![
                (PowerUpKind::Gatling, 30_000),
                (PowerUpKind::Ak47, 45_000),
                (PowerUpKind::Bazooka, 90_000),
                (PowerUpKind::Grenade, 60_000),
                (PowerUpKind::Squad, 360_000),
            ],
        }
    }
}

/// Full balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    /// Time between waves
    pub wave_interval_ms: u64,
    /// Enemies per wave at the start of a run
    pub initial_wave_size: u32,
    /// Enemies per batch within a wave
    pub wave_batch_size: u32,
    /// Delay between batches of a wave
    pub wave_batch_delay_ms: u64,
    /// Chance that each scheduled enemy actually spawns
    pub spawn_chance: f64,
    /// Time between difficulty raises
    pub difficulty_interval_ms: u64,
    /// Wave size added per raise
    pub wave_size_increment: u32,
    pub max_wave_size: u32,
    pub carrier: CarrierCadence,
    pub boss_interval_ms: u64,
    /// Speed multiplier applied to every enemy
    pub enemy_speed_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            wave_interval_ms: 5_000,
            initial_wave_size: 30,
            wave_batch_size: 5,
            wave_batch_delay_ms: 1_000,
            spawn_chance: 0.9,
            difficulty_interval_ms: 120_000,
            wave_size_increment: 20,
            max_wave_size: 150,
            carrier: CarrierCadence::default(),
            boss_interval_ms: 480_000,
            enemy_speed_scale: 1.0,
        }
    }
}

/// Replace `value` with `fallback` when it fails `is_valid`, logging the fix
fn clamp_field<T: std::fmt::Debug + Copy>(
    name: &str,
    value: &mut T,
    is_valid: impl FnOnce(&T) -> bool,
    fallback: T,
) {
    if !is_valid(value) {
        log::warn!("Invalid {} {:?}, using {:?}", name, value, fallback);
        *value = fallback;
    }
}

impl GameConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse from JSON, falling back to defaults on any error
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded game config");
                config
            }
            Err(e) => {
                log::warn!("Bad game config ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp every value into its usable range
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        let positive = |v: &f32| v.is_finite() && *v > 0.0;

        let p = &mut self.player;
        clamp_field("player damage", &mut p.damage, |v| *v > 0, d.player.damage);
        clamp_field(
            "player fire rate",
            &mut p.fire_rate_ms,
            |v| *v >= MIN_FIRE_RATE_MS,
            d.player.fire_rate_ms,
        );
        clamp_field("player move speed", &mut p.move_speed, positive, d.player.move_speed);

        clamp_field("wave interval", &mut self.wave_interval_ms, |v| *v > 0, d.wave_interval_ms);
        clamp_field("wave batch size", &mut self.wave_batch_size, |v| *v > 0, d.wave_batch_size);
        clamp_field(
            "spawn chance",
            &mut self.spawn_chance,
            |v| (0.0..=1.0).contains(v),
            d.spawn_chance,
        );
        clamp_field(
            "difficulty interval",
            &mut self.difficulty_interval_ms,
            |v| *v > 0,
            d.difficulty_interval_ms,
        );
        clamp_field("boss interval", &mut self.boss_interval_ms, |v| *v > 0, d.boss_interval_ms);
        clamp_field("enemy speed scale", &mut self.enemy_speed_scale, positive, d.enemy_speed_scale);
        let initial = self.initial_wave_size;
        clamp_field("max wave size", &mut self.max_wave_size, |v| *v >= initial, initial);

        let carrier_ok = match &self.carrier {
            CarrierCadence::Fixed { interval_ms } => *interval_ms > 0,
            CarrierCadence::PerType {
                check_interval_ms,
                cooldowns,
            } => *check_interval_ms > 0 && !cooldowns.is_empty(),
        };
        if !carrier_ok {
            log::warn!("Invalid carrier cadence {:?}, using default", self.carrier);
            self.carrier = d.carrier;
        }

        self
    }
}

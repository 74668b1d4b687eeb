//! Spawn scheduler: waves, difficulty ramp, carriers and bosses
//!
//! Four periodic processes run on the shared [`Timers`]:
//! - `Wave`: every wave interval, queue the wave as delayed batches
//! - `Difficulty`: grow the wave size up to a cap
//! - `Carrier`: power-up carriers, fixed interval or per-type cooldowns
//! - `Boss`: one boss per boss interval
//!
//! They are torn down together on pause/game over and relaunched together on
//! resume. The spawner also owns the enemy and pickup collections.

use glam::Vec3;
use rand::Rng;

use super::enemy::{Enemy, EnemyKind, EnemySpawn};
use super::entity::{Entity, EntityId, retain_active};
use super::events::{EntityKind, GameEvent};
use super::powerup::{PowerUp, PowerUpKind};
use super::state::SimContext;
use super::timers::TimerKey;
use crate::consts::*;
use crate::tuning::{CarrierCadence, GameConfig};

/// Cooldown bookkeeping for one power-up type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CooldownEntry {
    kind: PowerUpKind,
    cooldown_ms: u64,
    last_spawn_ms: u64,
}

/// Per-type carrier cooldowns with oldest-deficit-first selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierCooldowns {
    entries: Vec<CooldownEntry>,
}

impl CarrierCooldowns {
    /// All types start their cooldown at `now_ms`
    pub fn new(cooldowns: &[(PowerUpKind, u64)], now_ms: u64) -> Self {
        Self {
            entries: cooldowns
                .iter()
                .map(|&(kind, cooldown_ms)| CooldownEntry {
                    kind,
                    cooldown_ms,
                    last_spawn_ms: now_ms,
                })
                .collect(),
        }
    }

    /// Pretend `kind` last spawned at `at_ms`
    pub fn set_last_spawn(&mut self, kind: PowerUpKind, at_ms: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.last_spawn_ms = at_ms;
        }
    }

    /// How far past its cooldown `kind` is (negative while cooling down)
    pub fn deficit(&self, kind: PowerUpKind, now_ms: u64) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| Self::entry_deficit(e, now_ms))
    }

    fn entry_deficit(entry: &CooldownEntry, now_ms: u64) -> i64 {
        now_ms as i64 - entry.last_spawn_ms as i64 - entry.cooldown_ms as i64
    }

    /// The eligible type that has waited longest past its cooldown.
    /// Ties go to the type listed first.
    pub fn pick_due(&self, now_ms: u64) -> Option<PowerUpKind> {
        let mut best: Option<(i64, PowerUpKind)> = None;
        for entry in &self.entries {
            let deficit = Self::entry_deficit(entry, now_ms);
            if deficit < 0 {
                continue;
            }
            if best.is_none_or(|(top, _)| deficit > top) {
                best = Some((deficit, entry.kind));
            }
        }
        best.map(|(_, kind)| kind)
    }

    pub fn mark_spawned(&mut self, kind: PowerUpKind, now_ms: u64) {
        self.set_last_spawn(kind, now_ms);
    }
}

/// Owns enemies and pickups, and runs the spawn cadences
#[derive(Debug, Clone)]
pub struct Spawner {
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Normal enemies per wave
    pub wave_size: u32,
    /// Waves launched so far
    pub waves_launched: u32,
    cooldowns: Option<CarrierCooldowns>,
    config: GameConfig,
    running: bool,
}

impl Spawner {
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        let cooldowns = match &config.carrier {
            CarrierCadence::PerType { cooldowns, .. } => Some(CarrierCooldowns::new(cooldowns, now_ms)),
            CarrierCadence::Fixed { .. } => None,
        };
        Self {
            enemies: Vec::new(),
            power_ups: Vec::new(),
            wave_size: config.initial_wave_size,
            waves_launched: 0,
            cooldowns,
            config: config.clone(),
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cooldowns(&self) -> Option<&CarrierCooldowns> {
        self.cooldowns.as_ref()
    }

    /// Launch all four cadences, each starting a full period from now
    pub fn start(&mut self, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        let carrier_period = match &self.config.carrier {
            CarrierCadence::Fixed { interval_ms } => *interval_ms,
            CarrierCadence::PerType { check_interval_ms, .. } => *check_interval_ms,
        };
        ctx.timers.schedule_every(TimerKey::Wave, now, self.config.wave_interval_ms);
        ctx.timers
            .schedule_every(TimerKey::Difficulty, now, self.config.difficulty_interval_ms);
        ctx.timers.schedule_every(TimerKey::Carrier, now, carrier_period);
        ctx.timers.schedule_every(TimerKey::Boss, now, self.config.boss_interval_ms);
        self.running = true;
        log::debug!("Spawner started at {}ms", now);
    }

    /// Cancel every spawner task, including queued wave batches
    pub fn stop(&mut self, ctx: &mut SimContext) {
        let canceled = ctx.timers.cancel_where(TimerKey::is_spawner);
        self.running = false;
        log::debug!("Spawner stopped ({} tasks canceled)", canceled);
    }

    /// Run a due spawner task. Keys that aren't spawner keys are ignored.
    pub fn handle<R: Rng + ?Sized>(&mut self, key: TimerKey, rng: &mut R, ctx: &mut SimContext) {
        match key {
            TimerKey::Wave => self.launch_wave(ctx),
            TimerKey::WaveBatch { count, .. } => self.spawn_batch(count, rng, ctx),
            TimerKey::Difficulty => self.raise_difficulty(ctx),
            TimerKey::Carrier => self.carrier_tick(rng, ctx),
            TimerKey::Boss => {
                log::info!("Boss spawned!");
                let x = rng.random_range(-LANE_HALF_WIDTH..=LANE_HALF_WIDTH);
                self.spawn_enemy(EnemySpawn::new(EnemyKind::Boss, x), ctx);
            }
            _ => {}
        }
    }

    /// Queue the current wave as batches spread over time
    fn launch_wave(&mut self, ctx: &mut SimContext) {
        self.waves_launched += 1;
        let wave = self.waves_launched;
        let batch_size = self.config.wave_batch_size.max(1);

        let mut remaining = self.wave_size;
        let mut batch = 0;
        while remaining > 0 {
            let count = remaining.min(batch_size);
            ctx.timers.schedule_once(
                TimerKey::WaveBatch { wave, batch, count },
                ctx.now_ms,
                batch as u64 * self.config.wave_batch_delay_ms,
            );
            remaining -= count;
            batch += 1;
        }
        log::debug!("Wave {} queued: {} enemies in {} batches", wave, self.wave_size, batch);
    }

    fn spawn_batch<R: Rng + ?Sized>(&mut self, count: u32, rng: &mut R, ctx: &mut SimContext) {
        for _ in 0..count {
            if !rng.random_bool(self.config.spawn_chance) {
                continue;
            }
            let x = rng.random_range(-LANE_HALF_WIDTH..=LANE_HALF_WIDTH);
            self.spawn_enemy(EnemySpawn::new(EnemyKind::Normal, x), ctx);
        }
    }

    fn raise_difficulty(&mut self, ctx: &mut SimContext) {
        let raised = self
            .wave_size
            .saturating_add(self.config.wave_size_increment)
            .min(self.config.max_wave_size);
        if raised != self.wave_size {
            self.wave_size = raised;
            log::info!("Difficulty raised! Wave size now {}", raised);
            ctx.events.push(GameEvent::WaveSizeRaised { wave_size: raised });
        }
    }

    fn carrier_tick<R: Rng + ?Sized>(&mut self, rng: &mut R, ctx: &mut SimContext) {
        let x = rng.random_range(-LANE_HALF_WIDTH..=LANE_HALF_WIDTH);
        let spawn = match self.cooldowns.as_mut() {
            None => EnemySpawn::new(EnemyKind::Carrier, x),
            Some(cooldowns) => {
                let Some(kind) = cooldowns.pick_due(ctx.now_ms) else {
                    return;
                };
                cooldowns.mark_spawned(kind, ctx.now_ms);
                EnemySpawn::new(EnemyKind::Carrier, x).with_drop(kind)
            }
        };
        log::info!("Carrier spawned (drop: {:?})", spawn.forced_drop);
        self.spawn_enemy(spawn, ctx);
    }

    /// Add an enemy to the lane
    pub fn spawn_enemy(&mut self, spawn: EnemySpawn, ctx: &mut SimContext) -> EntityId {
        let id = ctx.ids.next_id();
        let spawn = spawn.with_speed_scale(spawn.speed_scale * self.config.enemy_speed_scale);
        let enemy = Enemy::new(id, spawn);
        ctx.events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Enemy(enemy.kind),
            pos: enemy.pos,
        });
        self.enemies.push(enemy);
        id
    }

    /// Drop a pickup at `pos` and arm its despawn timeout
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec3, ctx: &mut SimContext) -> EntityId {
        let id = ctx.ids.next_id();
        let power_up = PowerUp::new(id, kind, pos);
        ctx.events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::PowerUp(kind),
            pos: power_up.pos,
        });
        self.power_ups.push(power_up);
        ctx.timers
            .schedule_once(TimerKey::Despawn(id), ctx.now_ms, PICKUP_DESPAWN_MS);
        id
    }

    /// Despawn timeout callback. No-op if the pickup is already gone.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(power_up) = self.power_ups.iter_mut().find(|p| p.id == id)
            && power_up.destroy()
        {
            log::debug!("Power-up {:?} despawned uncollected", id);
        }
    }

    /// Advance enemies and pickups one tick.
    /// Returns `true` if any enemy crossed the boundary.
    pub fn update(&mut self) -> bool {
        let mut crossed = false;
        for enemy in &mut self.enemies {
            crossed |= enemy.update();
        }
        for power_up in &mut self.power_ups {
            power_up.update();
        }
        crossed
    }

    /// Remove inactive entities, cancelling leftover despawn timers
    pub fn cleanup(&mut self, ctx: &mut SimContext) {
        let mut removed = retain_active(&mut self.enemies);
        for id in retain_active(&mut self.power_ups) {
            ctx.timers.cancel(TimerKey::Despawn(id));
            removed.push(id);
        }
        ctx.events
            .extend(removed.into_iter().map(|id| GameEvent::Despawned { id }));
    }

    /// Destroy everything (end of run)
    pub fn clear(&mut self, ctx: &mut SimContext) {
        for enemy in &mut self.enemies {
            enemy.destroy();
        }
        for power_up in &mut self.power_ups {
            power_up.destroy();
        }
        self.cleanup(ctx);
    }
}

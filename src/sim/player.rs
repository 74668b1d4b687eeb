//! The player: movement, auto-fire and power-up slots
//!
//! Power-ups occupy two independent slots:
//! - weapon slot: at most one of gatling/ak47/bazooka/grenade. A different
//!   weapon overrides the current one (its expiry timer is canceled); the same
//!   weapon refreshes the expiry in place.
//! - squad slot: escorts on a circle around the player. Re-collecting squad
//!   while active only refreshes the expiry.
//!
//! Every expiry lives in [`Timers`] under `TimerKey::PowerUpExpiry(kind)`, so a
//! refresh can never leave a second timer behind.

use glam::Vec3;

use super::entity::EntityId;
use super::events::{EntityKind, GameEvent};
use super::powerup::{PowerUpEffect, PowerUpKind, PowerUpPayload, WeaponProfile};
use super::projectile::Projectile;
use super::state::SimContext;
use super::timers::TimerKey;
use crate::consts::*;
use crate::tuning::PlayerTuning;

/// Held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// -1, 0 or 1 along X
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Weapon slot contents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveWeapon {
    pub profile: WeaponProfile,
    pub expires_at_ms: u64,
}

/// Squad slot contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSquad {
    pub size: u32,
    pub expires_at_ms: u64,
}

/// One escort shooter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquadMember {
    pub id: EntityId,
    pub slot: u32,
    pub pos: Vec3,
}

/// Formation offset of `slot` out of `count` members
fn squad_offset(slot: u32, count: u32) -> Vec3 {
    let angle = slot as f32 * std::f32::consts::TAU / count.max(1) as f32;
    Vec3::new(angle.cos() * SQUAD_RADIUS, 0.0, angle.sin() * SQUAD_RADIUS)
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec3,
    pub health: i32,
    pub damage: i32,
    pub move_speed: f32,
    pub shoot_delay_ms: u64,
    /// Simulation time of the last shot that actually fired
    pub last_shot_ms: Option<u64>,
    pub input: InputState,
    pub projectiles: Vec<Projectile>,
    pub squad_members: Vec<SquadMember>,
    pub weapon: Option<ActiveWeapon>,
    pub squad: Option<ActiveSquad>,
    /// Current tint
    pub color: u32,
    base_damage: i32,
    base_fire_rate_ms: u64,
    dead: bool,
}

impl Player {
    pub fn new(id: EntityId, tuning: &PlayerTuning) -> Self {
        Self {
            id,
            pos: Vec3::new(PLAYER_START_X, PLAYER_Y, PLAYER_Z),
            health: PLAYER_MAX_HEALTH,
            damage: tuning.damage,
            move_speed: tuning.move_speed,
            shoot_delay_ms: tuning.fire_rate_ms,
            last_shot_ms: None,
            input: InputState::default(),
            projectiles: Vec::new(),
            squad_members: Vec::new(),
            weapon: None,
            squad: None,
            color: PLAYER_COLOR,
            base_damage: tuning.damage,
            base_fire_rate_ms: tuning.fire_rate_ms,
            dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Current weapon power-up, if any
    pub fn current_power_up(&self) -> Option<PowerUpKind> {
        self.weapon.map(|w| w.profile.kind)
    }

    /// Active power-ups with their expiry time
    pub fn active_power_ups(&self) -> Vec<(PowerUpKind, u64)> {
        let weapon = self.weapon.map(|w| (w.profile.kind, w.expires_at_ms));
        let squad = self.squad.map(|s| (PowerUpKind::Squad, s.expires_at_ms));
        weapon.into_iter().chain(squad).collect()
    }

    /// (Re)start the auto-fire cadence at the current shoot delay.
    /// Replaces any cadence already running.
    pub fn start_shooting(&self, ctx: &mut SimContext) {
        if self.dead {
            return;
        }
        ctx.timers
            .schedule_every(TimerKey::PlayerShoot, ctx.now_ms, self.shoot_delay_ms);
    }

    pub fn stop_shooting(&self, ctx: &mut SimContext) {
        ctx.timers.cancel(TimerKey::PlayerShoot);
    }

    /// Whether a shot at `now_ms` would register
    pub fn can_shoot(&self, now_ms: u64) -> bool {
        !self.dead
            && self
                .last_shot_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= self.shoot_delay_ms)
    }

    /// Positions that fire on each trigger: the player, then each squad member
    pub fn shooter_positions(&self) -> Vec<Vec3> {
        std::iter::once(self.pos)
            .chain(self.squad_members.iter().map(|m| m.pos))
            .collect()
    }

    /// Fire once from every shooter. Returns how many projectiles were created.
    pub fn shoot(&mut self, ctx: &mut SimContext) -> u32 {
        if !self.can_shoot(ctx.now_ms) {
            return 0;
        }
        self.last_shot_ms = Some(ctx.now_ms);

        let origin = self.current_power_up();
        let spreads: Vec<f32> = match &self.weapon {
            Some(w) => w.profile.spreads().collect(),
            None => vec![0.0],
        };

        let mut fired = 0;
        for shooter in self.shooter_positions() {
            for &spread in &spreads {
                let id = ctx.ids.next_id();
                let projectile = Projectile::new(id, shooter, self.damage, spread, origin);
                ctx.events.push(GameEvent::Spawned {
                    id,
                    kind: EntityKind::Projectile,
                    pos: shooter,
                });
                self.projectiles.push(projectile);
                fired += 1;
            }
        }

        ctx.events.push(GameEvent::ShotFired { projectiles: fired });
        fired
    }

    /// Apply a collected power-up
    pub fn add_power_up(&mut self, payload: PowerUpPayload, ctx: &mut SimContext) {
        if self.dead {
            return;
        }
        let expires_at_ms = ctx.now_ms + payload.duration_ms;

        match payload.effect {
            PowerUpEffect::Weapon(profile) => match self.weapon {
                Some(active) if active.profile.kind == profile.kind => {
                    log::info!("Power-up {} refreshed", profile.kind.as_str());
                    self.weapon = Some(ActiveWeapon { profile: active.profile, expires_at_ms });
                }
                previous => {
                    if let Some(old) = previous {
                        ctx.timers.cancel(TimerKey::PowerUpExpiry(old.profile.kind));
                        log::info!(
                            "Power-up {} replaced by {}",
                            old.profile.kind.as_str(),
                            profile.kind.as_str()
                        );
                    }
                    self.install_weapon(profile, expires_at_ms, ctx);
                }
            },
            PowerUpEffect::Squad { size } => match self.squad {
                Some(active) => {
                    log::info!("Squad refreshed ({} members)", active.size);
                    self.squad = Some(ActiveSquad { size: active.size, expires_at_ms });
                }
                None => {
                    self.squad = Some(ActiveSquad { size, expires_at_ms });
                    self.spawn_squad(size, ctx);
                    log::info!("Power-up squad activated - {} members", size);
                }
            },
        }

        ctx.timers.schedule_once(
            TimerKey::PowerUpExpiry(payload.kind),
            ctx.now_ms,
            payload.duration_ms,
        );
        self.refresh_color(ctx);
    }

    fn install_weapon(&mut self, profile: WeaponProfile, expires_at_ms: u64, ctx: &mut SimContext) {
        let fire_rate = if profile.fire_rate_ms < MIN_FIRE_RATE_MS {
            log::warn!(
                "Fire rate {}ms for {} too low, using {}ms",
                profile.fire_rate_ms,
                profile.kind.as_str(),
                MIN_FIRE_RATE_MS
            );
            MIN_FIRE_RATE_MS
        } else {
            profile.fire_rate_ms
        };

        self.weapon = Some(ActiveWeapon { profile, expires_at_ms });
        self.damage = profile.damage;
        self.shoot_delay_ms = fire_rate;
        self.start_shooting(ctx);
        log::info!(
            "Power-up {} activated - damage {} fire rate {}ms area {}",
            profile.kind.as_str(),
            self.damage,
            self.shoot_delay_ms,
            profile.area_size
        );
    }

    /// Expiry timer callback for `kind`. Stale expiries are ignored.
    pub fn expire_power_up(&mut self, kind: PowerUpKind, ctx: &mut SimContext) {
        ctx.timers.cancel(TimerKey::PowerUpExpiry(kind));

        let expired = if kind.is_weapon() {
            if self.current_power_up() == Some(kind) {
                self.weapon = None;
                self.damage = self.base_damage;
                self.shoot_delay_ms = self.base_fire_rate_ms;
                self.start_shooting(ctx);
                true
            } else {
                false
            }
        } else if self.squad.take().is_some() {
            self.teardown_squad(ctx);
            true
        } else {
            false
        };

        if expired {
            log::info!("Power-up {} expired", kind.as_str());
            ctx.events.push(GameEvent::PowerUpExpired { kind });
            self.refresh_color(ctx);
        }
    }

    fn spawn_squad(&mut self, size: u32, ctx: &mut SimContext) {
        for slot in 0..size {
            let id = ctx.ids.next_id();
            let pos = self.pos + squad_offset(slot, size);
            self.squad_members.push(SquadMember { id, slot, pos });
            ctx.events.push(GameEvent::Spawned {
                id,
                kind: EntityKind::SquadMember,
                pos,
            });
        }
    }

    fn teardown_squad(&mut self, ctx: &mut SimContext) {
        for member in self.squad_members.drain(..) {
            ctx.events.push(GameEvent::Despawned { id: member.id });
        }
    }

    /// Recompute every member's position from the player's
    pub fn sync_squad(&mut self) {
        let count = self.squad_members.len() as u32;
        let anchor = self.pos;
        for member in &mut self.squad_members {
            member.pos = anchor + squad_offset(member.slot, count);
        }
    }

    fn refresh_color(&mut self, ctx: &mut SimContext) {
        let color = match (self.current_power_up(), self.squad) {
            (Some(kind), _) => kind.color(),
            (None, Some(_)) => PowerUpKind::Squad.color(),
            (None, None) => PLAYER_COLOR,
        };
        if color != self.color {
            self.color = color;
            ctx.events.push(GameEvent::PlayerColor { color });
        }
    }

    /// Per-tick movement, formation sync and projectile flight
    pub fn update(&mut self) {
        if self.dead {
            return;
        }
        let dx = self.input.direction() * self.move_speed;
        self.pos.x = (self.pos.x + dx).clamp(-LANE_HALF_WIDTH, LANE_HALF_WIDTH);
        self.sync_squad();

        for projectile in &mut self.projectiles {
            projectile.update();
        }
    }

    /// Take damage, clamped at 0. Returns `true` if this hit killed the player.
    pub fn take_damage(&mut self, amount: i32, ctx: &mut SimContext) -> bool {
        if self.dead {
            return false;
        }
        let amount = amount.max(0);
        self.health = (self.health - amount).clamp(0, PLAYER_MAX_HEALTH);
        log::debug!("Player health: {}", self.health);
        ctx.events.push(GameEvent::PlayerHit {
            damage: amount,
            health: self.health,
        });

        if self.health == 0 {
            return self.die(ctx);
        }
        false
    }

    /// Stop shooting, drop the squad and all projectiles.
    ///
    /// Returns `true` for the first call only; the caller raises game over.
    pub fn die(&mut self, ctx: &mut SimContext) -> bool {
        if self.dead {
            return false;
        }
        log::info!("Player died");
        self.dead = true;
        self.health = 0;
        self.input = InputState::default();

        self.stop_shooting(ctx);
        for kind in PowerUpKind::ALL {
            ctx.timers.cancel(TimerKey::PowerUpExpiry(kind));
        }
        self.weapon = None;
        self.squad = None;
        self.teardown_squad(ctx);

        for projectile in self.projectiles.drain(..) {
            ctx.events.push(GameEvent::Despawned { id: projectile.id });
        }
        true
    }
}

//! Power-up pickups and the effects they grant
//!
//! A pickup lives at most `PICKUP_DESPAWN_MS` if nobody collects it. Collecting
//! hands out its payload exactly once; the effect duration is then tracked by
//! the player, independently of the pickup.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use crate::consts::*;
use crate::ground_distance;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Gatling,
    Ak47,
    Bazooka,
    Grenade,
    Squad,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Gatling,
        PowerUpKind::Ak47,
        PowerUpKind::Bazooka,
        PowerUpKind::Grenade,
        PowerUpKind::Squad,
    ];

    pub fn is_weapon(&self) -> bool {
        !matches!(self, PowerUpKind::Squad)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Gatling => "gatling",
            PowerUpKind::Ak47 => "ak47",
            PowerUpKind::Bazooka => "bazooka",
            PowerUpKind::Grenade => "grenade",
            PowerUpKind::Squad => "squad",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PowerUpKind::Gatling => "GATLING",
            PowerUpKind::Ak47 => "AK-47",
            PowerUpKind::Bazooka => "BAZOOKA",
            PowerUpKind::Grenade => "GRENADE",
            PowerUpKind::Squad => "SQUAD",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Gatling => 0xffff00,
            PowerUpKind::Ak47 => 0xff9900,
            PowerUpKind::Bazooka => 0xff0000,
            PowerUpKind::Grenade => 0x00ff00,
            PowerUpKind::Squad => 0x0066ff,
        }
    }

    /// Splash radius of projectiles fired with this power-up
    pub fn area_size(self) -> f32 {
        match self {
            PowerUpKind::Bazooka => 2.0,
            PowerUpKind::Grenade => 1.0,
            _ => 0.0,
        }
    }

    /// How long the effect lasts once collected
    pub fn duration_ms(&self) -> u64 {
        match self {
            PowerUpKind::Gatling => 120_000,
            PowerUpKind::Ak47 => 240_000,
            PowerUpKind::Bazooka => 120_000,
            PowerUpKind::Grenade => 120_000,
            PowerUpKind::Squad => 300_000,
        }
    }

    /// Effect granted by this power-up
    pub fn effect(&self) -> PowerUpEffect {
        let weapon = |fire_rate_ms, damage, projectile_count, spread_angle| {
            PowerUpEffect::Weapon(WeaponProfile {
                kind: *self,
                fire_rate_ms,
                damage,
                area_size: self.area_size(),
                projectile_count,
                spread_angle,
            })
        };
        match self {
            PowerUpKind::Gatling => weapon(50, 10, 3, 0.1),
            PowerUpKind::Ak47 => weapon(40, 15, 1, 0.0),
            PowerUpKind::Bazooka => weapon(800, 40, 1, 0.0),
            PowerUpKind::Grenade => weapon(10, 20, 1, 0.0),
            PowerUpKind::Squad => PowerUpEffect::Squad { size: 8 },
        }
    }

    pub fn payload(&self) -> PowerUpPayload {
        PowerUpPayload {
            kind: *self,
            duration_ms: self.duration_ms(),
            effect: self.effect(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gatling" => Some(PowerUpKind::Gatling),
            "ak47" | "ak-47" => Some(PowerUpKind::Ak47),
            "bazooka" => Some(PowerUpKind::Bazooka),
            "grenade" => Some(PowerUpKind::Grenade),
            "squad" => Some(PowerUpKind::Squad),
            _ => None,
        }
    }
}

/// Weapon stats installed in the player's weapon slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub kind: PowerUpKind,
    pub fire_rate_ms: u64,
    pub damage: i32,
    pub area_size: f32,
    /// Projectiles per shooter per trigger
    pub projectile_count: u32,
    /// Angle between adjacent projectiles of a fan
    pub spread_angle: f32,
}

impl WeaponProfile {
    /// Spread offsets for one trigger, symmetric about 0
    pub fn spreads(&self) -> impl Iterator<Item = f32> + '_ {
        let count = self.projectile_count.max(1);
        let center = (count - 1) as f32 / 2.0;
        (0..count).map(move |i| (i as f32 - center) * self.spread_angle)
    }
}

/// What collecting a power-up does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerUpEffect {
    Weapon(WeaponProfile),
    Squad { size: u32 },
}

/// Effect handed to the player on collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpPayload {
    pub kind: PowerUpKind,
    pub duration_ms: u64,
    pub effect: PowerUpEffect,
}

/// A collectible pickup in the lane
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec3,
    /// Cosmetic spin (radians)
    pub spin: f32,
    /// Cosmetic bob phase (radians)
    pub bob_phase: f32,
    payload: PowerUpPayload,
    active: bool,
}

impl PowerUp {
    /// Spawn a pickup at `pos`, snapped to pickup height
    pub fn new(id: EntityId, kind: PowerUpKind, pos: Vec3) -> Self {
        Self::with_payload(id, kind.payload(), pos)
    }

    pub fn with_payload(id: EntityId, payload: PowerUpPayload, pos: Vec3) -> Self {
        Self {
            id,
            kind: payload.kind,
            pos: Vec3::new(pos.x, PICKUP_Y, pos.z),
            spin: 0.0,
            bob_phase: 0.0,
            payload,
            active: true,
        }
    }

    /// Cosmetic animation only
    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.spin = (self.spin + 0.05) % std::f32::consts::TAU;
        self.bob_phase = (self.bob_phase + 0.08) % std::f32::consts::TAU;
    }

    /// Height including the cosmetic bob
    pub fn render_y(&self) -> f32 {
        self.pos.y + self.bob_phase.sin() * 0.05
    }

    /// Take the payload. Only the first call on an active pickup returns it.
    pub fn collect(&mut self) -> Option<PowerUpPayload> {
        if !self.destroy() {
            return None;
        }
        log::debug!("Power-up {} collected", self.kind.as_str());
        Some(self.payload)
    }

    /// Whether a point is close enough to touch this pickup
    pub fn touches(&self, point: Vec3) -> bool {
        self.active
            && (self.pos.y - point.y).abs() <= PICKUP_HEIGHT_TOLERANCE
            && ground_distance(self.pos, point) < PICKUP_RADIUS
    }
}

impl Entity for PowerUp {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_once() {
        let mut p = PowerUp::new(EntityId(7), PowerUpKind::Grenade, Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(p.pos.y, PICKUP_Y);

        let payload = p.collect().expect("first collect yields payload");
        assert_eq!(payload.kind, PowerUpKind::Grenade);
        assert!(!p.is_active());

        assert!(p.collect().is_none());
        assert!(!p.touches(p.pos));
    }

    #[test]
    fn test_destroyed_pickup_cannot_be_collected() {
        let mut p = PowerUp::new(EntityId(1), PowerUpKind::Squad, Vec3::ZERO);
        assert!(p.destroy());
        assert!(p.collect().is_none());
    }

    #[test]
    fn test_touch_radius() {
        let p = PowerUp::new(EntityId(1), PowerUpKind::Ak47, Vec3::new(0.0, 0.0, 0.0));
        assert!(p.touches(Vec3::new(0.7, 0.5, 0.0)));
        assert!(!p.touches(Vec3::new(0.9, 0.5, 0.0)));
        // Too high above the pickup
        assert!(!p.touches(Vec3::new(0.0, 1.2, 0.0)));
    }

    #[test]
    fn test_gatling_fan_is_symmetric() {
        let PowerUpEffect::Weapon(profile) = PowerUpKind::Gatling.effect() else {
            panic!("gatling is a weapon");
        };
        let spreads: Vec<f32> = profile.spreads().collect();
        assert_eq!(spreads.len(), 3);
        assert!((spreads[0] + spreads[2]).abs() < 1e-6);
        assert_eq!(spreads[1], 0.0);
        assert!((spreads[2] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_area_sizes() {
        assert_eq!(PowerUpKind::Bazooka.area_size(), 2.0);
        assert_eq!(PowerUpKind::Grenade.area_size(), 1.0);
        assert_eq!(PowerUpKind::Ak47.area_size(), 0.0);
        assert_eq!(PowerUpKind::from_str("AK-47"), Some(PowerUpKind::Ak47));
        assert!(!PowerUpKind::Squad.is_weapon());
    }

    #[test]
    fn test_update_is_cosmetic() {
        let mut p = PowerUp::new(EntityId(1), PowerUpKind::Bazooka, Vec3::new(1.0, 0.0, 2.0));
        let pos = p.pos;
        for _ in 0..10 {
            p.update();
        }
        assert_eq!(p.pos, pos);
        assert!(p.spin > 0.0);
    }
}

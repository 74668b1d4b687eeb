//! Projectiles fired by the player and squad

use glam::Vec3;

use super::entity::{Entity, EntityId};
use super::powerup::PowerUpKind;
use crate::consts::*;
use crate::spread_direction;

/// A straight-line damage carrier
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec3,
    /// Unit travel direction
    pub direction: Vec3,
    pub speed: f32,
    pub damage: i32,
    /// Weapon power-up active when fired, if any
    pub origin: Option<PowerUpKind>,
    /// Splash radius (0 = direct hit only)
    pub area_size: f32,
    active: bool,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        pos: Vec3,
        damage: i32,
        spread: f32,
        origin: Option<PowerUpKind>,
    ) -> Self {
        Self {
            id,
            pos,
            direction: spread_direction(spread),
            speed: PROJECTILE_SPEED,
            damage,
            origin,
            area_size: origin.map_or(0.0, PowerUpKind::area_size),
            active: true,
        }
    }

    /// Splash damage applies when the area is positive
    pub fn has_area_effect(&self) -> bool {
        self.area_size > 0.0
    }

    /// Advance one tick; leaving the playfield destroys the projectile
    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.pos += self.direction * self.speed;
        if self.pos.z < PLAYFIELD_FAR_Z || self.pos.x.abs() > PLAYFIELD_HALF_WIDTH {
            self.destroy();
        }
    }
}

impl Entity for Projectile {
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
    fn test_travels_straight_until_out_of_bounds() {
        let mut p = Projectile::new(EntityId(1), Vec3::new(0.0, 0.5, 8.0), 20, 0.0, None);
        p.update();
        assert!((p.pos.z - (8.0 - PROJECTILE_SPEED)).abs() < 1e-5);
        assert_eq!(p.pos.x, 0.0);

        for _ in 0..100 {
            p.update();
        }
        assert!(!p.is_active());
        let frozen = p.pos;
        p.update();
        assert_eq!(p.pos, frozen);
    }

    #[test]
    fn test_area_size_follows_origin() {
        let pos = Vec3::ZERO;
        assert_eq!(Projectile::new(EntityId(1), pos, 40, 0.0, Some(PowerUpKind::Bazooka)).area_size, 2.0);
        assert_eq!(Projectile::new(EntityId(2), pos, 20, 0.0, Some(PowerUpKind::Grenade)).area_size, 1.0);
        assert!(!Projectile::new(EntityId(3), pos, 10, 0.1, Some(PowerUpKind::Gatling)).has_area_effect());
        assert!(!Projectile::new(EntityId(4), pos, 20, 0.0, None).has_area_effect());
    }

    #[test]
    fn test_spread_leaves_sideways() {
        let mut p = Projectile::new(EntityId(1), Vec3::new(2.5, 0.5, 8.0), 10, 1.2, None);
        for _ in 0..20 {
            p.update();
        }
        assert!(!p.is_active());
    }
}

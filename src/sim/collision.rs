//! Collision detection and damage resolution
//!
//! Simple distance-threshold checks, pairwise over the (small) active sets.
//! Pass order within one resolution:
//! 1. projectiles vs enemies (first hit consumes the projectile, area splash)
//! 2. surviving projectiles vs pickups
//! 3. enemies vs player (contact destroys the enemy)
//! 4. player vs pickups
//!
//! Nothing is removed from the collections here; destroyed entities are
//! skipped by every later pass and filtered out afterwards.

use glam::Vec3;
use rand::Rng;

use super::enemy::{Enemy, Kill};
use super::entity::Entity;
use super::events::GameEvent;
use super::player::Player;
use super::powerup::{PowerUp, PowerUpKind, PowerUpPayload};
use super::state::SimContext;
use crate::consts::PICKUP_SCORE;

/// What one resolution pass produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    /// Score earned this pass
    pub score: u64,
    /// Carrier drops to spawn, in kill order
    pub drops: Vec<(PowerUpKind, Vec3)>,
    /// The player died this pass
    pub player_died: bool,
}

impl CombatReport {
    fn record_kill(&mut self, kill: Kill, ctx: &mut SimContext) {
        let points = kill.points();
        self.score += points;
        if let Some(kind) = kill.drop {
            self.drops.push((kind, kill.pos));
        }
        log::debug!("{} enemy {:?} destroyed (+{})", kill.kind.as_str(), kill.id, points);
        ctx.events.push(GameEvent::EnemyKilled {
            id: kill.id,
            kind: kill.kind,
            points,
        });
    }
}

/// Apply `damage` to every other active enemy within `radius` of `center`
fn splash<R: Rng + ?Sized>(
    enemies: &mut [Enemy],
    skip: usize,
    center: Vec3,
    radius: f32,
    damage: i32,
    rng: &mut R,
) -> Vec<Kill> {
    enemies
        .iter_mut()
        .enumerate()
        .filter(|(i, e)| *i != skip && e.is_active() && e.pos.distance(center) <= radius)
        .filter_map(|(_, e)| e.take_damage(damage, rng))
        .collect()
}

/// Resolve every collision for this tick
pub fn resolve_collisions<R: Rng + ?Sized>(
    player: &mut Player,
    enemies: &mut [Enemy],
    power_ups: &mut [PowerUp],
    rng: &mut R,
    ctx: &mut SimContext,
) -> CombatReport {
    let mut report = CombatReport::default();
    let mut payloads: Vec<PowerUpPayload> = Vec::new();

    for projectile in player.projectiles.iter_mut() {
        if !projectile.is_active() {
            continue;
        }

        let hit = enemies.iter().position(|e| e.touches(projectile.pos));
        if let Some(index) = hit {
            let center = enemies[index].pos;
            if let Some(kill) = enemies[index].take_damage(projectile.damage, rng) {
                report.record_kill(kill, ctx);
            }
            projectile.destroy();
            if projectile.has_area_effect() {
                let area = projectile.area_size;
                for kill in splash(enemies, index, center, area, projectile.damage, rng) {
                    report.record_kill(kill, ctx);
                }
            }
            continue;
        }

        // Shooting a pickup collects it
        for power_up in power_ups.iter_mut() {
            if !power_up.touches(projectile.pos) {
                continue;
            }
            if let Some(payload) = power_up.collect() {
                projectile.destroy();
                payloads.push(payload);
                break;
            }
        }
    }

    for payload in payloads {
        ctx.events.push(GameEvent::PowerUpCollected { kind: payload.kind });
        player.add_power_up(payload, ctx);
    }

    for enemy in enemies.iter_mut() {
        if !player.is_alive() {
            break;
        }
        if !enemy.touches(player.pos) {
            continue;
        }
        log::debug!("{} enemy {:?} rammed the player", enemy.kind.as_str(), enemy.id);
        enemy.destroy();
        if player.take_damage(enemy.damage, ctx) {
            report.player_died = true;
        }
    }

    if player.is_alive() {
        for power_up in power_ups.iter_mut() {
            if !power_up.touches(player.pos) {
                continue;
            }
            if let Some(payload) = power_up.collect() {
                report.score += PICKUP_SCORE;
                ctx.events.push(GameEvent::PowerUpCollected { kind: payload.kind });
                player.add_power_up(payload, ctx);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::enemy::{EnemyKind, EnemySpawn};
    use crate::sim::entity::{EntityId, IdAllocator};
    use crate::sim::projectile::Projectile;
    use crate::sim::timers::Timers;
    use crate::tuning::PlayerTuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        timers: Timers,
        ids: IdAllocator,
        events: Vec<GameEvent>,
        rng: Pcg32,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                timers: Timers::new(),
                ids: IdAllocator::default(),
                events: Vec::new(),
                rng: Pcg32::seed_from_u64(1),
            }
        }

        fn resolve(
            &mut self,
            player: &mut Player,
            enemies: &mut [Enemy],
            power_ups: &mut [PowerUp],
        ) -> CombatReport {
            let mut ctx = SimContext {
                now_ms: 0,
                timers: &mut self.timers,
                ids: &mut self.ids,
                events: &mut self.events,
            };
            resolve_collisions(player, enemies, power_ups, &mut self.rng, &mut ctx)
        }
    }

    fn player() -> Player {
        Player::new(EntityId(1), &PlayerTuning::default())
    }

    fn enemy(id: u32, kind: EnemyKind, pos: Vec3) -> Enemy {
        Enemy::new(EntityId(id), EnemySpawn::new(kind, pos.x)).at(pos)
    }

    fn shot(pos: Vec3, damage: i32, origin: Option<PowerUpKind>) -> Projectile {
        Projectile::new(EntityId(99), pos, damage, 0.0, origin)
    }

    #[test]
    fn test_grenade_splash() {
        let mut h = Harness::new();
        let mut p = player();
        let mut a = enemy(10, EnemyKind::Normal, Vec3::ZERO);
        a.health = 25;
        let b = enemy(11, EnemyKind::Normal, Vec3::new(0.9, 0.0, 0.0));
        let c = enemy(12, EnemyKind::Normal, Vec3::new(1.5, 0.0, 0.0));
        let mut enemies = vec![a, b, c];
        p.projectiles.push(shot(Vec3::ZERO, 20, Some(PowerUpKind::Grenade)));

        let report = h.resolve(&mut p, &mut enemies, &mut []);

        assert_eq!(enemies[0].health, 5);
        assert!(enemies[0].is_active());
        assert!(!enemies[1].is_active());
        assert_eq!(enemies[2].health, 20);
        assert_eq!(report.score, 10);
        assert!(!p.projectiles[0].is_active());
    }

    #[test]
    fn test_splash_kill_scores_once() {
        let mut h = Harness::new();
        let mut p = player();
        let mut enemies = vec![
            enemy(10, EnemyKind::Normal, Vec3::ZERO),
            enemy(11, EnemyKind::Boss, Vec3::new(1.0, 0.0, 0.0)),
        ];
        enemies[1].health = 10;
        p.projectiles.push(shot(Vec3::ZERO, 40, Some(PowerUpKind::Bazooka)));

        let report = h.resolve(&mut p, &mut enemies, &mut []);
        assert_eq!(report.score, 10 + 100);
        let kills = h
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 2);
    }

    #[test]
    fn test_projectile_consumed_by_first_hit() {
        let mut h = Harness::new();
        let mut p = player();
        let mut enemies = vec![
            enemy(10, EnemyKind::Carrier, Vec3::ZERO),
            enemy(11, EnemyKind::Carrier, Vec3::new(0.1, 0.0, 0.0)),
        ];
        p.projectiles.push(shot(Vec3::ZERO, 20, None));

        h.resolve(&mut p, &mut enemies, &mut []);
        assert_eq!(enemies[0].health, 30);
        assert_eq!(enemies[1].health, 50);
    }

    #[test]
    fn test_carrier_kill_reports_drop() {
        let mut h = Harness::new();
        let mut p = player();
        let mut carrier = Enemy::new(
            EntityId(10),
            EnemySpawn::new(EnemyKind::Carrier, 0.0).with_drop(PowerUpKind::Bazooka),
        )
        .at(Vec3::new(1.0, 0.6, 0.0));
        carrier.health = 1;
        let mut enemies = vec![carrier];
        p.projectiles.push(shot(Vec3::new(1.0, 0.5, 0.0), 20, None));

        let report = h.resolve(&mut p, &mut enemies, &mut []);
        assert_eq!(report.score, 30);
        assert_eq!(report.drops, vec![(PowerUpKind::Bazooka, Vec3::new(1.0, 0.6, 0.0))]);
    }

    #[test]
    fn test_shooting_pickup_collects_without_score() {
        let mut h = Harness::new();
        let mut p = player();
        let mut power_ups = vec![PowerUp::new(EntityId(20), PowerUpKind::Ak47, Vec3::ZERO)];
        p.projectiles.push(shot(Vec3::new(0.0, PICKUP_Y, 0.0), 20, None));

        let report = h.resolve(&mut p, &mut [], &mut power_ups);
        assert_eq!(report.score, 0);
        assert!(!power_ups[0].is_active());
        assert!(!p.projectiles[0].is_active());
        assert_eq!(p.current_power_up(), Some(PowerUpKind::Ak47));
    }

    #[test]
    fn test_enemy_contact_hurts_player_and_destroys_enemy() {
        let mut h = Harness::new();
        let mut p = player();
        let mut enemies = vec![enemy(10, EnemyKind::Carrier, p.pos)];

        let report = h.resolve(&mut p, &mut enemies, &mut []);
        assert_eq!(p.health, 90);
        assert!(!enemies[0].is_active());
        assert_eq!(report.score, 0);
        assert!(!report.player_died);
    }

    #[test]
    fn test_boss_contact_can_kill() {
        let mut h = Harness::new();
        let mut p = player();
        p.health = 40;
        let mut enemies = vec![
            enemy(10, EnemyKind::Boss, p.pos),
            enemy(11, EnemyKind::Normal, p.pos),
        ];

        let report = h.resolve(&mut p, &mut enemies, &mut []);
        assert!(report.player_died);
        assert_eq!(p.health, 0);
        // Nothing else touches a dead player
        assert!(enemies[1].is_active());
    }

    #[test]
    fn test_player_pickup_scores() {
        let mut h = Harness::new();
        let mut p = player();
        let mut power_ups = vec![PowerUp::new(EntityId(20), PowerUpKind::Squad, p.pos)];

        let report = h.resolve(&mut p, &mut [], &mut power_ups);
        assert_eq!(report.score, PICKUP_SCORE);
        assert_eq!(p.squad_members.len(), 8);
        assert!(h.events.contains(&GameEvent::PowerUpCollected { kind: PowerUpKind::Squad }));

        // Already collected
        let report = h.resolve(&mut p, &mut [], &mut power_ups);
        assert_eq!(report.score, 0);
    }
}

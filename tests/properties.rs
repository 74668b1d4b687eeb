//! Property tests for simulation invariants

use bridge_defense::consts::*;
use bridge_defense::sim::{
    Entity, EntityId, GameEvent, GameState, IdAllocator, InputState, Player, PowerUp,
    PowerUpKind, SimContext, TickInput, TimerKey, Timers, tick,
};
use bridge_defense::tuning::{GameConfig, PlayerTuning};
use glam::Vec3;
use proptest::prelude::*;

struct World {
    timers: Timers,
    ids: IdAllocator,
    events: Vec<GameEvent>,
    now: u64,
}

impl World {
    fn new() -> Self {
        Self {
            timers: Timers::new(),
            ids: IdAllocator::default(),
            events: Vec::new(),
            now: 0,
        }
    }

    fn ctx(&mut self) -> SimContext<'_> {
        SimContext {
            now_ms: self.now,
            timers: &mut self.timers,
            ids: &mut self.ids,
            events: &mut self.events,
        }
    }

    /// Advance, firing expiry timers against the player
    fn advance(&mut self, player: &mut Player, ms: u64) {
        let until = self.now + ms;
        while let Some((key, at)) = self.timers.next_due(until) {
            self.now = at;
            if let TimerKey::PowerUpExpiry(kind) = key {
                player.expire_power_up(kind, &mut self.ctx());
            }
        }
        self.now = until;
    }
}

fn power_up_kind() -> impl Strategy<Value = PowerUpKind> {
    prop::sample::select(PowerUpKind::ALL.to_vec())
}

fn timer_key() -> impl Strategy<Value = TimerKey> {
    prop_oneof![
        Just(TimerKey::PlayerShoot),
        Just(TimerKey::Wave),
        Just(TimerKey::Difficulty),
        Just(TimerKey::Carrier),
        Just(TimerKey::Boss),
        power_up_kind().prop_map(TimerKey::PowerUpExpiry),
        (1u32..20).prop_map(|id| TimerKey::Despawn(EntityId(id))),
    ]
}

proptest! {
    #[test]
    fn health_stays_in_range(hits in prop::collection::vec(-50i32..150, 0..40)) {
        let mut world = World::new();
        let mut player = Player::new(EntityId(1), &PlayerTuning::default());
        let mut deaths = 0;
        for amount in hits {
            if player.take_damage(amount, &mut world.ctx()) {
                deaths += 1;
            }
            prop_assert!((0..=PLAYER_MAX_HEALTH).contains(&player.health));
        }
        prop_assert!(deaths <= 1);
        prop_assert_eq!(deaths == 1, !player.is_alive());
    }

    #[test]
    fn movement_stays_in_lane(moves in prop::collection::vec((any::<bool>(), any::<bool>()), 0..400)) {
        let mut player = Player::new(EntityId(1), &PlayerTuning::default());
        for (left, right) in moves {
            player.input = InputState { left, right };
            player.update();
            prop_assert!(player.pos.x.abs() <= LANE_HALF_WIDTH);
            prop_assert_eq!(player.pos.z, PLAYER_Z);
        }
    }

    #[test]
    fn pickup_collects_once(kind in power_up_kind(), attempts in 1usize..10) {
        let mut pickup = PowerUp::new(EntityId(5), kind, Vec3::ZERO);
        let collected = (0..attempts).filter(|_| pickup.collect().is_some()).count();
        prop_assert_eq!(collected, 1);
        prop_assert!(!pickup.is_active());
        prop_assert!(!pickup.destroy());
    }

    #[test]
    fn canceled_timers_never_fire(
        scheduled in prop::collection::vec((timer_key(), 1u64..5_000), 1..30),
        cancel_mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let mut timers = Timers::new();
        for (key, delay) in &scheduled {
            timers.schedule_once(*key, 0, *delay);
        }
        let mut canceled = Vec::new();
        for ((key, _), cancel) in scheduled.iter().zip(&cancel_mask) {
            if *cancel && timers.cancel(*key) {
                canceled.push(*key);
            }
        }

        let mut last = 0;
        while let Some((key, at)) = timers.next_due(10_000) {
            prop_assert!(!canceled.contains(&key));
            prop_assert!(at >= last);
            last = at;
        }
    }

    #[test]
    fn one_expiry_timer_per_power_up(
        pickups in prop::collection::vec((power_up_kind(), 0u64..200_000), 1..20),
    ) {
        let mut world = World::new();
        let mut player = Player::new(EntityId(1), &PlayerTuning::default());
        let mut last_weapon = None;

        for (kind, wait) in pickups {
            player.add_power_up(kind.payload(), &mut world.ctx());
            if kind.is_weapon() {
                last_weapon = Some(kind);
            }
            prop_assert_eq!(player.current_power_up(), last_weapon);

            // At most one weapon expiry pending, and it belongs to the current weapon
            let weapon_timers: Vec<PowerUpKind> = PowerUpKind::ALL
                .into_iter()
                .filter(|k| k.is_weapon() && world.timers.is_scheduled(TimerKey::PowerUpExpiry(*k)))
                .collect();
            prop_assert!(weapon_timers.len() <= 1);
            prop_assert_eq!(weapon_timers.first().copied(), player.current_power_up());

            world.advance(&mut player, wait);
            if player.current_power_up().is_none() {
                last_weapon = None;
                prop_assert_eq!(player.damage, BASE_DAMAGE);
                prop_assert_eq!(player.shoot_delay_ms, BASE_FIRE_RATE_MS);
            }
            let squad_active = player.squad.is_some();
            prop_assert_eq!(player.squad_members.is_empty(), !squad_active);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn same_seed_same_run(seed in any::<u64>()) {
        let mut a = GameState::new(seed, GameConfig::default());
        let mut b = GameState::new(seed, GameConfig::default());
        let input = TickInput::idle();
        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }
}

//! Game state and run lifecycle
//!
//! Everything a run needs lives here: the seeded RNG, the simulation clock,
//! the shared timer set, the player and the spawner.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{IdAllocator, retain_active};
use super::events::{EntityKind, GameEvent};
use super::player::Player;
use super::spawner::Spawner;
use super::timers::Timers;
use crate::hud::HudSnapshot;
use crate::tuning::GameConfig;

/// Game over reason when the player's health runs out
pub const REASON_PLAYER_DIED: &str = "You died!";
/// Game over reason when an enemy reaches the player's side
pub const REASON_BOUNDARY: &str = "An enemy crossed the bridge!";

/// Mutable handles shared by everything that runs inside one tick
#[derive(Debug)]
pub struct SimContext<'a> {
    /// Simulation time the current step runs at
    pub now_ms: u64,
    pub timers: &'a mut Timers,
    pub ids: &'a mut IdAllocator,
    pub events: &'a mut Vec<GameEvent>,
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock running, timers firing
    Playing,
    /// Clock frozen, cadences canceled
    Paused,
    /// Terminal
    GameOver,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation clock; only advances while playing
    pub clock_ms: u64,
    /// Ticks simulated while playing
    pub time_ticks: u64,
    pub score: u64,
    pub player: Player,
    pub spawner: Spawner,
    pub timers: Timers,
    pub config: GameConfig,
    pub game_over_reason: Option<String>,
    ids: IdAllocator,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run: the player starts shooting and every spawn cadence begins
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let config = config.sanitized();
        let mut ids = IdAllocator::default();
        let player = Player::new(ids.next_id(), &config.player);
        let spawner = Spawner::new(&config, 0);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            clock_ms: 0,
            time_ticks: 0,
            score: 0,
            events: vec![GameEvent::Spawned {
                id: player.id,
                kind: EntityKind::Player,
                pos: player.pos,
            }],
            player,
            spawner,
            timers: Timers::new(),
            config,
            game_over_reason: None,
            ids,
        };
        state.start_processes();
        log::info!("New run started (seed {})", seed);
        state
    }

    /// Borrow the player, spawner and RNG alongside a context at the current clock
    pub fn split(&mut self) -> (&mut Player, &mut Spawner, &mut Pcg32, SimContext<'_>) {
        let ctx = SimContext {
            now_ms: self.clock_ms,
            timers: &mut self.timers,
            ids: &mut self.ids,
            events: &mut self.events,
        };
        (&mut self.player, &mut self.spawner, &mut self.rng, ctx)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    fn start_processes(&mut self) {
        let (player, spawner, _, mut ctx) = self.split();
        player.start_shooting(&mut ctx);
        spawner.start(&mut ctx);
    }

    fn stop_processes(&mut self) {
        let (player, spawner, _, mut ctx) = self.split();
        player.stop_shooting(&mut ctx);
        spawner.stop(&mut ctx);
    }

    /// Pause or resume. Ignored once the run is over.
    ///
    /// Pausing cancels the shoot cadence and all spawner processes; resuming
    /// relaunches them with a full period. Expiry and despawn timers stay
    /// scheduled and simply wait for the clock.
    pub fn toggle_pause(&mut self) {
        let paused = match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.stop_processes();
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.start_processes();
                false
            }
            GamePhase::GameOver => {
                log::debug!("Pause toggle ignored after game over");
                return;
            }
        };
        log::info!("{}", if paused { "Paused" } else { "Resumed" });
        self.events.push(GameEvent::PauseChanged { paused });
    }

    /// End the run. Only the first call has any effect; returns whether it did.
    pub fn end_run(&mut self, reason: &str) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason.to_string());

        let (player, spawner, _, mut ctx) = self.split();
        player.die(&mut ctx);
        spawner.stop(&mut ctx);
        spawner.clear(&mut ctx);
        self.timers.clear();

        log::info!("Game over: {} (score {})", reason, self.score);
        self.events.push(GameEvent::GameOver {
            reason: reason.to_string(),
        });
        true
    }

    pub fn add_score(&mut self, points: u64) {
        if points > 0 {
            self.score += points;
            log::debug!("Score: {}", self.score);
        }
    }

    /// Drop destroyed entities from every collection
    pub fn cleanup(&mut self) {
        let (player, spawner, _, mut ctx) = self.split();
        for id in retain_active(&mut player.projectiles) {
            ctx.events.push(GameEvent::Despawned { id });
        }
        spawner.cleanup(&mut ctx);
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Read-only view for the HUD
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timers::TimerKey;

    #[test]
    fn test_new_run_starts_everything() {
        let state = GameState::new(1, GameConfig::default());
        assert!(state.is_playing());
        assert!(state.timers.is_scheduled(TimerKey::PlayerShoot));
        assert!(state.timers.is_scheduled(TimerKey::Wave));
        assert!(state.timers.is_scheduled(TimerKey::Boss));
        assert!(matches!(
            state.pending_events()[0],
            GameEvent::Spawned {
                kind: EntityKind::Player,
                ..
            }
        ));
    }

    #[test]
    fn test_pause_cancels_cadences() {
        let mut state = GameState::new(1, GameConfig::default());
        state.toggle_pause();
        assert!(state.is_paused());
        assert!(state.timers.is_empty());

        state.toggle_pause();
        assert!(state.is_playing());
        assert_eq!(state.timers.due_at(TimerKey::Wave), Some(5_000));
    }

    #[test]
    fn test_end_run_is_idempotent() {
        let mut state = GameState::new(1, GameConfig::default());
        state.drain_events();
        assert!(state.end_run(REASON_PLAYER_DIED));
        assert!(!state.end_run(REASON_BOUNDARY));

        assert_eq!(state.game_over_reason.as_deref(), Some(REASON_PLAYER_DIED));
        assert!(state.timers.is_empty());
        assert!(!state.player.is_alive());
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Pause does nothing once over
        state.toggle_pause();
        assert!(state.is_over());
    }
}

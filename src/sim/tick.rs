//! Fixed timestep simulation tick
//!
//! One tick, in order:
//! 1. apply input events (pause toggle included)
//! 2. advance the clock
//! 3. update player, enemies and pickups
//! 4. resolve collisions, spawn carrier drops
//! 5. fire due timers (shots, expiries, despawns, spawner cadences)
//!
//! Inactive entities are filtered out after steps 4 and 5, so nothing destroyed
//! in one pass is visited by a later one.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::Entity;
use super::player::InputState;
use super::state::{GameState, REASON_BOUNDARY, REASON_PLAYER_DIED};
use super::timers::TimerKey;
use crate::consts::*;
use crate::ground_distance;

/// Discrete input edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    LeftPressed,
    LeftReleased,
    RightPressed,
    RightReleased,
    PauseToggle,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Edges since the previous tick, in arrival order
    pub events: Vec<InputEvent>,
    /// Idle/demo mode - AI steers the player
    pub idle_mode: bool,
}

impl TickInput {
    pub fn with_event(event: InputEvent) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }

    pub fn idle() -> Self {
        Self {
            idle_mode: true,
            ..Default::default()
        }
    }
}

fn apply_input(state: &mut GameState, event: InputEvent) {
    let input = &mut state.player.input;
    match event {
        InputEvent::LeftPressed => input.left = true,
        InputEvent::LeftReleased => input.left = false,
        InputEvent::RightPressed => input.right = true,
        InputEvent::RightReleased => input.right = false,
        InputEvent::PauseToggle => state.toggle_pause(),
    }
}

/// Steer toward the nearest pickup, otherwise line up with the closest threat
fn autopilot(state: &mut GameState) {
    let here = state.player.pos;
    let pickup_x = state
        .spawner
        .power_ups
        .iter()
        .filter(|p| p.is_active())
        .min_by(|a, b| ground_distance(a.pos, here).total_cmp(&ground_distance(b.pos, here)))
        .map(|p| p.pos.x);
    let threat_x = || {
        state
            .spawner
            .enemies
            .iter()
            .filter(|e| e.is_active())
            .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
            .map(|e| e.pos.x)
    };

    let dx = pickup_x.or_else(threat_x).map_or(0.0, |x| x - here.x);
    let dead_zone = state.player.move_speed / 2.0;
    state.player.input = InputState {
        left: dx < -dead_zone,
        right: dx > dead_zone,
    };
}

fn resolve_combat(state: &mut GameState) {
    let (player, spawner, rng, mut ctx) = state.split();
    let report = resolve_collisions(
        player,
        &mut spawner.enemies,
        &mut spawner.power_ups,
        rng,
        &mut ctx,
    );
    for &(kind, pos) in &report.drops {
        spawner.spawn_power_up(kind, pos, &mut ctx);
    }

    state.add_score(report.score);
    if report.player_died {
        state.end_run(REASON_PLAYER_DIED);
    }
}

/// Fire every timer due by the current clock, one at a time.
/// Stops as soon as the run leaves the playing phase.
fn run_timers(state: &mut GameState) {
    while state.is_playing() {
        let Some((key, at)) = state.timers.next_due(state.clock_ms) else {
            break;
        };
        let (player, spawner, rng, mut ctx) = state.split();
        ctx.now_ms = at;
        match key {
            TimerKey::PlayerShoot => {
                player.shoot(&mut ctx);
            }
            TimerKey::PowerUpExpiry(kind) => player.expire_power_up(kind, &mut ctx),
            TimerKey::Despawn(id) => spawner.despawn(id),
            key => spawner.handle(key, rng, &mut ctx),
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &event in &input.events {
        if state.is_over() && event == InputEvent::PauseToggle {
            continue;
        }
        apply_input(state, event);
    }

    // Nothing moves while paused or after game over
    if !state.is_playing() {
        return;
    }

    if input.idle_mode {
        autopilot(state);
    }

    state.clock_ms += TICK_MS;
    state.time_ticks += 1;

    state.player.update();
    if state.spawner.update() {
        state.end_run(REASON_BOUNDARY);
    }

    if state.is_playing() {
        resolve_combat(state);
    }
    state.cleanup();

    run_timers(state);
    state.cleanup();
}

//! Event-driven presenter
//!
//! Per frame: `apply` the events drained from the simulation, then `sync`
//! positions from the current state. A visual the scene refused is marked
//! detached and skipped from then on, so one bad entity can't spam the log
//! or stall the frame.

use std::collections::HashSet;

use glam::Vec3;

use super::{Scene, SceneError, Visual};
use crate::audio::{AudioManager, SoundEffect};
use crate::sim::{EnemyKind, EntityId, EntityKind, GameEvent, GameState};

/// Feeds a [`Scene`] and an [`AudioManager`] from game events
#[derive(Debug)]
pub struct Presenter<S: Scene> {
    scene: S,
    pub audio: AudioManager,
    detached: HashSet<EntityId>,
    player: Option<EntityId>,
}

impl<S: Scene> Presenter<S> {
    pub fn new(scene: S, audio: AudioManager) -> Self {
        Self {
            scene,
            audio,
            detached: HashSet::new(),
            player: None,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn is_detached(&self, id: EntityId) -> bool {
        self.detached.contains(&id)
    }

    fn report(&self, what: &str, id: EntityId, err: SceneError) {
        log::warn!("Scene {} failed for {:?}: {}", what, id, err);
    }

    fn spawn(&mut self, id: EntityId, kind: EntityKind, pos: Vec3) {
        if kind == EntityKind::Player {
            self.player = Some(id);
        }
        if let Err(e) = self.scene.add_visual(id, Visual::new(kind, pos)) {
            self.report("add", id, e);
            self.detached.insert(id);
        }
    }

    fn despawn(&mut self, id: EntityId) {
        if self.detached.remove(&id) {
            return;
        }
        if let Err(e) = self.scene.remove_visual(id) {
            self.report("remove", id, e);
        }
    }

    fn place(&mut self, id: EntityId, pos: Vec3) {
        if self.detached.contains(&id) {
            return;
        }
        if let Err(e) = self.scene.set_position(id, pos) {
            self.report("move", id, e);
            self.detached.insert(id);
        }
    }

    /// Forward a batch of events to the scene and audio
    pub fn apply(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Spawned { id, kind, pos } => {
                    self.spawn(*id, *kind, *pos);
                    if *kind == EntityKind::Enemy(EnemyKind::Boss) {
                        self.audio.play(SoundEffect::BossSpawned);
                    }
                }
                GameEvent::Despawned { id } => self.despawn(*id),
                GameEvent::ShotFired { .. } => self.audio.play(SoundEffect::Shot),
                GameEvent::PowerUpCollected { .. } => {
                    self.audio.play(SoundEffect::PowerUpCollected)
                }
                GameEvent::EnemyKilled { .. } => self.audio.play(SoundEffect::EnemyDestroyed),
                GameEvent::PlayerHit { .. } => self.audio.play(SoundEffect::PlayerHit),
                GameEvent::PlayerColor { color } => {
                    if let Some(id) = self.player.filter(|id| !self.detached.contains(id))
                        && let Err(e) = self.scene.set_color(id, *color)
                    {
                        self.report("recolor", id, e);
                    }
                }
                GameEvent::GameOver { reason } => {
                    log::info!("Presenting game over: {}", reason);
                    self.audio.stop_all();
                    self.audio.play(SoundEffect::GameOver);
                }
                GameEvent::PowerUpExpired { .. }
                | GameEvent::WaveSizeRaised { .. }
                | GameEvent::PauseChanged { .. } => {}
            }
        }
    }

    /// Push every live entity's current position to the scene
    pub fn sync(&mut self, state: &GameState) {
        let player = &state.player;
        if player.is_alive() {
            self.place(player.id, player.pos);
        }
        for member in &player.squad_members {
            self.place(member.id, member.pos);
        }
        for projectile in &player.projectiles {
            self.place(projectile.id, projectile.pos);
        }
        for enemy in &state.spawner.enemies {
            self.place(enemy.id, enemy.pos);
        }
        for power_up in &state.spawner.power_ups {
            let pos = Vec3::new(power_up.pos.x, power_up.render_y(), power_up.pos.z);
            self.place(power_up.id, pos);
        }
    }

    /// Drain the state's events, apply them and sync positions
    pub fn present(&mut self, state: &mut GameState) {
        let events = state.drain_events();
        self.apply(&events);
        self.sync(state);
    }
}

//! Audio service
//!
//! The simulation never plays sound itself. The presenter maps game events to
//! [`SoundEffect`]s and hands them to an [`AudioManager`], which applies
//! volume and mute before forwarding to whatever [`AudioBackend`] the host
//! attached. Without a backend every call is a silent no-op.

use std::fmt;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// One trigger of the auto-fire cadence
    Shot,
    /// Power-up picked up or shot
    PowerUpCollected,
    EnemyDestroyed,
    PlayerHit,
    BossSpawned,
    GameOver,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shot => "shot",
            SoundEffect::PowerUpCollected => "powerup",
            SoundEffect::EnemyDestroyed => "enemy_destroyed",
            SoundEffect::PlayerHit => "player_hit",
            SoundEffect::BossSpawned => "boss_spawned",
            SoundEffect::GameOver => "game_over",
        }
    }

    /// Relative loudness of each effect
    fn gain(&self) -> f32 {
        match self {
            SoundEffect::Shot => 0.3,
            SoundEffect::PowerUpCollected => 0.6,
            SoundEffect::EnemyDestroyed => 0.4,
            SoundEffect::PlayerHit => 0.5,
            SoundEffect::BossSpawned | SoundEffect::GameOver => 0.8,
        }
    }
}

/// Audio failures. None of them are fatal to a run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio backend not initialized")]
    BackendNotInitialized,
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Play `effect` at `volume` (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;

    /// Stop everything currently playing
    fn stop_all(&mut self);
}

/// Backend that only logs what it would play
#[derive(Debug, Default)]
pub struct LogAudio {
    played: u64,
}

impl LogAudio {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioBackend for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        self.played += 1;
        log::trace!("Playing sound {} at {:.2}", effect.as_str(), volume);
        Ok(())
    }

    fn stop_all(&mut self) {
        log::debug!("All sounds stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("attached", &self.backend.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    /// Manager with no backend; plays nothing until one is attached
    pub fn new() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn with_backend(backend: Box<dyn AudioBackend>) -> Self {
        let mut manager = Self::new();
        manager.attach_backend(backend);
        manager
    }

    pub fn attach_backend(&mut self, backend: Box<dyn AudioBackend>) {
        self.backend = Some(backend);
        log::info!("Audio backend attached");
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set master volume from the 0-100 settings slider
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.set_master_volume(f32::from(percent.min(100)) / 100.0);
        log::debug!("Volume set to {}%", percent.min(100));
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect, reporting why it didn't reach a backend.
    /// Silent (muted or zero volume) is not an error.
    pub fn try_play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        let vol = self.effective_volume() * effect.gain();
        if vol <= 0.0 {
            return Ok(());
        }
        let backend = self
            .backend
            .as_mut()
            .ok_or(AudioError::BackendNotInitialized)?;
        backend.play(effect, vol)
    }

    /// Play a sound effect. Failures are logged, never raised.
    pub fn play(&mut self, effect: SoundEffect) {
        match self.try_play(effect) {
            Ok(()) => {}
            Err(AudioError::BackendNotInitialized) => {
                log::debug!("Sound {} skipped: no audio backend", effect.as_str());
            }
            Err(e) => log::warn!("Failed to play {}: {}", effect.as_str(), e),
        }
    }

    pub fn stop_all(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_all();
        }
    }
}

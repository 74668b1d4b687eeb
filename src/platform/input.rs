//! Keyboard mapping

use crate::sim::{InputEvent, TickInput};

/// Translate a key name (DOM `KeyboardEvent.key` style) into an input edge
pub fn map_key(key: &str, pressed: bool) -> Option<InputEvent> {
    match (key, pressed) {
        ("ArrowLeft" | "a" | "A", true) => Some(InputEvent::LeftPressed),
        ("ArrowLeft" | "a" | "A", false) => Some(InputEvent::LeftReleased),
        ("ArrowRight" | "d" | "D", true) => Some(InputEvent::RightPressed),
        ("ArrowRight" | "d" | "D", false) => Some(InputEvent::RightReleased),
        ("Enter", true) => Some(InputEvent::PauseToggle),
        _ => None,
    }
}

/// Collects key edges between ticks
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    pending: Vec<InputEvent>,
    pub idle_mode: bool,
}

impl KeyboardInput {
    pub fn key_down(&mut self, key: &str) {
        self.push(key, true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.push(key, false);
    }

    fn push(&mut self, key: &str, pressed: bool) {
        match map_key(key, pressed) {
            Some(event) => self.pending.push(event),
            None => log::trace!("Unmapped key {:?}", key),
        }
    }

    /// Input for the next tick; edges are handed over exactly once
    pub fn take(&mut self) -> TickInput {
        TickInput {
            events: std::mem::take(&mut self.pending),
            idle_mode: self.idle_mode,
        }
    }
}

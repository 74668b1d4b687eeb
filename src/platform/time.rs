//! Frame pacing
//!
//! Hosts run at whatever rate the display allows; the simulation only ever
//! sees fixed `TICK_MS` steps. Leftover time carries over to the next frame.

use crate::consts::{MAX_SUBSTEPS, TICK_MS};

/// Longest frame delta accepted, in milliseconds
const MAX_FRAME_MS: f64 = 100.0;

/// Accumulates wall-clock frame time into fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f64,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the host's current time (ms); returns how many ticks to run
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time.replace(now_ms) {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.accumulate(dt)
    }

    /// Feed a frame delta directly; returns how many ticks to run
    pub fn accumulate(&mut self, dt_ms: f64) -> u32 {
        self.accumulator += dt_ms.max(0.0);

        let tick = TICK_MS as f64;
        let mut substeps = 0;
        while self.accumulator >= tick && substeps < MAX_SUBSTEPS {
            self.accumulator -= tick;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= tick {
            log::debug!("Dropping {:.1}ms of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Forget pending time (after pause, restart or a hidden tab)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leftover_carries_over() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.accumulate(10.0), 0);
        assert_eq!(clock.accumulate(10.0), 1);
        assert_eq!(clock.accumulate(12.0), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.accumulate(1_000.0), MAX_SUBSTEPS);
        // Backlog was dropped
        assert_eq!(clock.accumulate(0.0), 0);
    }

    #[test]
    fn test_advance_uses_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1_000.0), 0);
        assert_eq!(clock.advance(1_033.0), 2);
        // Long stalls are clamped to one capped frame
        assert_eq!(clock.advance(60_000.0), 6);
    }
}

//! Pull-based HUD snapshot
//!
//! The HUD never reaches into the simulation; hosts call [`GameState::hud`]
//! once per frame and draw whatever comes back.

use serde::Serialize;

use crate::sim::{GameState, PowerUpKind};

/// One active power-up as the HUD shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePowerUpInfo {
    pub kind: PowerUpKind,
    pub display_name: &'static str,
    pub color: u32,
    /// Whole seconds left, rounded up
    pub remaining_secs: u64,
}

/// Everything the HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub elapsed_ms: u64,
    pub score: u64,
    pub player_health: i32,
    pub active_power_ups: Vec<ActivePowerUpInfo>,
    pub paused: bool,
    pub game_over: bool,
    pub game_over_reason: Option<String>,
    pub wave_size: u32,
}

/// Format a duration as `M:SS`
pub fn format_elapsed(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock_ms;
        let active_power_ups = state
            .player
            .active_power_ups()
            .into_iter()
            .filter_map(|(kind, expires_at_ms)| {
                let remaining_secs = expires_at_ms.saturating_sub(now).div_ceil(1000);
                (remaining_secs > 0).then(|| ActivePowerUpInfo {
                    kind,
                    display_name: kind.display_name(),
                    color: kind.color(),
                    remaining_secs,
                })
            })
            .collect();

        Self {
            elapsed_ms: now,
            score: state.score,
            player_health: state.player.health,
            active_power_ups,
            paused: state.is_paused(),
            game_over: state.is_over(),
            game_over_reason: state.game_over_reason.clone(),
            wave_size: state.spawner.wave_size,
        }
    }

    pub fn elapsed(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }

    /// Single-line summary for text hosts
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Time {} | Score {} | HP {} | Wave {}",
            self.elapsed(),
            self.score,
            self.player_health,
            self.wave_size
        );
        for p in &self.active_power_ups {
            line.push_str(&format!(" | {} ({}s)", p.display_name, p.remaining_secs));
        }
        if self.paused {
            line.push_str(" | PAUSED");
        }
        if let Some(reason) = &self.game_over_reason {
            line.push_str(&format!(" | GAME OVER: {}", reason));
        }
        line
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{InputEvent, TickInput, tick};
    use crate::tuning::GameConfig;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(65_400), "1:05");
        assert_eq!(format_elapsed(600_000), "10:00");
    }

    #[test]
    fn test_remaining_rounds_up() {
        let mut state = GameState::new(5, GameConfig::default());
        let (player, _, _, mut ctx) = state.split();
        player.add_power_up(PowerUpKind::Gatling.payload(), &mut ctx);
        player.add_power_up(PowerUpKind::Squad.payload(), &mut ctx);

        state.clock_ms = 500;
        let hud = state.hud();
        assert_eq!(hud.active_power_ups.len(), 2);
        assert_eq!(hud.active_power_ups[0].display_name, "GATLING");
        assert_eq!(hud.active_power_ups[0].remaining_secs, 120);
        assert_eq!(hud.active_power_ups[1].remaining_secs, 300);

        // Within the last second still shows 1s
        state.clock_ms = 119_999;
        assert_eq!(state.hud().active_power_ups[0].remaining_secs, 1);
        // Exactly expired but not yet processed: omitted
        state.clock_ms = 120_000;
        assert_eq!(state.hud().active_power_ups.len(), 1);
    }

    #[test]
    fn test_flags() {
        let mut state = GameState::new(5, GameConfig::default());
        tick(&mut state, &TickInput::with_event(InputEvent::PauseToggle));
        let hud = state.hud();
        assert!(hud.paused);
        assert!(!hud.game_over);
        assert_eq!(hud.wave_size, 30);
        assert!(hud.status_line().ends_with("PAUSED"));
        assert!(hud.to_json().is_ok());
    }
}

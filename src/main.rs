//! Bridge Defense entry point
//!
//! Runs a headless demo session: the autopilot plays, the presenter feeds a
//! logging scene, and the HUD line is printed as the run goes.
//!
//! Usage: `bridge-defense [seed] [easy|normal|hard]`

use bridge_defense::audio::{AudioManager, LogAudio};
use bridge_defense::platform::{FrameClock, KeyboardInput};
use bridge_defense::renderer::{LogScene, Presenter};
use bridge_defense::sim::{GameState, tick};
use bridge_defense::{Difficulty, Settings};

/// Demo runs stop here if nothing ends them sooner
const DEMO_LIMIT_MS: u64 = 10 * 60_000;
/// Simulated display refresh
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frames at which the demo presses Enter (pause, then resume)
const PAUSE_FRAMES: [u64; 2] = [1_800, 1_860];

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let settings = Settings::from_preset(difficulty);
    log::info!(
        "Bridge Defense (native) starting - seed {}, difficulty {}",
        seed,
        difficulty.as_str()
    );

    let mut audio = AudioManager::with_backend(Box::new(LogAudio::default()));
    audio.apply_settings(&settings);
    let mut presenter = Presenter::new(LogScene::new(), audio);
    let mut state = GameState::new(seed, settings.game_config());
    let mut keys = KeyboardInput::default();
    keys.idle_mode = true;
    let mut clock = FrameClock::new();

    let mut frame: u64 = 0;
    let mut next_report_ms = 10_000;
    while !state.is_over() && state.clock_ms < DEMO_LIMIT_MS {
        frame += 1;
        if PAUSE_FRAMES.contains(&frame) {
            keys.key_down("Enter");
            keys.key_up("Enter");
        }

        for _ in 0..clock.advance(frame as f64 * FRAME_MS) {
            tick(&mut state, &keys.take());
        }
        presenter.present(&mut state);

        if state.clock_ms >= next_report_ms {
            log::info!("{}", state.hud().status_line());
            next_report_ms += 10_000;
        }
    }

    println!("{}", state.hud().status_line());
    println!("Visuals still on screen: {}", presenter.scene().len());
}

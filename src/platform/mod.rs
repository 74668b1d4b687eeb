//! Platform glue
//!
//! Host-facing pieces that sit outside the simulation:
//! - Keyboard mapping to simulation input edges
//! - Frame pacing (wall-clock frames to fixed ticks)

pub mod input;
pub mod time;

pub use input::{KeyboardInput, map_key};
pub use time::FrameClock;

//! Aim Trainer - a reflex target-shooting mini game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (session, targets, timers)
//! - `shell`: Presentation shell (screens, pointer dispatch, feedback)
//! - `audio`: Procedural gunshot cue (Web Audio on wasm32)
//! - `settings`: Player preferences

pub mod audio;
pub mod settings;
pub mod shell;
pub mod sim;

pub use settings::Settings;
pub use shell::{Screen, Shell};

/// Game rule constants. Fixed, not player-tunable.
pub mod consts {
    use std::time::Duration;

    /// Seconds on the clock at the start of a game
    pub const INITIAL_TIME: f32 = 10.0;
    /// Seconds added per hit (uncapped)
    pub const HIT_BONUS: f32 = 0.5;
    /// Seconds removed per background miss (floored at 0)
    pub const MISS_PENALTY: f32 = 1.0;
    /// Seconds removed per countdown tick
    pub const TICK_DECREMENT: f32 = 1.0;
    /// Countdown tick period
    pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

    /// Target diameter range (pixels, inclusive)
    pub const TARGET_MIN_SIZE: u32 = 40;
    pub const TARGET_MAX_SIZE: u32 = 80;
    /// Target centre range, percent of play area width
    pub const TARGET_X_MIN: f32 = 5.0;
    pub const TARGET_X_MAX: f32 = 95.0;
    /// Target centre range, percent of play area height. Top 10% is the HUD.
    pub const TARGET_Y_MIN: f32 = 10.0;
    pub const TARGET_Y_MAX: f32 = 95.0;

    /// Hit target shrink/fade before the next one spawns
    pub const DISAPPEAR_DELAY: Duration = Duration::from_millis(150);
    /// Screen shake after a hit or miss
    pub const SHAKE_DURATION: Duration = Duration::from_millis(150);
}

//! Game state types shared between the session and the shell

use serde::{Deserialize, Serialize};

use super::target::Target;

/// Top-level game state. Only the session changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Start screen, nothing running
    #[default]
    Ready,
    /// Timer running, target on screen
    Playing,
    /// Clock ran out. Only exit is a fresh start.
    GameOver,
}

/// Things that happened during a session call, for feedback and logging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    TargetSpawned { target_id: u64 },
    TargetHit { score: u32, time_left: f32 },
    Missed { time_left: f32 },
    GameOver { score: u32 },
}

impl GameEvent {
    /// Hits and misses both get the gunshot + shake treatment
    pub fn wants_feedback(&self) -> bool {
        matches!(self, GameEvent::TargetHit { .. } | GameEvent::Missed { .. })
    }
}

/// Read-only view the shell renders each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub score: u32,
    /// Seconds, never negative
    pub time_left: f32,
    pub current_target: Option<Target>,
    /// Current target was hit and is fading out
    pub target_hit: bool,
    /// Screen shake is active
    pub shaking: bool,
}

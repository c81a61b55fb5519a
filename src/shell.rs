//! Presentation shell
//!
//! Platform-neutral half of the UI: decides which screen is up, classifies
//! pointer-downs as target or background, advances the session clock and
//! turns session events into feedback. The DOM glue in `main.rs` only
//! draws what this reports.

use std::time::Duration;

use glam::Vec2;

use crate::Settings;
use crate::audio::{AudioManager, SoundEffect};
use crate::sim::{GameEvent, GameState, Session, SessionSnapshot};

/// Which screen to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver { score: u32 },
}

/// What a pointer-down turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Hit,
    Miss,
    /// Not playing, or the target was already fading
    Ignored,
}

pub struct Shell {
    session: Session,
    settings: Settings,
    audio: AudioManager,
    /// Play area size in CSS pixels
    play_area: Vec2,
    torn_down: bool,
}

impl Shell {
    pub fn new(seed: u64, settings: Settings, mut audio: AudioManager) -> Self {
        audio.apply_settings(&settings);
        Self {
            session: Session::new(seed),
            settings,
            audio,
            play_area: Vec2::new(800.0, 600.0),
            torn_down: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the preferences and persist them
    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        settings.save();
        self.settings = settings;
    }

    /// Mute key
    pub fn toggle_mute(&mut self) {
        let settings = Settings {
            muted: !self.settings.muted,
            ..self.settings.clone()
        };
        log::info!("Audio {}", if settings.muted { "muted" } else { "unmuted" });
        self.set_settings(settings);
    }

    /// Shake key
    pub fn toggle_screen_shake(&mut self) {
        let settings = Settings {
            screen_shake: !self.settings.screen_shake,
            ..self.settings.clone()
        };
        log::info!("Screen shake {}", if settings.screen_shake { "on" } else { "off" });
        self.set_settings(settings);
    }

    /// Audio device currently in use
    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn play_area(&self) -> Vec2 {
        self.play_area
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.play_area = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn screen(&self) -> Screen {
        match self.session.state() {
            GameState::Ready => Screen::Start,
            GameState::Playing => Screen::Playing,
            GameState::GameOver => Screen::GameOver {
                score: self.session.score(),
            },
        }
    }

    /// Shake as the player should see it
    pub fn is_shaking(&self) -> bool {
        self.settings.effective_screen_shake() && self.session.is_shaking()
    }

    /// Start (or restart) button
    pub fn start(&mut self) {
        if self.torn_down {
            return;
        }
        self.session.start_game();
        self.flush_events();
    }

    /// Pointer-down at `point`, in pixels relative to the play area
    pub fn pointer_down(&mut self, point: Vec2) -> PointerOutcome {
        if self.torn_down || self.session.state() != GameState::Playing {
            return PointerOutcome::Ignored;
        }

        let on_target = self
            .session
            .current_target()
            .is_some_and(|t| t.contains(point, self.play_area));
        if on_target {
            self.session.pointer_down_on_target();
        } else {
            self.session.pointer_down_on_background();
        }

        let events = self.flush_events();
        if events.iter().any(|e| matches!(e, GameEvent::TargetHit { .. })) {
            PointerOutcome::Hit
        } else if events.iter().any(|e| matches!(e, GameEvent::Missed { .. })) {
            PointerOutcome::Miss
        } else {
            PointerOutcome::Ignored
        }
    }

    /// Advance one animation frame
    pub fn frame(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }
        // The clock is wall time: a slow frame still delivers every tick
        self.session.advance(dt);
        self.flush_events();
    }

    /// Close the audio device and stop reacting to input or time
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.audio.close();
        log::info!("Shell torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Undo a teardown when the page comes back from the back/forward
    /// cache. The session resumes where it was left.
    pub fn remount(&mut self, mut audio: AudioManager) {
        if !self.torn_down {
            return;
        }
        audio.apply_settings(&self.settings);
        self.audio = audio;
        self.torn_down = false;
        log::info!("Shell remounted");
    }

    fn flush_events(&mut self) -> Vec<GameEvent> {
        let events = self.session.drain_events();
        for event in &events {
            if event.wants_feedback() {
                self.audio.play(SoundEffect::Gunshot);
            }
            match event {
                GameEvent::TargetSpawned { target_id } => {
                    log::debug!("Target {target_id} spawned");
                }
                GameEvent::GameOver { score } => {
                    log::info!("Final score: {score}");
                }
                _ => {}
            }
        }
        events
    }
}

/// HUD score text
pub fn format_score(score: u32) -> String {
    format!("Score: {score}")
}

/// HUD clock text, one decimal place
pub fn format_time(time_left: f32) -> String {
    format!("Time: {time_left:.1}s")
}

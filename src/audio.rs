//! Feedback audio
//!
//! Procedurally generated gunshot cue - no external files needed!
//!
//! The output device is opened when the shell mounts and closed on teardown.
//! Every call is fire-and-forget; without an output (no Web Audio, native
//! build, or after teardown) playing is a silent no-op.

use crate::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Hit or miss: low triangle thud plus a filtered noise blast
    Gunshot,
}

/// Audio manager for the game
pub struct AudioManager {
    output: Option<backend::Output>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Open the output device. Falls back to a silent manager if none exists.
    pub fn new() -> Self {
        let output = backend::Output::open();
        if output.is_none() {
            log::warn!("No audio output available - audio disabled");
        }
        Self {
            output,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager that never produces sound
    pub fn disabled() -> Self {
        Self {
            output: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.output.is_some()
    }

    /// Pick up volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(output) = &self.output else { return };

        match effect {
            SoundEffect::Gunshot => output.gunshot(vol),
        }
    }

    /// Release the output device. Later `play` calls do nothing.
    pub fn close(&mut self) {
        if let Some(output) = self.output.take() {
            output.close();
            log::info!("Audio output closed");
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use web_sys::{AudioContext, AudioContextState, BiquadFilterType, OscillatorType};

    /// Noise burst buffer length (seconds)
    const NOISE_SECONDS: f32 = 0.4;

    pub struct Output {
        ctx: AudioContext,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            // May fail outside a secure context or without Web Audio
            AudioContext::new().ok().map(|ctx| Self { ctx })
        }

        pub fn close(&self) {
            if self.ctx.state() != AudioContextState::Closed {
                let _ = self.ctx.close();
            }
        }

        pub fn gunshot(&self, vol: f32) {
            let ctx = &self.ctx;

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if self.body(vol).is_none() || self.blast(vol).is_none() {
                log::warn!("Could not play gunshot");
            }
        }

        /// Heavy impact: triangle wave sweeping down to sub-bass
        fn body(&self, vol: f32) -> Option<()> {
            let ctx = &self.ctx;
            let now = ctx.current_time();

            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Triangle);
            osc.frequency().set_value_at_time(100.0, now).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(20.0, now + 0.3)
                .ok()?;

            gain.gain().set_value_at_time(0.0, now).ok()?;
            gain.gain()
                .linear_ramp_to_value_at_time(vol, now + 0.01)
                .ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, now + 0.3)
                .ok()?;

            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            osc.start_with_when(now).ok()?;
            osc.stop_with_when(now + 0.35).ok()?;
            Some(())
        }

        /// Muzzle blast: low-passed white noise closing down to a rumble
        fn blast(&self, vol: f32) -> Option<()> {
            let ctx = &self.ctx;
            let now = ctx.current_time();
            let sample_rate = ctx.sample_rate();

            let len = (sample_rate * NOISE_SECONDS) as u32;
            let buffer = ctx.create_buffer(1, len, sample_rate).ok()?;
            let noise: Vec<f32> = (0..len)
                .map(|_| (js_sys::Math::random() * 2.0 - 1.0) as f32)
                .collect();
            buffer.copy_to_channel(&noise, 0).ok()?;

            let source = ctx.create_buffer_source().ok()?;
            source.set_buffer(Some(&buffer));

            let filter = ctx.create_biquad_filter().ok()?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value_at_time(2000.0, now).ok()?;
            filter
                .frequency()
                .exponential_ramp_to_value_at_time(100.0, now + 0.25)
                .ok()?;

            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value_at_time(0.0, now).ok()?;
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.8, now + 0.01)
                .ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, now + 0.25)
                .ok()?;

            source.connect_with_audio_node(&filter).ok()?;
            filter.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            source.start_with_when(now).ok()?;
            source.stop_with_when(now + 0.35).ok()?;
            Some(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    /// Native builds have no audio output
    pub enum Output {}

    impl Output {
        pub fn open() -> Option<Self> {
            None
        }

        pub fn close(&self) {
            match *self {}
        }

        pub fn gunshot(&self, _vol: f32) {
            match *self {}
        }
    }
}

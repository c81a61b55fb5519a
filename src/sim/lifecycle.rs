//! Per-target hit / disappear lifecycle
//!
//! A fresh `TargetLifecycle` is created for every spawned target and dropped
//! with it. The pending disappearance is owned by the lifecycle, so dropping
//! (or tearing down) the lifecycle cancels it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::timer::Delay;
use crate::consts::DISAPPEAR_DELAY;

/// Outcome reported upward to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// First click on this target
    Hit { target_id: u64 },
    /// Fade-out finished
    Disappeared { target_id: u64 },
}

#[derive(Debug, Clone)]
pub struct TargetLifecycle {
    target_id: u64,
    hit: bool,
    gone: bool,
    disappear: Option<Delay>,
}

impl TargetLifecycle {
    pub fn new(target_id: u64) -> Self {
        Self {
            target_id,
            hit: false,
            gone: false,
            disappear: None,
        }
    }

    pub fn target_id(&self) -> u64 {
        self.target_id
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Register a click. Only the first click counts; it arms the
    /// disappearance delay.
    pub fn register_click(&mut self) -> Option<LifecycleEvent> {
        if self.hit {
            return None;
        }
        self.hit = true;
        self.disappear = Some(Delay::new(DISAPPEAR_DELAY));
        Some(LifecycleEvent::Hit {
            target_id: self.target_id,
        })
    }

    /// Time until the pending disappearance fires
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.gone {
            return None;
        }
        self.disappear.as_ref().and_then(Delay::remaining)
    }

    /// Advance the fade. Reports `Disappeared` once; a gone target stays
    /// silent.
    pub fn advance(&mut self, dt: Duration) -> Option<LifecycleEvent> {
        if self.gone {
            return None;
        }
        let fired = self.disappear.as_mut().is_some_and(|d| d.advance(dt));
        if !fired {
            return None;
        }
        self.disappear = None;
        self.gone = true;
        Some(LifecycleEvent::Disappeared {
            target_id: self.target_id,
        })
    }

    /// Cancel any pending disappearance. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.disappear.take().is_some() {
            log::debug!("Target {} torn down before disappearing", self.target_id);
        }
    }
}

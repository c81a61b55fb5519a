//! Cancellable timers driven by an explicit clock
//!
//! Nothing here reads wall time. Owners feed elapsed time in through
//! `advance`, so a timer that is dropped can never fire.

use std::time::Duration;

/// One-shot countdown. Fires once, then stays expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    remaining: Duration,
    fired: bool,
}

impl Delay {
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
            fired: false,
        }
    }

    /// Time until the delay fires, `None` once it has fired
    pub fn remaining(&self) -> Option<Duration> {
        (!self.fired).then_some(self.remaining)
    }

    pub fn is_expired(&self) -> bool {
        self.fired
    }

    /// Advance by `dt`. Returns true exactly once, on the step that reaches zero.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.fired = true;
            return true;
        }
        false
    }
}

/// Periodic timer
///
/// `advance` reports how many periods elapsed, so a long frame still
/// delivers every pulse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    until_next: Duration,
}

impl Interval {
    /// Create an interval whose first pulse is one full period away.
    ///
    /// A zero period is bumped to one millisecond so the timer always makes
    /// forward progress.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            until_next: period,
        }
    }

    /// Time until the next pulse
    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    /// Advance by `dt`, returning the number of pulses that fell inside it
    pub fn advance(&mut self, mut dt: Duration) -> u32 {
        let mut pulses = 0;
        while dt >= self.until_next {
            dt -= self.until_next;
            self.until_next = self.period;
            pulses += 1;
        }
        self.until_next -= dt;
        pulses
    }
}

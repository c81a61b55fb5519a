//! Target spawn generator
//!
//! Owns the RNG stream and the identifier counter. Identifiers are never
//! reused for the lifetime of the generator, which outlives restarts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::target::Target;
use crate::consts::*;

/// Ranges a target is drawn from. Positions are percent of the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    pub x_min: f32,
    pub x_max: f32,
    /// Top floor is higher than the side margins to keep the HUD strip clear
    pub y_min: f32,
    pub y_max: f32,
    pub size_min: u32,
    pub size_max: u32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            x_min: TARGET_X_MIN,
            x_max: TARGET_X_MAX,
            y_min: TARGET_Y_MIN,
            y_max: TARGET_Y_MAX,
            size_min: TARGET_MIN_SIZE,
            size_max: TARGET_MAX_SIZE,
        }
    }
}

impl SpawnBounds {
    /// Same ranges with each min/max pair in order. Non-finite percent
    /// bounds fall back to the defaults.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let finite = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        let (x_a, x_b) = (finite(self.x_min, defaults.x_min), finite(self.x_max, defaults.x_max));
        let (y_a, y_b) = (finite(self.y_min, defaults.y_min), finite(self.y_max, defaults.y_max));
        Self {
            x_min: x_a.min(x_b),
            x_max: x_a.max(x_b),
            y_min: y_a.min(y_b),
            y_max: y_a.max(y_b),
            size_min: self.size_min.min(self.size_max),
            size_max: self.size_min.max(self.size_max),
        }
    }
}

/// Seeded target generator
#[derive(Debug, Clone)]
pub struct SpawnGenerator {
    rng: Pcg32,
    next_id: u64,
}

impl SpawnGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Draw a new target uniformly within `bounds`
    pub fn generate(&mut self, bounds: &SpawnBounds) -> Target {
        let bounds = bounds.normalized();
        let size = self.rng.random_range(bounds.size_min..=bounds.size_max);
        let x = self.rng.random_range(bounds.x_min..=bounds.x_max);
        let y = self.rng.random_range(bounds.y_min..=bounds.y_max);

        let id = self.next_id;
        self.next_id += 1;

        Target::new(id, Vec2::new(x, y), size)
    }
}

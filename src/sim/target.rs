//! Target entity
//!
//! Position is stored in percent of the play area so a target keeps its
//! relative place when the window is resized. Size is an absolute pixel
//! diameter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A spawned target. Immutable: a respawn replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    id: u64,
    /// Centre, in percent of the play area (x: width, y: height)
    pos: Vec2,
    /// Diameter in pixels
    size: u32,
}

impl Target {
    pub fn new(id: u64, pos: Vec2, size: u32) -> Self {
        Self { id, pos, size }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size as f32 / 2.0
    }

    /// Centre in pixels for a play area of `area` pixels
    pub fn center_px(&self, area: Vec2) -> Vec2 {
        self.pos / 100.0 * area
    }

    /// True if `point` (pixels, relative to the play area's top-left) lands on
    /// the target's disc
    pub fn contains(&self, point: Vec2, area: Vec2) -> bool {
        point.distance_squared(self.center_px(area)) <= self.radius() * self.radius()
    }
}

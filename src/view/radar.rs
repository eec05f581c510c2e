//! Top-down radar projection
//!
//! Maps the target's position relative to the player onto a round display,
//! rotated so the player's heading is always "up". Targets past the sensor
//! range stick to the rim instead of disappearing.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::motion::Transform;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Keep clamped dots this far inside the usable radius (display units)
pub const EDGE_MARGIN: f32 = 2.0;

/// Indicator positions in display space (origin top-left, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Always the display center
    pub player: Vec2,
    pub target: Vec2,
    /// True when the target was pinned to the rim
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    /// World distance mapped onto the usable radius
    pub max_range: f32,
    /// Half the display size
    pub display_radius: f32,
    /// Radius of the indicator dots
    pub dot_radius: f32,
}

impl Default for Radar {
    fn default() -> Self {
        Self {
            max_range: 50.0,
            display_radius: 75.0,
            dot_radius: 3.0,
        }
    }
}

impl Radar {
    pub fn new(max_range: f32, display_radius: f32, dot_radius: f32) -> Self {
        Self {
            max_range,
            display_radius,
            dot_radius,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.display_radius)
    }

    /// Radius the dots may occupy without spilling over the edge
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        (self.display_radius - self.dot_radius).max(0.0)
    }

    /// Project `target` into display space relative to `player`
    pub fn project(&self, player: &Transform, target: Vec3) -> SensorFrame {
        let center = self.center();
        let effective = self.effective_radius();

        let local = player.to_local_dir(target - player.position);
        let scale = if self.max_range > 0.0 {
            effective / self.max_range
        } else {
            0.0
        };

        // Local +Z (ahead) is display up, local +X (player's left) is display left
        let offset = Vec2::new(-local.x, -local.z) * scale;

        let limit = (effective - EDGE_MARGIN).max(0.0);
        let (dist, angle) = cartesian_to_polar(offset);
        let (offset, clamped) = if dist > limit {
            (polar_to_cartesian(limit, angle), true)
        } else {
            (offset, false)
        };

        SensorFrame {
            player: center,
            target: center + offset,
            clamped,
        }
    }
}

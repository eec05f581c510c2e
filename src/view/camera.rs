//! Chase camera
//!
//! Position is damped toward a point behind and above the followed agent;
//! orientation snaps to the look-at point every tick.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sanitize_dt;
use crate::sim::motion::Transform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFollow {
    pub position: Vec3,
    /// Camera rotation; the camera looks down its local -Z
    pub rotation: Quat,
    /// Last look-at point (world space)
    pub look_at: Vec3,
    /// Ideal camera position in the target's local frame
    pub offset: Vec3,
    /// Look-at point in the target's local frame
    pub look_offset: Vec3,
    /// Higher values follow more tightly
    pub smoothing: f32,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 4.0, -8.0), Vec3::new(0.0, 1.5, 0.0), 4.0)
    }
}

impl CameraFollow {
    pub fn new(offset: Vec3, look_offset: Vec3, smoothing: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 15.0),
            rotation: Quat::IDENTITY,
            look_at: Vec3::ZERO,
            offset,
            look_offset,
            smoothing,
        }
    }

    /// Place the camera at its ideal spot behind `target`, no damping
    pub fn snap_to(&mut self, target: &Transform) {
        self.position = target.to_world(self.offset);
        self.look_at = target.to_world(self.look_offset);
        self.aim();
    }

    /// Direction the camera is facing
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn update(&mut self, target: &Transform, dt: f32) {
        let ideal = target.to_world(self.offset);
        self.look_at = target.to_world(self.look_offset);

        if let Some(dt) = sanitize_dt(dt) {
            let t = (self.smoothing * dt).clamp(0.0, 1.0);
            self.position += (ideal - self.position) * t;
        }
        self.aim();
    }

    fn aim(&mut self) {
        // Looking straight at our own position has no direction; keep the old one
        let Some(back) = (self.position - self.look_at).try_normalize() else {
            return;
        };
        let right = Vec3::Y.cross(back).try_normalize().unwrap_or(Vec3::X);
        let up = back.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, back));
    }
}

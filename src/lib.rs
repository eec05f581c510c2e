//! Robo Chase - chase a wandering robot around an obstacle arena
//!
//! Core modules:
//! - `sim`: Simulation (movement, collision, target AI, round rules)
//! - `view`: Presentation helpers driven by the simulation (radar, camera)
//! - `remote`: Intent delivery from the gesture command channel
//! - `tuning`: Data-driven game balance

pub mod remote;
pub mod sim;
pub mod tuning;
pub mod view;

pub use remote::{BaseAction, Intent, IntentSlot};
pub use sim::{GameEvent, GameSession, RoundPhase};
pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Placement retries per obstacle slot before the slot is dropped
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Target waits this long after a reset before its first decision
    pub const TARGET_RESET_WAIT: f32 = 1.0;
    /// Wander duration range (seconds)
    pub const TARGET_MOVE_MIN: f32 = 1.0;
    pub const TARGET_MOVE_MAX: f32 = 3.0;
    /// Pause duration range (seconds)
    pub const TARGET_WAIT_MIN: f32 = 0.5;
    pub const TARGET_WAIT_MAX: f32 = 2.5;
}

/// Treat zero, negative and non-finite frame times as "no time elapsed"
#[inline]
pub fn sanitize_dt(dt: f32) -> Option<f32> {
    (dt.is_finite() && dt > 0.0).then_some(dt)
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Local forward axis (+Z) rotated by a yaw about +Y
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

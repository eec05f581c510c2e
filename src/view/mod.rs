//! Presentation-side consumers of the simulation
//!
//! Both run every tick regardless of round phase and never write back into
//! the simulation.

pub mod camera;
pub mod radar;

pub use camera::CameraFollow;
pub use radar::{Radar, SensorFrame};

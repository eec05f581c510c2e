//! Simulation module
//!
//! All gameplay logic lives here. Rules for this module:
//! - One synchronous `tick` per frame, no blocking
//! - Randomness only through the session's seeded RNG
//! - No rendering or transport dependencies

pub mod aabb;
pub mod ai;
pub mod motion;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use ai::{AiMode, TargetAi};
pub use motion::{Agent, MoveOutcome, Transform};
pub use obstacles::{
    Obstacle, ObstacleField, ObstacleTemplate, ObstacleTemplates, PlacementParams, SafeZone,
    WorldBounds,
};
pub use state::{GameEvent, GameSession, RoundPhase, RoundState};
pub use tick::{check_catch, start_round, tick, tick_from_slot};

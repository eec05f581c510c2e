//! Target robot behavior
//!
//! A two-state wander loop driven by a countdown. When the countdown runs
//! out the robot either sets off in a random direction or stops for a while.
//! Blocked moves do not trigger an early decision; the robot keeps pushing
//! until its timer fires.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::motion::{Agent, MoveOutcome};
use super::obstacles::{ObstacleField, WorldBounds};
use crate::consts::*;
use crate::remote::Intent;
use crate::sanitize_dt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiMode {
    Waiting,
    Moving,
}

/// The AI-controlled robot the player chases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetAi {
    pub agent: Agent,
    pub mode: AiMode,
    /// Seconds until the next decision
    pub decision_timer: f32,
    pub bounds: WorldBounds,
}

impl TargetAi {
    pub fn new(body: Aabb, move_speed: f32, bounds: WorldBounds) -> Self {
        Self {
            // The target never steers through intents, so its turn rate is unused
            agent: Agent::new(body, move_speed, 0.0),
            mode: AiMode::Waiting,
            decision_timer: TARGET_RESET_WAIT,
            bounds,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.agent.position()
    }

    /// Intent implied by the current mode
    pub fn intent(&self) -> Intent {
        match self.mode {
            AiMode::Moving => Intent::forward(0.0),
            AiMode::Waiting => Intent::STOP,
        }
    }

    /// Flip mode and draw a new timer
    pub fn decide(&mut self, rng: &mut impl Rng) {
        match self.mode {
            AiMode::Waiting => {
                self.mode = AiMode::Moving;
                self.decision_timer = rng.random_range(TARGET_MOVE_MIN..TARGET_MOVE_MAX);
                self.agent.face(rng.random_range(0.0..TAU));
            }
            AiMode::Moving => {
                self.mode = AiMode::Waiting;
                self.decision_timer = rng.random_range(TARGET_WAIT_MIN..TARGET_WAIT_MAX);
            }
        }
    }

    /// Run the countdown and return this tick's intent
    pub fn think(&mut self, rng: &mut impl Rng, dt: f32) -> Intent {
        let Some(dt) = sanitize_dt(dt) else {
            return Intent::STOP;
        };
        self.decision_timer -= dt;
        if self.decision_timer <= 0.0 {
            self.decide(rng);
        }
        self.intent()
    }

    /// Decide, then move inside the arena against the obstacle field
    pub fn update(&mut self, obstacles: &ObstacleField, rng: &mut impl Rng, dt: f32) -> MoveOutcome {
        let intent = self.think(rng, dt);
        self.agent.step(intent, obstacles, Some(&self.bounds), dt)
    }

    /// Drop the robot somewhere random in the arena and make it wait a second.
    ///
    /// Spots overlapping an obstacle are resampled up to `max_attempts` times.
    /// If none is free the robot stays where it is. Returns whether it moved.
    pub fn reset_position(
        &mut self,
        obstacles: &ObstacleField,
        rng: &mut impl Rng,
        max_attempts: u32,
    ) -> bool {
        self.mode = AiMode::Waiting;
        self.decision_timer = TARGET_RESET_WAIT;

        let yaw = self.agent.transform.yaw;
        for _ in 0..max_attempts.max(1) {
            let candidate = self.bounds.sample(rng);
            if !obstacles.blocks(&self.agent.aabb_at(candidate)) {
                self.agent.place(candidate, yaw);
                return true;
            }
        }
        log::warn!("No free spot for the target, keeping it at {:?}", self.position());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::BaseAction;
    use crate::sim::motion::default_body;
    use crate::sim::obstacles::{ObstacleTemplate, ObstacleTemplates, PlacementParams};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn target() -> TargetAi {
        TargetAi::new(default_body(), 3.5, WorldBounds::default())
    }

    #[test]
    fn test_waiting_to_moving_on_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ai = target();
        ai.mode = AiMode::Waiting;
        ai.decision_timer = 0.1;

        let intent = ai.think(&mut rng, 0.2);
        assert_eq!(ai.mode, AiMode::Moving);
        assert!(ai.decision_timer >= 1.0 && ai.decision_timer < 3.0);
        assert_eq!(intent.base_action, BaseAction::Forward);
        assert_eq!(intent.turn_intensity, 0.0);
    }

    #[test]
    fn test_moving_to_waiting_keeps_heading() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ai = target();
        ai.mode = AiMode::Moving;
        ai.agent.face(1.25);
        ai.decision_timer = 0.05;

        let intent = ai.think(&mut rng, 0.1);
        assert_eq!(ai.mode, AiMode::Waiting);
        assert!(ai.decision_timer >= 0.5 && ai.decision_timer < 2.5);
        assert!((ai.agent.transform.yaw - 1.25).abs() < 1e-6);
        assert_eq!(intent, Intent::STOP);
    }

    #[test]
    fn test_timer_counts_down_without_deciding() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ai = target();
        ai.decision_timer = 1.0;
        ai.think(&mut rng, 0.25);
        assert_eq!(ai.mode, AiMode::Waiting);
        assert!((ai.decision_timer - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_headings_are_normalized() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ai = target();
        for _ in 0..200 {
            ai.mode = AiMode::Waiting;
            ai.decide(&mut rng);
            let yaw = ai.agent.transform.yaw;
            assert!((-std::f32::consts::PI..std::f32::consts::PI).contains(&yaw));
        }
    }

    #[test]
    fn test_moving_stops_at_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ai = TargetAi::new(default_body(), 3.5, WorldBounds { x: 10.0, z: 10.0 });
        ai.agent.place(Vec3::new(0.0, 0.0, 9.95), 0.0);
        ai.mode = AiMode::Moving;
        ai.decision_timer = 5.0;

        let out = ai.update(&ObstacleField::new(), &mut rng, 0.1);
        assert_eq!(out, MoveOutcome::Blocked);
        assert_eq!(ai.position(), Vec3::new(0.0, 0.0, 9.95));
        // Still moving, still waiting for the timer
        assert_eq!(ai.mode, AiMode::Moving);
        assert!((ai.decision_timer - 4.9).abs() < 1e-5);
    }

    #[test]
    fn test_bad_dt_leaves_timer() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ai = target();
        ai.decision_timer = 0.5;
        ai.update(&ObstacleField::new(), &mut rng, f32::NAN);
        ai.update(&ObstacleField::new(), &mut rng, -1.0);
        assert_eq!(ai.decision_timer, 0.5);
    }

    #[test]
    fn test_reset_position_avoids_obstacles() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = WorldBounds { x: 15.0, z: 15.0 };
        let mut templates = ObstacleTemplates::new();
        templates.insert(
            "block".to_string(),
            ObstacleTemplate::new(Aabb::new(
                Vec3::new(-1.5, 0.0, -1.5),
                Vec3::new(1.5, 2.0, 1.5),
            )),
        );
        let mut field = ObstacleField::new();
        field.generate(
            &PlacementParams {
                count: 20,
                world_bounds: bounds,
                min_spacing: 3.0,
                max_attempts: 50,
            },
            &[],
            &templates,
            &mut rng,
        );

        let mut ai = TargetAi::new(default_body(), 3.5, bounds);
        for _ in 0..50 {
            ai.mode = AiMode::Moving;
            assert!(ai.reset_position(&field, &mut rng, 50));
            assert!(bounds.contains(ai.position()));
            assert!(!field.blocks(ai.agent.aabb()));
            assert_eq!(ai.mode, AiMode::Waiting);
            assert_eq!(ai.decision_timer, 1.0);
        }
    }
}

//! Agent movement with collision rejection
//!
//! Player and target share this code path. A proposed move is tested by
//! sliding the agent's committed box by the move delta; any overlap with an
//! obstacle rejects the whole move for that tick. There is no sliding and no
//! partial step.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::obstacles::{ObstacleField, WorldBounds};
use crate::remote::{BaseAction, Intent};
use crate::{forward_from_yaw, normalize_angle, sanitize_dt};

/// Position plus heading about +Y
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Radians, 0 faces +Z
    pub yaw: f32,
}

impl Transform {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    /// Transform a point from this frame's local space into world space
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        glam::Quat::from_rotation_y(self.yaw) * local + self.position
    }

    /// Rotate a world-space offset into this frame's local axes
    #[inline]
    pub fn to_local_dir(&self, world_offset: Vec3) -> Vec3 {
        glam::Quat::from_rotation_y(-self.yaw) * world_offset
    }
}

/// What happened to the translation part of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No translation requested (or no time elapsed)
    Idle,
    Moved,
    /// Move rejected by an obstacle or the arena edge
    Blocked,
}

/// Default robot body, local space, feet at y = 0
pub fn default_body() -> Aabb {
    Aabb::new(Vec3::new(-0.6, 0.0, -0.6), Vec3::new(0.6, 1.8, 0.6))
}

/// A mobile entity with a body box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub transform: Transform,
    /// Body bounds in local space
    pub body: Aabb,
    /// Units per second
    pub move_speed: f32,
    /// Radians per second at full turn intensity
    pub turn_rate: f32,
    aabb: Aabb,
}

impl Agent {
    pub fn new(body: Aabb, move_speed: f32, turn_rate: f32) -> Self {
        let transform = Transform::default();
        Self {
            aabb: Aabb::from_local_yawed(&body, transform.yaw, transform.position),
            transform,
            body,
            move_speed,
            turn_rate,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// World box for the committed transform
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Teleport, bypassing collision
    pub fn place(&mut self, position: Vec3, yaw: f32) {
        self.transform = Transform::new(position, normalize_angle(yaw));
        self.refresh_aabb();
    }

    /// Set heading in place. Rotation is never collision-checked.
    pub fn face(&mut self, yaw: f32) {
        self.transform.yaw = normalize_angle(yaw);
        self.refresh_aabb();
    }

    /// World box this agent would have at `position` with its current yaw
    pub fn aabb_at(&self, position: Vec3) -> Aabb {
        Aabb::from_local_yawed(&self.body, self.transform.yaw, position)
    }

    fn refresh_aabb(&mut self) {
        self.aabb = Aabb::from_local_yawed(&self.body, self.transform.yaw, self.transform.position);
    }

    /// Advance one tick under `intent`.
    ///
    /// Turning only happens while moving forward. When `bounds` is given the
    /// candidate position must also stay inside the arena.
    pub fn step(
        &mut self,
        intent: Intent,
        obstacles: &ObstacleField,
        bounds: Option<&WorldBounds>,
        dt: f32,
    ) -> MoveOutcome {
        let Some(dt) = sanitize_dt(dt) else {
            return MoveOutcome::Idle;
        };

        // Box committed at the end of the previous tick
        let committed = self.aabb;

        if intent.base_action == BaseAction::Forward && intent.turn_intensity != 0.0 {
            self.transform.yaw =
                normalize_angle(self.transform.yaw + self.turn_rate * intent.turn_intensity * dt);
        }

        let displacement = match intent.base_action {
            BaseAction::Forward => self.move_speed * dt,
            BaseAction::Backward => -self.move_speed * dt,
            BaseAction::Stop => 0.0,
        };

        let outcome = if displacement == 0.0 {
            MoveOutcome::Idle
        } else {
            let current = self.transform.position;
            let next = current + self.transform.forward() * displacement;
            let in_bounds = bounds.is_none_or(|b| b.contains(next));
            let hypothetical = committed.translate(next - current);

            if in_bounds && !obstacles.blocks(&hypothetical) {
                self.transform.position = next;
                MoveOutcome::Moved
            } else {
                MoveOutcome::Blocked
            }
        };

        self.refresh_aabb();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::{ObstacleTemplate, ObstacleTemplates, PlacementParams};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn agent() -> Agent {
        Agent::new(default_body(), 5.0, PI)
    }

    /// One obstacle, regenerated until it lands; placed wherever the RNG says
    fn single_obstacle_field() -> ObstacleField {
        let mut templates = ObstacleTemplates::new();
        templates.insert(
            "crate".to_string(),
            ObstacleTemplate::new(Aabb::new(
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 2.0, 1.0),
            )),
        );
        let params = PlacementParams {
            count: 1,
            world_bounds: WorldBounds { x: 20.0, z: 20.0 },
            min_spacing: 4.0,
            max_attempts: 50,
        };
        let mut field = ObstacleField::new();
        field.generate(&params, &[], &templates, &mut Pcg32::seed_from_u64(1));
        assert_eq!(field.len(), 1);
        field
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let mut a = agent();
        let out = a.step(Intent::forward(0.0), &ObstacleField::new(), None, 0.5);
        assert_eq!(out, MoveOutcome::Moved);
        assert!((a.position() - Vec3::new(0.0, 0.0, 2.5)).length() < 1e-5);
        assert!((a.aabb().center().z - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_backward_and_stop() {
        let mut a = agent();
        a.face(FRAC_PI_2);
        a.step(Intent::backward(), &ObstacleField::new(), None, 1.0);
        assert!((a.position() - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);

        let before = a.transform;
        let out = a.step(Intent::STOP, &ObstacleField::new(), None, 1.0);
        assert_eq!(out, MoveOutcome::Idle);
        assert_eq!(a.transform, before);
    }

    #[test]
    fn test_turn_only_while_forward() {
        let mut a = agent();
        a.step(
            Intent::new(BaseAction::Backward, 1.0),
            &ObstacleField::new(),
            None,
            0.5,
        );
        assert_eq!(a.transform.yaw, 0.0);
        a.step(Intent::new(BaseAction::Stop, 1.0), &ObstacleField::new(), None, 0.5);
        assert_eq!(a.transform.yaw, 0.0);

        a.step(Intent::forward(0.5), &ObstacleField::new(), None, 0.5);
        assert!((a.transform.yaw - PI * 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_blocked_move_keeps_position_but_rotates() {
        let field = single_obstacle_field();
        let obstacle = field.obstacles()[0].clone();

        // Stand just south of the obstacle, facing it (+Z), with a small gap
        let mut a = agent();
        let start = Vec3::new(
            obstacle.position.x,
            0.0,
            obstacle.aabb.min.z - 0.6 - 0.05,
        );
        a.place(start, 0.0);

        let before = a.position();
        let out = a.step(Intent::forward(0.2), &field, None, 0.1);
        assert_eq!(out, MoveOutcome::Blocked);
        assert_eq!(a.position().x.to_bits(), before.x.to_bits());
        assert_eq!(a.position().y.to_bits(), before.y.to_bits());
        assert_eq!(a.position().z.to_bits(), before.z.to_bits());
        assert!((a.transform.yaw - PI * 0.2 * 0.1).abs() < 1e-6);
        assert!(!field.blocks(a.aabb()));
    }

    #[test]
    fn test_moving_away_from_obstacle_is_allowed() {
        let field = single_obstacle_field();
        let obstacle = field.obstacles()[0].clone();
        let mut a = agent();
        a.place(
            Vec3::new(obstacle.position.x, 0.0, obstacle.aabb.min.z - 0.6 - 0.05),
            0.0,
        );
        let out = a.step(Intent::backward(), &field, None, 0.1);
        assert_eq!(out, MoveOutcome::Moved);
    }

    #[test]
    fn test_bounds_gate() {
        let bounds = WorldBounds { x: 10.0, z: 10.0 };
        let mut a = agent();
        a.place(Vec3::new(0.0, 0.0, 9.9), 0.0);
        let out = a.step(Intent::forward(0.0), &ObstacleField::new(), Some(&bounds), 0.1);
        assert_eq!(out, MoveOutcome::Blocked);
        assert_eq!(a.position(), Vec3::new(0.0, 0.0, 9.9));

        // Without bounds the same move goes through
        let out = a.step(Intent::forward(0.0), &ObstacleField::new(), None, 0.1);
        assert_eq!(out, MoveOutcome::Moved);
    }

    #[test]
    fn test_bad_dt_is_noop() {
        let mut a = agent();
        a.place(Vec3::new(1.0, 0.0, 1.0), 0.3);
        let before = a.transform;
        for dt in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let out = a.step(Intent::forward(1.0), &ObstacleField::new(), None, dt);
            assert_eq!(out, MoveOutcome::Idle);
            assert_eq!(a.transform, before);
        }
    }

    #[test]
    fn test_transform_frames() {
        let t = Transform::new(Vec3::new(1.0, 0.0, 1.0), FRAC_PI_2);
        let world = t.to_world(Vec3::new(0.0, 0.0, 2.0));
        assert!((world - Vec3::new(3.0, 0.0, 1.0)).length() < 1e-5);
        let local = t.to_local_dir(Vec3::new(2.0, 0.0, 0.0));
        assert!((local - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }
}

//! Procedural obstacle placement
//!
//! Obstacles are scattered by rejection sampling inside the arena. A slot
//! that cannot find a legal spot within its attempt budget is dropped, so a
//! crowded arena simply ends up with fewer obstacles.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Arena half-extents on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub x: f32,
    pub z: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { x: 45.0, z: 45.0 }
    }
}

impl WorldBounds {
    /// Inclusive containment test on X and Z
    #[inline]
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.x && pos.z.abs() <= self.z
    }

    /// Uniform ground-plane sample in `[-x, x] × [-z, z]`
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        let x = self.x.abs();
        let z = self.z.abs();
        Vec3::new(rng.random_range(-x..=x), 0.0, rng.random_range(-z..=z))
    }
}

/// Circular exclusion region around a reference point
#[derive(Debug, Clone, Copy)]
pub struct SafeZone {
    pub center: Vec3,
    pub radius: f32,
}

impl SafeZone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn excludes(&self, pos: Vec3) -> bool {
        ground_distance(self.center, pos) < self.radius
    }
}

/// Pre-loaded obstacle geometry, described by its local-space bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    pub bounds: Aabb,
}

impl ObstacleTemplate {
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }
}

/// Named obstacle templates, sorted by name for reproducible picks
pub type ObstacleTemplates = BTreeMap<String, ObstacleTemplate>;

/// A placed, static obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Template the geometry was cloned from
    pub kind: String,
    pub position: Vec3,
    pub aabb: Aabb,
}

/// Placement parameters for one generation pass
#[derive(Debug, Clone, Copy)]
pub struct PlacementParams {
    pub count: u32,
    pub world_bounds: WorldBounds,
    pub min_spacing: f32,
    pub max_attempts: u32,
}

/// The static obstacle set for the current round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// True if `aabb` overlaps any obstacle
    pub fn blocks(&self, aabb: &Aabb) -> bool {
        self.obstacles.iter().any(|o| o.aabb.intersects(aabb))
    }

    /// Replace the field with a freshly sampled one.
    ///
    /// Returns the number of obstacles placed.
    pub fn generate(
        &mut self,
        params: &PlacementParams,
        safe_zones: &[SafeZone],
        templates: &ObstacleTemplates,
        rng: &mut impl Rng,
    ) -> usize {
        self.clear();

        if templates.is_empty() {
            log::warn!("No obstacle templates loaded, cannot generate obstacles");
            return 0;
        }

        let mut skipped = 0u32;
        for _ in 0..params.count {
            let pick = rng.random_range(0..templates.len());
            let Some((kind, template)) = templates.iter().nth(pick) else {
                continue;
            };

            let Some(position) = self.find_position(params, safe_zones, rng) else {
                skipped += 1;
                continue;
            };

            let id = self.obstacles.len() as u32 + 1;
            self.obstacles.push(Obstacle {
                id,
                kind: kind.clone(),
                position,
                aabb: template.bounds.translate(position),
            });
        }

        if skipped > 0 {
            log::debug!(
                "Obstacle placement skipped {} of {} slots",
                skipped,
                params.count
            );
        }
        log::info!("Generated {} obstacles", self.obstacles.len());
        self.obstacles.len()
    }

    fn find_position(
        &self,
        params: &PlacementParams,
        safe_zones: &[SafeZone],
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        for _ in 0..params.max_attempts {
            let candidate = params.world_bounds.sample(rng);

            if safe_zones.iter().any(|zone| zone.excludes(candidate)) {
                continue;
            }
            let crowded = self
                .obstacles
                .iter()
                .any(|o| ground_distance(o.position, candidate) < params.min_spacing);
            if crowded {
                continue;
            }
            return Some(candidate);
        }
        None
    }
}

/// Distance between two points projected on the ground plane
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

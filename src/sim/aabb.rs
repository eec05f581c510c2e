//! Axis-aligned bounding boxes
//!
//! Every collision test in the game is a box-vs-box overlap in world space.
//! Boxes are value types: moving an entity means computing a new box, never
//! patching a shared one.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World- or local-space box given by its min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Box centered on `center` extending `half_extents` along each axis
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self {
            min: center - h,
            max: center + h,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap on all three axes. Touching faces do not count.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Point strictly inside the box
    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpgt(self.min).all() && p.cmplt(self.max).all()
    }

    /// Copy of this box shifted by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// World box of a local-space box after a yaw about +Y and a translation.
    ///
    /// The result is the axis-aligned hull of the eight rotated corners, so a
    /// yawed body grows its box rather than clipping it.
    pub fn from_local_yawed(local: &Aabb, yaw: f32, position: Vec3) -> Aabb {
        let rot = Quat::from_rotation_y(yaw);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { local.min.x } else { local.max.x },
                if i & 2 == 0 { local.min.y } else { local.max.y },
                if i & 4 == 0 { local.min.z } else { local.max.z },
            );
            let world = rot * corner + position;
            min = min.min(world);
            max = max.max(world);
        }
        Aabb { min, max }
    }
}

//! Axis-aligned bounding boxes
//!
//! The only collision geometry in the game: boxes around the player hull and
//! around obstacles, shrunk by a forgiveness inset before testing.

use glam::Vec3;

/// Axis-aligned box given by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Grow (positive) or shrink (negative) every face by `amount`
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Shrink every face by `inset`
    #[inline]
    pub fn inset(&self, inset: f32) -> Self {
        self.expanded(-inset)
    }

    /// Inclusive overlap test (touching faces count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// Smallest box enclosing both
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

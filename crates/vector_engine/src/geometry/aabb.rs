//! 2D axis-aligned bounding box

use crate::foundation::math::{Point2, Vec2};

/// Axis-aligned bounding box in 2D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point2,
    /// Maximum corner
    pub max: Point2,
}

impl Aabb {
    /// Create a box from explicit corners
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Create a box from a center and half-extents
    pub fn from_center_half_extents(center: Point2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing all given points
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = *points.first()?;
        let mut aabb = Self::new(first, first);
        for p in &points[1..] {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
        }
        Some(aabb)
    }

    /// Center of the box
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Test overlap against another box
    ///
    /// Boxes that merely touch along an edge do not count as overlapping;
    /// broad-phase candidates that matter have real overlap and the narrow
    /// phase settles touching contact.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Grow the box by a margin on every side
    pub fn grown(&self, margin: f32) -> Self {
        let m = Vec2::new(margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

//! Math utilities and types
//!
//! Provides fundamental 2D math types for vector games.

pub use nalgebra::{Rotation2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 2D rotation type
pub type Rot2 = Rotation2<f32>;

/// Left-hand perpendicular of a vector (90 degrees counter-clockwise)
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross2(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed area of a polygon (positive for counter-clockwise winding)
pub fn polygon_signed_area(points: &[Point2]) -> f32 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        area += p1.x * p2.y - p2.x * p1.y;
    }
    area * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perp_rotates_left() {
        let v = Vec2::new(1.0, 0.0);
        assert_eq!(perp(v), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_cross2_sign() {
        assert!(cross2(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)) > 0.0);
        assert!(cross2(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_signed_area_square() {
        let ccw = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert_relative_eq!(polygon_signed_area(&ccw), 4.0);

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(polygon_signed_area(&cw), -4.0);
    }
}

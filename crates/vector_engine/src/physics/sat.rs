//! Separating Axis Theorem overlap test for convex polygons
//!
//! Exact for convex input: if any edge normal of either polygon separates
//! the projected intervals, the polygons do not overlap. No epsilon is
//! applied, so boundary contact counts as a collision.

use crate::foundation::math::{perp, Point2, Vec2};

/// Project a polygon onto an axis, returning the covered interval
fn project_polygon(axis: Vec2, polygon: &[Point2]) -> (f32, f32) {
    let mut min = axis.dot(&polygon[0].coords);
    let mut max = min;
    for p in &polygon[1..] {
        let projection = axis.dot(&p.coords);
        if projection < min {
            min = projection;
        } else if projection > max {
            max = projection;
        }
    }
    (min, max)
}

fn intervals_overlap((min_a, max_a): (f32, f32), (min_b, max_b): (f32, f32)) -> bool {
    max_a >= min_b && max_b >= min_a
}

/// Test a single candidate separating axis; `true` means no separation here
fn axis_overlaps(a: &[Point2], b: &[Point2], edge: Vec2) -> bool {
    // Zero-length edges give no axis to test; skip them.
    let Some(axis) = perp(edge).try_normalize(f32::EPSILON) else {
        return true;
    };
    intervals_overlap(project_polygon(axis, a), project_polygon(axis, b))
}

/// Exact overlap test between two convex polygons
pub fn polygons_collide(a: &[Point2], b: &[Point2]) -> bool {
    for polygon in [a, b] {
        for i in 0..polygon.len() {
            let p1 = polygon[i];
            let p2 = polygon[(i + 1) % polygon.len()];
            if !axis_overlaps(a, b, p2 - p1) {
                return false;
            }
        }
    }
    true
}

//! Convex decomposition of simple polygons
//!
//! Splits a non-convex simple polygon into convex pieces by cutting along
//! interior diagonals anchored at reflex vertices. The search keeps the
//! split yielding the fewest pieces it finds, pruned by a running bound;
//! piece-count minimality is best-effort, a valid covering is guaranteed.

use super::GeometryError;
use crate::foundation::math::Point2;

/// Cross product of (p2 - p1) and (p3 - p1); positive for a left turn
fn sign(p1: Point2, p2: Point2, p3: Point2) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

/// Intersection test between ray/segment `a1->a2` and segment `b1->b2`
///
/// The `a` side is a ray from `a1` unless `a1_bounded`, which restricts it
/// to the segment. The `b` side is always treated as a segment, open at its
/// endpoints so shared polygon vertices do not count as crossings.
fn intersect(a1: Point2, a2: Point2, b1: Point2, b2: Point2, a1_bounded: bool) -> bool {
    let a_dir = a2 - a1;
    let b_dir = b2 - b1;
    let denominator = b_dir.x * a_dir.y - a_dir.x * b_dir.y;

    if denominator == 0.0 {
        return false;
    }

    let t1 = (b_dir.x * (b1.y - a1.y) - b_dir.y * (b1.x - a1.x)) / denominator;
    let t2 = (a_dir.x * (b1.y - a1.y) - a_dir.y * (b1.x - a1.x)) / denominator;
    t1 > 0.0 && t2 > 0.0 && t2 < 1.0 && (!a1_bounded || t1 < 1.0)
}

/// Parity test: does the diagonal `i -> j` run through the polygon interior?
///
/// Casts a ray from the diagonal midpoint along its perpendicular and counts
/// edge crossings; an odd count means the midpoint is inside.
fn is_inside(polygon: &[Point2], i: usize, j: usize) -> bool {
    let p1 = polygon[i];
    let p2 = polygon[j];
    let m = nalgebra::center(&p1, &p2);
    let d = p2 - p1;
    let n = Point2::new(m.x + d.y, m.y - d.x);

    let mut intersections = 0;
    for k in 0..polygon.len() {
        let k2 = (k + 1) % polygon.len();
        if intersect(m, n, polygon[k], polygon[k2], false) {
            intersections += 1;
        }
    }
    intersections % 2 == 1
}

/// Visibility test: the diagonal `i -> j` must not cross any non-adjacent edge
fn is_visible(polygon: &[Point2], i: usize, j: usize) -> bool {
    let p1 = polygon[i];
    let p2 = polygon[j];
    for k in 0..polygon.len() {
        let k2 = (k + 1) % polygon.len();
        if k == i || k2 == j || k == j || k2 == i {
            continue;
        }
        if intersect(p1, p2, polygon[k], polygon[k2], true) {
            return false;
        }
    }
    true
}

/// Sub-polygon from vertex `i` to vertex `j` inclusive, wrapping if needed
fn slice_polygon(polygon: &[Point2], i: usize, j: usize) -> Vec<Point2> {
    if i < j {
        polygon[i..=j].to_vec()
    } else {
        polygon[i..]
            .iter()
            .chain(polygon[..=j].iter())
            .copied()
            .collect()
    }
}

fn remove_identical_points(polygon: &[Point2]) -> Vec<Point2> {
    let mut result = Vec::with_capacity(polygon.len());
    for (i, p) in polygon.iter().enumerate() {
        if i == 0 || p.x != polygon[i - 1].x || p.y != polygon[i - 1].y {
            result.push(*p);
        }
    }
    result
}

fn remove_collinear_points(polygon: &[Point2]) -> Vec<Point2> {
    let mut result = Vec::with_capacity(polygon.len());
    for i in 0..polygon.len() {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % polygon.len()];
        let p3 = polygon[(i + 2) % polygon.len()];
        let v0 = (p2 - p1).normalize();
        let v1 = (p3 - p2).normalize();
        if v0.dot(&v1) < 0.999 {
            result.push(p2);
        }
    }
    result
}

/// Indices of vertices where the turn direction flips (reflex boundaries)
///
/// Returns an empty list for a convex polygon.
fn find_sign_changes(polygon: &[Point2]) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut signs: Vec<bool> = Vec::new();
    for i in 0..polygon.len() {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % polygon.len()];
        let p3 = polygon[(i + 2) % polygon.len()];
        let positive = sign(p1, p2, p3) > 0.0;
        if signs.last() != Some(&positive) {
            indices.push((i + 1) % polygon.len());
            signs.push(positive);
        }
    }
    if signs.first() == signs.last() && !indices.is_empty() {
        indices.remove(0);
    }
    indices
}

/// Recursive fewest-pieces search
///
/// `shortest` bounds the piece count a candidate may still spend; branches
/// that cannot beat the best split found so far are pruned, which also
/// guarantees termination. Every slice is strictly smaller than its parent.
fn decompose_internal(polygon: &[Point2], shortest: usize) -> Option<Vec<Vec<Point2>>> {
    debug_assert!(polygon.len() >= 3);
    if polygon.len() == 3 {
        return Some(vec![polygon.to_vec()]);
    }
    let indices = find_sign_changes(polygon);
    if indices.is_empty() {
        return Some(vec![polygon.to_vec()]);
    }
    if shortest < 3 {
        return None;
    }

    let mut shortest = shortest;
    let mut min: Option<Vec<Vec<Point2>>> = None;
    for &v1 in &indices {
        for j in 0..polygon.len() - 3 {
            let v2 = (v1 + 2 + j) % polygon.len();
            if !is_visible(polygon, v1, v2) {
                continue;
            }
            if !is_inside(polygon, v1, v2) {
                continue;
            }
            let left = slice_polygon(polygon, v1, v2);
            let right = slice_polygon(polygon, v2, v1);
            if let Some(left_pieces) = decompose_internal(&left, shortest - 1) {
                if left_pieces.len() < shortest {
                    if let Some(right_pieces) =
                        decompose_internal(&right, shortest - left_pieces.len())
                    {
                        let mut decomposed = left_pieces;
                        decomposed.extend(right_pieces);
                        if min.as_ref().map_or(true, |m| decomposed.len() < m.len()) {
                            shortest = decomposed.len();
                            min = Some(decomposed);
                        }
                    }
                }
            }
        }
    }
    min
}

/// Decompose a simple polygon into convex pieces whose union reconstructs it.
///
/// Duplicate-adjacent and collinear points are stripped first; they break
/// the turn-direction scan. A polygon that is already convex (or a triangle)
/// comes back as a single piece. If no valid diagonal exists the input is
/// returned whole rather than failing.
pub fn decompose_polygon(polygon: &[Point2]) -> Result<Vec<Vec<Point2>>, GeometryError> {
    let cleaned = remove_collinear_points(&remove_identical_points(polygon));
    if cleaned.len() < 3 {
        return Err(GeometryError::DegeneratePolygon {
            actual: cleaned.len(),
        });
    }
    Ok(decompose_internal(&cleaned, 999_999).unwrap_or_else(|| vec![cleaned]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::polygon_signed_area;
    use approx::assert_relative_eq;

    fn is_convex(polygon: &[Point2]) -> bool {
        let mut positive = false;
        let mut negative = false;
        for i in 0..polygon.len() {
            let s = sign(
                polygon[i],
                polygon[(i + 1) % polygon.len()],
                polygon[(i + 2) % polygon.len()],
            );
            if s > 0.0 {
                positive = true;
            } else if s < 0.0 {
                negative = true;
            }
        }
        !(positive && negative)
    }

    #[test]
    fn test_triangle_passes_through() {
        let triangle = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let pieces = decompose_polygon(&triangle).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], triangle);
    }

    #[test]
    fn test_convex_polygon_single_piece() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let pieces = decompose_polygon(&square).unwrap();
        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn test_l_shape_covering() {
        let l_shape = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let pieces = decompose_polygon(&l_shape).unwrap();
        assert!(pieces.len() >= 2);

        let mut total_area = 0.0;
        for piece in &pieces {
            assert!(piece.len() >= 3);
            assert!(is_convex(piece), "non-convex piece: {piece:?}");
            total_area += polygon_signed_area(piece).abs();
        }
        assert_relative_eq!(total_area, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_cleanup_removes_duplicates_and_collinear() {
        // Square with a duplicated corner and collinear edge midpoints.
        let noisy = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let pieces = decompose_polygon(&noisy).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].len(), 4);
        assert_relative_eq!(polygon_signed_area(&pieces[0]).abs(), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_polygon_is_an_error() {
        let segment = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(decompose_polygon(&segment).is_err());
    }
}

//! Stroke tesselation for polyline/polygon outlines
//!
//! Converts outlines into two coupled outputs:
//!
//! - feathered triangle geometry: a flat vertex buffer (position + alpha,
//!   where alpha 1.0 marks the solid stroke edge and 0.0 the feather edge)
//!   and a triangle index buffer, concatenated across all outlines;
//! - convex collision polygons approximating the solid stroke boundary
//!   (feather excluded), produced by decomposing each anchor's stroke
//!   region.
//!
//! Each vertex of an outline is an anchor bounded by the midpoints of its
//! two adjacent segments. The inner side of a corner is resolved with a
//! miter (offset-line intersection); the outer side is filled with a short
//! arc fan whose segment count follows the turn angle.

use super::{decompose::decompose_polygon, GeometryError};
use crate::foundation::math::{cross2, perp, polygon_signed_area, Point2, Vec2};
use bytemuck::{Pod, Zeroable};

const POINT_EPS: f32 = 1e-6;
const STRAIGHT_EPS: f32 = 1e-4;

/// A single stroke outline: an open polyline or a closed polygon
#[derive(Debug, Clone)]
pub struct Outline {
    /// Ordered outline points (no explicit closing duplicate)
    pub points: Vec<Point2>,
    /// Whether the last point connects back to the first
    pub closed: bool,
}

impl Outline {
    /// Create an open polyline
    pub fn open(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Create a closed polygon
    pub fn closed(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }
}

/// Vertex of the tesselated stroke geometry
///
/// `alpha` is 1.0 on the solid stroke edge and 0.0 on the feather edge; the
/// renderer interpolates between them for the antialiased falloff.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Position in outline space
    pub pos: [f32; 2],
    /// Feather alpha tag
    pub alpha: f32,
}

/// Tesselation output: renderable geometry plus collision polygons
#[derive(Debug, Clone, Default)]
pub struct LineGeometry {
    /// Flat vertex buffer
    pub vertices: Vec<LineVertex>,
    /// Triangle index buffer into `vertices`
    pub indices: Vec<u32>,
    /// Convex polygons covering the solid stroke, wound counter-clockwise
    pub collision: Vec<Vec<Point2>>,
}

struct GeometryBuilder {
    vertices: Vec<LineVertex>,
    indices: Vec<u32>,
    collision: Vec<Vec<Point2>>,
}

impl GeometryBuilder {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            collision: Vec::new(),
        }
    }

    fn vertex(&mut self, p: Point2, alpha: f32) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(LineVertex {
            pos: [p.x, p.y],
            alpha,
        });
        index
    }

    /// Emit one triangle, reordered to counter-clockwise; degenerate
    /// (zero-area) triangles are dropped.
    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        let pa = Vec2::new(self.vertices[a as usize].pos[0], self.vertices[a as usize].pos[1]);
        let pb = Vec2::new(self.vertices[b as usize].pos[0], self.vertices[b as usize].pos[1]);
        let pc = Vec2::new(self.vertices[c as usize].pos[0], self.vertices[c as usize].pos[1]);
        let area = cross2(pb - pa, pc - pa);
        if area.abs() < POINT_EPS {
            return;
        }
        if area > 0.0 {
            self.indices.extend_from_slice(&[a, b, c]);
        } else {
            self.indices.extend_from_slice(&[a, c, b]);
        }
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangle(a, b, c);
        self.triangle(c, d, a);
    }

    /// Record a solid stroke region: normalized to counter-clockwise and
    /// decomposed into convex pieces.
    fn collision_polygon(&mut self, mut points: Vec<Point2>) -> Result<(), GeometryError> {
        if polygon_signed_area(&points) < 0.0 {
            points.reverse();
        }
        self.collision.extend(decompose_polygon(&points)?);
        Ok(())
    }

    fn finish(self) -> LineGeometry {
        LineGeometry {
            vertices: self.vertices,
            indices: self.indices,
            collision: self.collision,
        }
    }
}

/// Intersection of lines `p + t·r` and `q + u·s`
fn line_intersect(p: Point2, r: Vec2, q: Point2, s: Vec2) -> Option<Point2> {
    let den = cross2(r, s);
    if den.abs() < 1e-9 {
        return None;
    }
    let t = cross2(q - p, s) / den;
    Some(p + r * t)
}

/// Arc segment count for a corner's outer fan, by turn angle
fn arc_segment_count(angle: f32) -> usize {
    let deg = angle.to_degrees();
    if deg < 10.0 {
        1
    } else if deg < 20.0 {
        2
    } else if deg < 30.0 {
        3
    } else {
        4
    }
}

/// Tesselate a set of outlines with the given stroke thickness and feather
/// (antialiasing falloff) width.
///
/// Per-outline buffers are concatenated into one `LineGeometry`; indices are
/// offset as vertices accumulate. Outlines with fewer than 2 points or with
/// coincident consecutive points are rejected: those indicate broken static
/// shape data.
pub fn tesselate_outlines(
    outlines: &[Outline],
    thickness: f32,
    feather: f32,
) -> Result<LineGeometry, GeometryError> {
    let mut builder = GeometryBuilder::new();
    let half = thickness * 0.5;

    for outline in outlines {
        validate_outline(outline)?;
        let points = &outline.points;
        if points.len() == 2 {
            emit_segment(&mut builder, points[0], points[1], half, feather)?;
        } else if outline.closed {
            emit_closed(&mut builder, points, half, feather)?;
        } else {
            emit_open(&mut builder, points, half, feather)?;
        }
    }
    Ok(builder.finish())
}

fn validate_outline(outline: &Outline) -> Result<(), GeometryError> {
    let points = &outline.points;
    if points.len() < 2 {
        return Err(GeometryError::DegenerateOutline {
            required: 2,
            actual: points.len(),
        });
    }
    let last_pair = if outline.closed && points.len() > 2 {
        points.len()
    } else {
        points.len() - 1
    };
    for i in 0..last_pair {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        if (b - a).norm() <= POINT_EPS {
            return Err(GeometryError::ZeroLengthSegment { index: i });
        }
    }
    Ok(())
}

fn emit_closed(
    builder: &mut GeometryBuilder,
    points: &[Point2],
    half: f32,
    feather: f32,
) -> Result<(), GeometryError> {
    // Consistent winding so collision polygons share an orientation.
    let mut pts = points.to_vec();
    if polygon_signed_area(&pts) < 0.0 {
        pts.reverse();
    }
    let n = pts.len();
    let midpoints: Vec<Point2> = (0..n)
        .map(|i| nalgebra::center(&pts[i], &pts[(i + 1) % n]))
        .collect();

    for i in 0..n {
        let m0 = midpoints[(i + n - 1) % n];
        let m1 = midpoints[i];
        emit_anchor(builder, m0, pts[i], m1, half, feather)?;
    }
    Ok(())
}

fn emit_open(
    builder: &mut GeometryBuilder,
    points: &[Point2],
    half: f32,
    feather: f32,
) -> Result<(), GeometryError> {
    let n = points.len();
    let midpoints: Vec<Point2> = (0..n - 1)
        .map(|i| nalgebra::center(&points[i], &points[i + 1]))
        .collect();

    // End half-segments get plain caps; interior vertices are full anchors.
    emit_segment(builder, points[0], midpoints[0], half, feather)?;
    for i in 1..n - 1 {
        emit_anchor(builder, midpoints[i - 1], points[i], midpoints[i], half, feather)?;
    }
    emit_segment(builder, midpoints[n - 2], points[n - 1], half, feather)
}

/// Straight stroke piece: solid quad plus one feather quad per side
fn emit_segment(
    builder: &mut GeometryBuilder,
    a: Point2,
    b: Point2,
    half: f32,
    feather: f32,
) -> Result<(), GeometryError> {
    let d = b - a;
    let len = d.norm();
    if len <= POINT_EPS {
        return Err(GeometryError::ZeroLengthSegment { index: 0 });
    }
    let n = perp(d / len);
    let nf = n * (half + feather);
    let nw = n * half;

    let al = builder.vertex(a + nw, 1.0);
    let bl = builder.vertex(b + nw, 1.0);
    let br = builder.vertex(b - nw, 1.0);
    let ar = builder.vertex(a - nw, 1.0);
    builder.quad(al, bl, br, ar);

    if feather > POINT_EPS {
        let alf = builder.vertex(a + nf, 0.0);
        let blf = builder.vertex(b + nf, 0.0);
        builder.quad(alf, blf, bl, al);
        let arf = builder.vertex(a - nf, 0.0);
        let brf = builder.vertex(b - nf, 0.0);
        builder.quad(ar, br, brf, arf);
    }

    builder.collision_polygon(vec![a + nw, b + nw, b - nw, a - nw])
}

/// One anchor: the stroke around `m0 -> p -> m1`
fn emit_anchor(
    builder: &mut GeometryBuilder,
    m0: Point2,
    p: Point2,
    m1: Point2,
    half: f32,
    feather: f32,
) -> Result<(), GeometryError> {
    let v0 = p - m0;
    let v1 = m1 - p;
    let l0 = v0.norm();
    let l1 = v1.norm();
    if l0 <= POINT_EPS || l1 <= POINT_EPS {
        return Err(GeometryError::ZeroLengthSegment { index: 0 });
    }
    let d0 = v0 / l0;
    let d1 = v1 / l1;
    let turn = cross2(d0, d1);
    let angle = turn.abs().atan2(d0.dot(&d1));

    // Nearly straight: no corner to resolve.
    if angle < STRAIGHT_EPS {
        return emit_segment(builder, m0, m1, half, feather);
    }

    let side = if turn > 0.0 { 1.0 } else { -1.0 };
    let ni0 = perp(d0) * side;
    let ni1 = perp(d1) * side;
    let fw = half + feather;

    // Inner corner: offset-line intersection at stroke and feather radii.
    let inner = line_intersect(m0 + ni0 * half, d0, m1 + ni1 * half, d1)
        .unwrap_or(p + ni0 * half);
    let inner_f = line_intersect(m0 + ni0 * fw, d0, m1 + ni1 * fw, d1).unwrap_or(p + ni0 * fw);

    // Outer corner: arc fan between the two outer normals.
    let o0 = -ni0;
    let o1 = -ni1;
    let start = o0.y.atan2(o0.x);
    let sweep = cross2(o0, o1).atan2(o0.dot(&o1));
    let segments = arc_segment_count(angle);
    let arc: Vec<Point2> = (0..=segments)
        .map(|k| {
            let theta = start + sweep * (k as f32 / segments as f32);
            p + Vec2::new(theta.cos(), theta.sin()) * half
        })
        .collect();
    let arc_f: Vec<Point2> = (0..=segments)
        .map(|k| {
            let theta = start + sweep * (k as f32 / segments as f32);
            p + Vec2::new(theta.cos(), theta.sin()) * fw
        })
        .collect();

    let a0 = m0 + ni0 * half;
    let b0 = m0 - ni0 * half;
    let a1 = m1 + ni1 * half;
    let b1 = m1 - ni1 * half;

    let a0_id = builder.vertex(a0, 1.0);
    let b0_id = builder.vertex(b0, 1.0);
    let a1_id = builder.vertex(a1, 1.0);
    let b1_id = builder.vertex(b1, 1.0);
    let inner_id = builder.vertex(inner, 1.0);
    let arc_ids: Vec<u32> = arc.iter().map(|&q| builder.vertex(q, 1.0)).collect();

    // Solid stroke: section quad, corner fan, section quad.
    builder.quad(a0_id, b0_id, arc_ids[0], inner_id);
    for k in 0..segments {
        builder.triangle(inner_id, arc_ids[k], arc_ids[k + 1]);
    }
    builder.quad(inner_id, arc_ids[segments], b1_id, a1_id);

    if feather > POINT_EPS {
        let a0f_id = builder.vertex(m0 + ni0 * fw, 0.0);
        let b0f_id = builder.vertex(m0 - ni0 * fw, 0.0);
        let a1f_id = builder.vertex(m1 + ni1 * fw, 0.0);
        let b1f_id = builder.vertex(m1 - ni1 * fw, 0.0);
        let inner_f_id = builder.vertex(inner_f, 0.0);
        let arc_f_ids: Vec<u32> = arc_f.iter().map(|&q| builder.vertex(q, 0.0)).collect();

        builder.quad(a0f_id, a0_id, inner_id, inner_f_id);
        builder.quad(inner_f_id, inner_id, a1_id, a1f_id);
        builder.quad(b0_id, b0f_id, arc_f_ids[0], arc_ids[0]);
        for k in 0..segments {
            builder.quad(arc_ids[k], arc_f_ids[k], arc_f_ids[k + 1], arc_ids[k + 1]);
        }
        builder.quad(arc_ids[segments], arc_f_ids[segments], b1f_id, b1_id);
    }

    // Collision outline of the solid region: inner boundary through the
    // miter, outer boundary back along the arc.
    let mut region = Vec::with_capacity(6 + segments);
    region.push(a0);
    region.push(inner);
    region.push(a1);
    region.push(b1);
    for q in arc.iter().rev() {
        region.push(*q);
    }
    region.push(b0);
    builder.collision_polygon(region)
}

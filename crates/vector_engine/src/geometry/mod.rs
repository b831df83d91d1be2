//! 2D geometry: bounding boxes, stroke tesselation, convex decomposition
//!
//! Shape outlines are authored as polylines/polygons; tesselation turns them
//! into feathered triangle geometry for rendering plus convex collision
//! polygons for the narrow phase. Geometry errors indicate broken static
//! shape data and are fatal.

pub mod aabb;
pub mod decompose;
pub mod tesselate;

pub use aabb::Aabb;
pub use decompose::decompose_polygon;
pub use tesselate::{tesselate_outlines, LineGeometry, LineVertex, Outline};

use thiserror::Error;

/// Errors raised by geometry precomputation
///
/// These indicate bugs in static shape data, not runtime conditions; callers
/// propagate them rather than attempting recovery.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// An outline had fewer points than its tesselation requires
    #[error("outline needs at least {required} points, got {actual}")]
    DegenerateOutline {
        /// Minimum point count for this outline kind
        required: usize,
        /// Point count actually supplied
        actual: usize,
    },

    /// A polygon collapsed below 3 points after cleanup
    #[error("polygon degenerated to {actual} points after cleanup")]
    DegeneratePolygon {
        /// Point count after removing duplicates and collinear points
        actual: usize,
    },

    /// Two consecutive outline points coincide
    #[error("zero-length segment at outline point {index}")]
    ZeroLengthSegment {
        /// Index of the first of the coincident points
        index: usize,
    },
}

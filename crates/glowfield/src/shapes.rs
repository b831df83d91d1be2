//! Static shape outlines and their precomputed geometry
//!
//! Outlines are authored in a unit-ish space, scaled per shape, then
//! tesselated once at startup. The results feed both the renderer (vertex +
//! index buffers) and the collision system (convex polygons).

use vector_engine::foundation::math::Point2;
use vector_engine::geometry::{tesselate_outlines, GeometryError, LineGeometry, Outline};

/// The shape vocabulary of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeId {
    /// The player ship
    Player,
    /// Small diamond, the composite enemy's body part
    Diamond,
    /// Large diamond with crossing bars
    CrossedDiamond,
}

impl ShapeId {
    /// All shapes, for precomputation
    pub const ALL: [ShapeId; 3] = [ShapeId::Player, ShapeId::Diamond, ShapeId::CrossedDiamond];
}

fn scaled(points: &[[f32; 2]], scale: f32) -> Vec<Point2> {
    points
        .iter()
        .map(|p| Point2::new(p[0] * scale, p[1] * scale))
        .collect()
}

/// Authored outlines for a shape, already scaled to world units
fn outlines(id: ShapeId) -> Vec<Outline> {
    match id {
        ShapeId::Player => vec![Outline::closed(scaled(
            &[
                [0.0, -0.3],
                [-0.5, 0.0],
                [-0.5, 0.5],
                [-0.4, 0.1],
                [-0.2, 0.0],
                [0.0, 0.2],
                [0.2, 0.0],
                [0.4, 0.1],
                [0.5, 0.5],
                [0.5, 0.0],
            ],
            30.0,
        ))],
        ShapeId::Diamond => vec![Outline::closed(scaled(
            &[[0.0, -0.5], [-0.4, 0.0], [0.0, 0.5], [0.4, 0.0]],
            50.0,
        ))],
        ShapeId::CrossedDiamond => {
            let scale = 500.0;
            vec![
                Outline::closed(scaled(
                    &[[0.0, -0.5], [-0.4, 0.0], [0.0, 0.5], [0.4, 0.0]],
                    scale,
                )),
                Outline::open(scaled(&[[0.0, -0.5], [0.0, 0.5]], scale)),
                Outline::open(scaled(&[[-0.4, 0.0], [0.4, 0.0]], scale)),
            ]
        }
    }
}

/// Stroke parameters per shape: (thickness, feather)
fn stroke(id: ShapeId) -> (f32, f32) {
    match id {
        ShapeId::Player => (2.0, 1.0),
        ShapeId::Diamond => (3.0, 1.0),
        ShapeId::CrossedDiamond => (30.0, 10.0),
    }
}

/// Precomputed geometry for every shape type
pub struct ShapeLibrary {
    player: LineGeometry,
    diamond: LineGeometry,
    crossed_diamond: LineGeometry,
}

impl ShapeLibrary {
    /// Tesselate every shape once
    ///
    /// Failure here means the authored outline tables are broken; the error
    /// is fatal and propagates to startup.
    pub fn build() -> Result<Self, GeometryError> {
        let tesselate = |id| {
            let (thickness, feather) = stroke(id);
            tesselate_outlines(&outlines(id), thickness, feather)
        };
        Ok(Self {
            player: tesselate(ShapeId::Player)?,
            diamond: tesselate(ShapeId::Diamond)?,
            crossed_diamond: tesselate(ShapeId::CrossedDiamond)?,
        })
    }

    /// Geometry for a shape
    pub fn geometry(&self, id: ShapeId) -> &LineGeometry {
        match id {
            ShapeId::Player => &self.player,
            ShapeId::Diamond => &self.diamond,
            ShapeId::CrossedDiamond => &self.crossed_diamond,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vector_engine::foundation::math::polygon_signed_area;

    #[test]
    fn test_library_builds() {
        let library = ShapeLibrary::build().unwrap();
        for id in ShapeId::ALL {
            let geometry = library.geometry(id);
            assert!(!geometry.vertices.is_empty(), "{id:?} has no vertices");
            assert!(!geometry.indices.is_empty(), "{id:?} has no indices");
            assert!(!geometry.collision.is_empty(), "{id:?} has no collision");
        }
    }

    #[test]
    fn test_collision_polygons_are_usable() {
        let library = ShapeLibrary::build().unwrap();
        for id in ShapeId::ALL {
            for piece in &library.geometry(id).collision {
                assert!(piece.len() >= 3);
                assert!(
                    polygon_signed_area(piece) > 0.0,
                    "{id:?} produced a non-CCW or degenerate piece"
                );
            }
        }
    }
}

//! Composite enemy spawning and formation behavior
//!
//! A DiamondSquare is a parent entity owning four child diamond shapes in a
//! slowly rotating cross formation. The parent carries the health; children
//! carry the shape tags the collision and render paths see.

use crate::components::{Diamond, DiamondSquare, Health, Parent, Position, ShapeColor};
use vector_engine::ecs::{Entity, World};
use vector_engine::foundation::math::{Rot2, Vec2};

/// Distance of each child diamond from the composite center
pub const DIAMOND_SQUARE_OFFSET: f32 = 6.0;

/// Spawn parameters for a DiamondSquare composite
#[derive(Debug, Clone)]
pub struct SpawnDiamondSquare {
    /// Spawn position
    pub pos: Vec2,
    /// Initial formation angle in radians
    pub angle: f32,
    /// Starting health
    pub health: f32,
    /// Stroke color shared by the children
    pub color: [f32; 3],
}

/// Create a composite enemy: the parent plus exactly four child shapes
pub fn spawn_diamond_square(world: &mut World, params: &SpawnDiamondSquare, now: f32) -> Entity {
    let parent = world.create_entity();
    let mut position = Position::at(params.pos);
    position.angle = params.angle;
    world.add_component(parent, position);
    world.add_component(parent, Health::new(params.health));

    let mut shapes = [parent; 4];
    for slot in &mut shapes {
        let child = world.create_entity();
        world.add_component(child, Position::at(params.pos));
        world.add_component(child, Diamond::default());
        world.add_component(child, Parent { parent });
        world.add_component(child, ShapeColor {
            color: params.color,
        });
        *slot = child;
    }
    world.add_component(parent, DiamondSquare {
        shapes,
        spawn_time: now,
    });
    parent
}

/// Destroy a composite and all four owned children
///
/// The composite's `shapes` array is the sole ownership record, so this is
/// the only place children are released.
pub fn despawn_diamond_square(world: &mut World, entity: Entity) {
    if let Some(composite) = world.get_component::<DiamondSquare>(entity).copied() {
        for child in composite.shapes {
            world.destroy_entity(child);
        }
    }
    world.destroy_entity(entity);
}

/// Per-frame formation update for all DiamondSquare composites
pub struct EnemyBehaviorSystem;

impl EnemyBehaviorSystem {
    /// Rotate each formation and place its children on breathing offsets
    pub fn run(&self, world: &mut World, elapsed: f32, dt: f32) {
        let composites = world.entities_with::<DiamondSquare>();
        for entity in composites {
            let Some(composite) = world.get_component::<DiamondSquare>(entity).copied() else {
                continue;
            };
            let (center, angle) = {
                let Some(position) = world.get_component_mut::<Position>(entity) else {
                    continue;
                };
                position.angle = (position.angle + std::f32::consts::PI * 1e-4 * dt)
                    % (2.0 * std::f32::consts::PI);
                (position.pos, position.angle)
            };

            let phase = 0.8 * ((elapsed - composite.spawn_time) * 0.001).sin();
            let reach = DIAMOND_SQUARE_OFFSET + phase;
            let rotation = Rot2::new(angle);
            let offsets = [
                Vec2::new(0.0, reach),
                Vec2::new(reach, 0.0),
                Vec2::new(0.0, -reach),
                Vec2::new(-reach, 0.0),
            ];
            for (child, offset) in composite.shapes.into_iter().zip(offsets) {
                if let Some(position) = world.get_component_mut::<Position>(child) {
                    position.pos = center + rotation * offset;
                    position.angle = angle;
                }
            }
        }
    }
}

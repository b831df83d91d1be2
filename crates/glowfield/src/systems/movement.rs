//! Position integration
//!
//! Advances every entity with a Position component: acceleration into
//! velocity, velocity into position, angular velocity into angle.
//! Acceleration is an impulse accumulator and clears each step.

use crate::components::Position;
use vector_engine::ecs::World;

/// Integrate all Position components by one timestep
pub fn integrate_positions(world: &mut World, dt: f32) {
    for entity in world.entities_with::<Position>() {
        if let Some(position) = world.get_component_mut::<Position>(entity) {
            let acc = position.acc;
            position.vel += acc * dt;
            position.pos += position.vel * dt;
            position.angle += position.angular_vel * dt;
            position.acc.fill(0.0);
        }
    }
}

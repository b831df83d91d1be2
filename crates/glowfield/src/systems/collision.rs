//! Bullet/enemy collision orchestration
//!
//! Two-phase test each frame: a fresh quadtree over all live bullets' AABBs
//! (broad phase), then SAT between every candidate bullet's oriented
//! rectangle and the enemy's transformed convex sub-polygons (narrow
//! phase). A bullet marked for removal is never retested within the frame;
//! marked bullets are removed afterwards in descending index order so the
//! pool's swap-removal cannot disturb pending indices.

use crate::components::{CrossedDiamond, Diamond, Parent, Position};
use crate::config::CollisionConfig;
use crate::render::ParticleSpawner;
use crate::shapes::{ShapeId, ShapeLibrary};
use crate::systems::projectile::BulletPool;
use std::collections::HashSet;
use vector_engine::ecs::{Entity, World};
use vector_engine::foundation::math::{Point2, Rot2, Vec2};
use vector_engine::geometry::Aabb;
use vector_engine::physics::polygons_collide;
use vector_engine::spatial::{QuadTree, QuadTreeConfig};

/// A bullet hit against a composite enemy
#[derive(Debug, Clone, Copy)]
pub struct HitEvent {
    /// The composite that should take damage (the shape's parent, or the
    /// shape entity itself when it has no parent)
    pub target: Entity,
    /// Bullet position at impact
    pub position: Vec2,
}

/// Per-frame collision orchestrator
pub struct CollisionSystem {
    /// Bullets already marked for removal this frame
    pending: HashSet<usize>,
    /// Reused workspace for an enemy's transformed polygon points
    transformed: Vec<Vec<Point2>>,
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionSystem {
    /// Create the collision system
    pub fn new() -> Self {
        Self {
            pending: HashSet::new(),
            transformed: Vec::new(),
        }
    }

    /// Run one frame of collision detection
    ///
    /// Marked bullets are removed from the pool before returning; the
    /// returned hit events carry the damage targets for the enemy step.
    pub fn run(
        &mut self,
        world: &World,
        shapes: &ShapeLibrary,
        pool: &mut BulletPool,
        player_pos: Vec2,
        range: f32,
        config: &CollisionConfig,
        explosion_size: f32,
        explosion_lifetime: f32,
        particles: &mut dyn ParticleSpawner,
    ) -> Vec<HitEvent> {
        self.pending.clear();
        let mut hits = Vec::new();
        if pool.is_empty() {
            return hits;
        }

        // Broad phase: rebuild the tree from the live bullets, O(bullets).
        let half = range + config.world_margin;
        let bounds = Aabb::from_center_half_extents(
            Point2::from(player_pos),
            Vec2::new(half, half),
        );
        let tree_config = QuadTreeConfig {
            max_items: config.max_items_per_node,
            max_depth: config.max_depth,
        };
        let mut tree: QuadTree<usize> = QuadTree::new(bounds, tree_config);
        for i in 0..pool.len() {
            tree.insert(i, pool.aabb(i));
        }

        for (entity, shape) in tagged_shapes(world) {
            let Some(position) = world.get_component::<Position>(entity) else {
                continue;
            };
            self.test_enemy(
                world,
                shapes,
                pool,
                &tree,
                entity,
                shape,
                position,
                explosion_size,
                explosion_lifetime,
                particles,
                &mut hits,
            );
        }

        // Descending order keeps every pending index valid across swaps.
        let mut marked: Vec<usize> = self.pending.iter().copied().collect();
        marked.sort_unstable_by(|a, b| b.cmp(a));
        for index in marked {
            pool.remove(index);
        }
        if !hits.is_empty() {
            log::debug!("{} bullet hits, {} bullets live", hits.len(), pool.len());
        }
        hits
    }

    fn test_enemy(
        &mut self,
        world: &World,
        shapes: &ShapeLibrary,
        pool: &BulletPool,
        tree: &QuadTree<usize>,
        entity: Entity,
        shape: ShapeId,
        position: &Position,
        explosion_size: f32,
        explosion_lifetime: f32,
        particles: &mut dyn ParticleSpawner,
        hits: &mut Vec<HitEvent>,
    ) {
        let rotation = Rot2::new(position.angle);
        let translation = position.pos;

        self.transformed.clear();
        let mut enemy_bounds: Option<Aabb> = None;
        for piece in &shapes.geometry(shape).collision {
            let mut points = Vec::with_capacity(piece.len());
            for p in piece {
                let world_point = Point2::from(rotation * p.coords + translation);
                points.push(world_point);
            }
            if let Some(piece_bounds) = Aabb::from_points(&points) {
                enemy_bounds = Some(match enemy_bounds {
                    Some(existing) => existing.union(&piece_bounds),
                    None => piece_bounds,
                });
            }
            self.transformed.push(points);
        }
        let Some(enemy_bounds) = enemy_bounds else {
            return;
        };

        let target = world
            .get_component::<Parent>(entity)
            .map_or(entity, |parent| parent.parent);

        for bullet in tree.query(enemy_bounds) {
            if self.pending.contains(&bullet) {
                continue;
            }
            let rectangle = pool.polygon(bullet);
            for piece in &self.transformed {
                if polygons_collide(piece, &rectangle) {
                    let impact = pool.position(bullet);
                    particles.spawn_explosion(impact, explosion_size, explosion_lifetime);
                    self.pending.insert(bullet);
                    hits.push(HitEvent {
                        target,
                        position: impact,
                    });
                    break;
                }
            }
        }
    }
}

/// Entities carrying any shape tag, with the shape they render/collide as
fn tagged_shapes(world: &World) -> Vec<(Entity, ShapeId)> {
    let mut tagged = Vec::new();
    for (entity, _) in world.iter_components::<Diamond>() {
        tagged.push((entity, ShapeId::Diamond));
    }
    for (entity, _) in world.iter_components::<CrossedDiamond>() {
        tagged.push((entity, ShapeId::CrossedDiamond));
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Health;
    use crate::render::NullParticles;
    use crate::systems::projectile::BulletPool;

    struct CountingParticles(usize);
    impl ParticleSpawner for CountingParticles {
        fn spawn_explosion(&mut self, _position: Vec2, _size: f32, _lifetime: f32) {
            self.0 += 1;
        }
    }

    fn spawn_diamond_at(world: &mut World, pos: Vec2) -> Entity {
        let e = world.create_entity();
        world.add_component(e, Position::at(pos));
        world.add_component(e, Diamond::default());
        e
    }

    #[test]
    fn test_bullet_hitting_diamond_is_removed() {
        let mut world = World::new();
        let shapes = ShapeLibrary::build().unwrap();
        let mut pool = BulletPool::new();
        let mut system = CollisionSystem::new();
        let mut particles = CountingParticles(0);

        let enemy = spawn_diamond_at(&mut world, Vec2::new(100.0, 0.0));
        world.add_component(enemy, Health::new(100.0));
        // On the stroke: the diamond's lower vertex sits 25 units below its
        // center (outline scale 50).
        pool.spawn(Vec2::new(100.0, -25.0), Vec2::new(1.0, 0.0));

        let hits = system.run(
            &mut world,
            &shapes,
            &mut pool,
            Vec2::zeros(),
            700.0,
            &CollisionConfig::default(),
            6.0,
            0.4,
            &mut particles,
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, enemy);
        assert_eq!(pool.len(), 0);
        assert_eq!(particles.0, 1);
    }

    #[test]
    fn test_missing_bullet_survives() {
        let mut world = World::new();
        let shapes = ShapeLibrary::build().unwrap();
        let mut pool = BulletPool::new();
        let mut system = CollisionSystem::new();

        spawn_diamond_at(&mut world, Vec2::new(100.0, 0.0));
        pool.spawn(Vec2::new(-300.0, -300.0), Vec2::new(1.0, 0.0));

        let hits = system.run(
            &mut world,
            &shapes,
            &mut pool,
            Vec2::zeros(),
            700.0,
            &CollisionConfig::default(),
            6.0,
            0.4,
            &mut NullParticles,
        );
        assert!(hits.is_empty());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_one_bullet_hits_only_once() {
        let mut world = World::new();
        let shapes = ShapeLibrary::build().unwrap();
        let mut pool = BulletPool::new();
        let mut system = CollisionSystem::new();
        let mut particles = CountingParticles(0);

        // Two overlapping enemies; the bullet sits inside both, but once
        // marked it must not be retested against the second.
        spawn_diamond_at(&mut world, Vec2::new(50.0, 0.0));
        spawn_diamond_at(&mut world, Vec2::new(51.0, 0.0));
        // Between the two lower vertices, inside both strokes.
        pool.spawn(Vec2::new(50.5, -25.0), Vec2::new(1.0, 0.0));

        let hits = system.run(
            &mut world,
            &shapes,
            &mut pool,
            Vec2::zeros(),
            700.0,
            &CollisionConfig::default(),
            6.0,
            0.4,
            &mut particles,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(particles.0, 1);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn test_hit_targets_parent_composite() {
        let mut world = World::new();
        let shapes = ShapeLibrary::build().unwrap();
        let mut pool = BulletPool::new();
        let mut system = CollisionSystem::new();

        let composite = world.create_entity();
        world.add_component(composite, Health::new(100.0));
        let child = spawn_diamond_at(&mut world, Vec2::new(10.0, 10.0));
        world.add_component(child, Parent { parent: composite });
        pool.spawn(Vec2::new(10.0, -15.0), Vec2::new(1.0, 0.0));

        let hits = system.run(
            &mut world,
            &shapes,
            &mut pool,
            Vec2::zeros(),
            700.0,
            &CollisionConfig::default(),
            6.0,
            0.4,
            &mut NullParticles,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, composite);
    }

    #[test]
    fn test_crossed_diamond_collides_too() {
        let mut world = World::new();
        let shapes = ShapeLibrary::build().unwrap();
        let mut pool = BulletPool::new();
        let mut system = CollisionSystem::new();

        let e = world.create_entity();
        world.add_component(e, Position::at(Vec2::new(0.0, 300.0)));
        world.add_component(e, CrossedDiamond::default());
        // Dead center of the crossing bars.
        pool.spawn(Vec2::new(0.0, 300.0), Vec2::new(1.0, 0.0));

        let hits = system.run(
            &mut world,
            &shapes,
            &mut pool,
            Vec2::zeros(),
            700.0,
            &CollisionConfig::default(),
            6.0,
            0.4,
            &mut NullParticles,
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(pool.len(), 0);
    }
}

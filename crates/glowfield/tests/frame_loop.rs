//! End-to-end simulation tests: worker integration, collision, and the
//! full frame loop.

use glowfield::components::{Diamond, Health, Position};
use glowfield::config::{CollisionConfig, GameConfig};
use glowfield::render::{NullParticles, ParticleSpawner};
use glowfield::shapes::ShapeLibrary;
use glowfield::systems::collision::CollisionSystem;
use glowfield::systems::projectile::{BulletJob, BulletPool, BulletWorker};
use glowfield::{Game, InputState};
use vector_engine::ecs::World;
use vector_engine::foundation::math::Vec2;

struct CountingParticles(usize);

impl ParticleSpawner for CountingParticles {
    fn spawn_explosion(&mut self, _position: Vec2, _size: f32, _lifetime: f32) {
        self.0 += 1;
    }
}

/// A bullet fired from the origin travels to (100, 0) after one second,
/// lands inside an enemy polygon there, and is removed from the pool.
#[test]
fn bullet_travels_hits_and_leaves_the_pool() {
    let shapes = ShapeLibrary::build().unwrap();
    let mut world = World::new();

    // Diamond centered 25 above the impact point: its lower vertex (and the
    // stroke around it) sits at (100, 0).
    let enemy = world.create_entity();
    world.add_component(enemy, Position::at(Vec2::new(100.0, 25.0)));
    world.add_component(enemy, Diamond::default());
    world.add_component(enemy, Health::new(100.0));

    let mut pool = BulletPool::new();
    pool.spawn(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
    assert_eq!(pool.len(), 1);

    // Off-thread integrate/cull/derive with dt = 1.
    let worker = BulletWorker::spawn(700.0);
    worker
        .submit(BulletJob {
            pool,
            player_pos: Vec2::zeros(),
            dt: 1.0,
        })
        .unwrap();
    let mut pool = worker.join_frame().unwrap();
    assert_eq!(pool.len(), 1);
    assert!((pool.position(0) - Vec2::new(100.0, 0.0)).norm() < 1e-3);

    let mut collision = CollisionSystem::new();
    let mut particles = CountingParticles(0);
    let hits = collision.run(
        &world,
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
    assert_eq!(pool.len(), 0, "pool count must drop by exactly one");
    assert_eq!(particles.0, 1);

    // Damage lands on the enemy.
    let health = world.get_component_mut::<Health>(enemy).unwrap();
    health.take_damage(10.0);
    assert_eq!(health.current, 90.0);
}

/// Two minutes of frames: every fired bullet is either still alive or was
/// removed by a hit (nothing strays past the cull range this quickly).
#[test]
fn frame_loop_conserves_bullets() {
    let mut game = Game::with_seed(GameConfig::default(), 1234).unwrap();
    let input = InputState {
        pointer: Vec2::new(400.0, 300.0),
        screen_width: 800.0,
        screen_height: 600.0,
        firing: true,
    };
    let mut particles = CountingParticles(0);

    let mut last_bullets = 0;
    for _ in 0..120 {
        let output = game.step(&input, &mut particles, 1.0 / 60.0).unwrap();
        last_bullets = output.bullet_count;
    }

    // Shots land every 0.3 seconds over 2 seconds of game time.
    let fired = last_bullets + particles.0;
    assert!(
        (5..=7).contains(&fired),
        "expected about 6 shots, got {last_bullets} live + {} exploded",
        particles.0
    );

    // Wave 1 spawned on the first frame and is still running: the frame
    // output carries the player plus one composite's four children.
    assert_eq!(game.waves().level(), 1);
    let output = game.step(&input, &mut particles, 1.0 / 60.0).unwrap();
    assert_eq!(output.instances.len(), 5);
}

/// Killing every enemy completes the wave and the loop starts the next one
/// at level + 1.
#[test]
fn cleared_wave_advances_to_next_level() {
    let mut game = Game::with_seed(GameConfig::default(), 99).unwrap();
    let input = InputState {
        pointer: Vec2::new(640.0, 360.0),
        screen_width: 1280.0,
        screen_height: 720.0,
        firing: false,
    };
    let mut particles = NullParticles;

    game.step(&input, &mut particles, 1.0 / 60.0).unwrap();
    assert_eq!(game.waves().level(), 1);

    // Kill the whole wave from outside.
    let composites: Vec<_> = game
        .world()
        .entities_with::<glowfield::components::DiamondSquare>();
    assert_eq!(composites.len(), 1);
    for enemy in composites {
        game.world_mut()
            .get_component_mut::<Health>(enemy)
            .unwrap()
            .current = 0.0;
    }

    game.step(&input, &mut particles, 1.0 / 60.0).unwrap();
    assert_eq!(game.waves().level(), 2);
    // Level 2 spawned two fresh composites: player + 2 * (1 + 4 children).
    assert_eq!(
        game.world()
            .entities_with::<glowfield::components::DiamondSquare>()
            .len(),
        2
    );
}

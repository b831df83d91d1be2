//! Fixed-phase frame loop
//!
//! Phase order per frame: time update, player controller, bullet firing +
//! worker submit, then the systems that do not touch bullets (movement,
//! enemy formations, camera), then the worker join, collision, damage
//! application, wave bookkeeping, and frame output assembly. The collision
//! phase never observes a partially-updated bullet pool: the pool's
//! ownership is away on the worker between submit and join.

use crate::components::{CrossedDiamond, Diamond, Health, Position, ShapeColor};
use crate::config::GameConfig;
use crate::render::{FrameOutput, ParticleSpawner, ShapeInstance};
use crate::shapes::{ShapeId, ShapeLibrary};
use crate::systems::camera::CameraController;
use crate::systems::collision::CollisionSystem;
use crate::systems::enemy::EnemyBehaviorSystem;
use crate::systems::movement::integrate_positions;
use crate::systems::player::{InputState, PlayerController};
use crate::systems::projectile::{BulletJob, BulletPool, BulletWorker, FireControl, SimError};
use crate::systems::waves::{WaveError, WaveSystem};
use thiserror::Error;
use vector_engine::ecs::{Entity, World};
use vector_engine::foundation::time::Timer;
use vector_engine::geometry::GeometryError;

/// Player stroke color
const PLAYER_COLOR: [f32; 3] = [235.0, 177.0, 52.0];

/// Fatal game errors
#[derive(Debug, Error)]
pub enum GameError {
    /// Static shape data failed to tesselate
    #[error("shape precomputation failed: {0}")]
    Geometry(#[from] GeometryError),

    /// The bullet worker died
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Wave lifecycle was violated
    #[error(transparent)]
    Wave(#[from] WaveError),
}

/// The whole simulation: world, systems, and per-frame orchestration
pub struct Game {
    world: World,
    shapes: ShapeLibrary,
    config: GameConfig,
    timer: Timer,
    pool: Option<BulletPool>,
    worker: BulletWorker,
    fire: FireControl,
    collision: CollisionSystem,
    waves: WaveSystem,
    enemy_behavior: EnemyBehaviorSystem,
    player: Entity,
    player_controller: PlayerController,
    camera: CameraController,
}

impl Game {
    /// Build the game: precompute shapes, start the bullet worker, create
    /// the player
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_seed(config, rand::random())
    }

    /// Build the game with a deterministic wave RNG seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        let shapes = ShapeLibrary::build()?;
        let mut world = World::new();
        let player = world.create_entity();
        world.add_component(player, Position::default());

        let worker = BulletWorker::spawn(config.gameplay.bullet_range);
        let player_controller = PlayerController::new(config.gameplay.player_halflife);
        let camera = CameraController::new(config.gameplay.camera_halflife);
        Ok(Self {
            world,
            shapes,
            timer: Timer::new(),
            pool: Some(BulletPool::new()),
            worker,
            fire: FireControl::new(0.0),
            collision: CollisionSystem::new(),
            waves: WaveSystem::new(seed),
            enemy_behavior: EnemyBehaviorSystem,
            player,
            player_controller,
            camera,
            config,
        })
    }

    /// Advance one frame using wall-clock timing
    pub fn update(
        &mut self,
        input: &InputState,
        particles: &mut dyn ParticleSpawner,
    ) -> Result<FrameOutput, GameError> {
        self.timer.update();
        self.run_frame(input, particles)
    }

    /// Advance one frame with an explicit timestep (deterministic stepping)
    pub fn step(
        &mut self,
        input: &InputState,
        particles: &mut dyn ParticleSpawner,
        dt: f32,
    ) -> Result<FrameOutput, GameError> {
        self.timer.advance(dt);
        self.run_frame(input, particles)
    }

    fn run_frame(
        &mut self,
        input: &InputState,
        particles: &mut dyn ParticleSpawner,
    ) -> Result<FrameOutput, GameError> {
        let dt = self.timer.delta_time();
        let now = self.timer.total_time();
        let gameplay = self.config.gameplay.clone();

        // Player tracks the aim point and faces toward it while it is off
        // the ship; bullets leave along the facing angle.
        let aim = input.aim();
        let player_pos = self.player_controller.update(aim, dt);
        let mut player_angle = 0.0;
        if let Some(position) = self.world.get_component_mut::<Position>(self.player) {
            position.pos = player_pos;
            let to_aim = aim - player_pos;
            if to_aim.norm() > 1.0 {
                position.angle = to_aim.x.atan2(to_aim.y);
            }
            player_angle = position.angle;
        }

        // Fire, then hand the pool to the worker for integrate/cull/derive.
        let mut pool = self.pool.take().ok_or(SimError::WorkerGone)?;
        self.fire.update(
            &mut pool,
            now,
            input.firing,
            player_pos,
            player_angle,
            gameplay.firing_rate,
            gameplay.projectile_speed,
        );
        self.worker.submit(BulletJob {
            pool,
            player_pos,
            dt,
        })?;

        // Systems that never touch the bullet pool run while it is away.
        integrate_positions(&mut self.world, dt);
        self.enemy_behavior.run(&mut self.world, now, dt);
        let camera = self.camera.update(player_pos, dt);

        // Join point: collision must see the fully-updated pool.
        let mut pool = self.worker.join_frame()?;
        let hits = self.collision.run(
            &self.world,
            &self.shapes,
            &mut pool,
            player_pos,
            gameplay.bullet_range,
            &self.config.collision,
            gameplay.explosion_size,
            gameplay.explosion_lifetime,
            particles,
        );
        let bullet_count = pool.len();
        self.pool = Some(pool);

        for hit in &hits {
            if let Some(health) = self.world.get_component_mut::<Health>(hit.target) {
                health.take_damage(gameplay.bullet_damage);
            }
        }

        self.waves.update(&mut self.world);
        if self.waves.is_wave_complete() {
            let next = self.waves.level() + 1;
            self.waves.create_next_wave(
                next,
                &mut self.world,
                gameplay.enemy_health,
                gameplay.wave_spawn_extent,
                now,
            )?;
        }

        Ok(self.assemble_output(camera, bullet_count))
    }

    fn assemble_output(
        &self,
        camera: vector_engine::foundation::math::Vec2,
        bullet_count: usize,
    ) -> FrameOutput {
        let mut output = FrameOutput::new();
        output.camera = camera;
        output.bullet_count = bullet_count;

        if let Some(position) = self.world.get_component::<Position>(self.player) {
            output.instances.push(ShapeInstance {
                shape: ShapeId::Player,
                frame: 0,
                position: position.pos,
                angle: position.angle,
                color: PLAYER_COLOR,
            });
        }
        for (entity, tag) in self.world.iter_components::<Diamond>() {
            self.push_instance(&mut output, entity, ShapeId::Diamond, tag.frame);
        }
        for (entity, tag) in self.world.iter_components::<CrossedDiamond>() {
            self.push_instance(&mut output, entity, ShapeId::CrossedDiamond, tag.frame);
        }
        output
    }

    fn push_instance(&self, output: &mut FrameOutput, entity: Entity, shape: ShapeId, frame: u8) {
        let Some(position) = self.world.get_component::<Position>(entity) else {
            return;
        };
        let color = self
            .world
            .get_component::<ShapeColor>(entity)
            .map_or([255.0, 255.0, 255.0], |c| c.color);
        output.instances.push(ShapeInstance {
            shape,
            frame,
            position: position.pos,
            angle: position.angle,
            color,
        });
    }

    /// The ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The precomputed shape library
    pub fn shapes(&self) -> &ShapeLibrary {
        &self.shapes
    }

    /// The wave system
    pub fn waves(&self) -> &WaveSystem {
        &self.waves
    }

    /// Live bullet count
    pub fn bullet_count(&self) -> usize {
        self.pool.as_ref().map_or(0, BulletPool::len)
    }

    /// The player entity
    pub fn player(&self) -> Entity {
        self.player
    }
}

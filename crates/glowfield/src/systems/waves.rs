//! Enemy wave lifecycle
//!
//! Waves spawn a batch of composite enemies together and clear together.
//! Each frame the dead set is recomputed from enemy health; dead composites
//! are despawned (children included) and the wave ends once every tracked
//! enemy is dead. Starting a wave while one is still running is a
//! programming error, not a recoverable condition.

use crate::components::Health;
use crate::systems::enemy::{despawn_diamond_square, spawn_diamond_square, SpawnDiamondSquare};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use thiserror::Error;
use vector_engine::ecs::{Entity, World};
use vector_engine::foundation::math::Vec2;

/// Errors from wave management
#[derive(Debug, Error)]
pub enum WaveError {
    /// `create_next_wave` was called while a wave is still running
    #[error("a wave is still active")]
    WaveActive,
}

/// A batch of enemies spawned together
struct Wave {
    enemies: Vec<Entity>,
    dead: HashSet<Entity>,
}

/// Wave state machine and spawner
pub struct WaveSystem {
    active: Option<Wave>,
    level: u32,
    rng: StdRng,
}

impl WaveSystem {
    /// Create a wave system with a seeded RNG (deterministic for tests)
    pub fn new(seed: u64) -> Self {
        Self {
            active: None,
            level: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current wave level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether a wave is currently tracked
    pub fn has_active_wave(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the current wave (if any) is finished
    pub fn is_wave_complete(&self) -> bool {
        match &self.active {
            None => true,
            Some(wave) => wave.dead.len() == wave.enemies.len(),
        }
    }

    /// Spawn the next wave: `level` composite enemies at random positions
    ///
    /// Fails while a wave is still running; that indicates a frame-ordering
    /// bug in the caller.
    pub fn create_next_wave(
        &mut self,
        level: u32,
        world: &mut World,
        enemy_health: f32,
        spawn_extent: f32,
        now: f32,
    ) -> Result<(), WaveError> {
        if !self.is_wave_complete() {
            return Err(WaveError::WaveActive);
        }
        self.level = level;
        let mut enemies = Vec::with_capacity(level as usize);
        for _ in 0..level {
            let params = SpawnDiamondSquare {
                pos: Vec2::new(
                    self.rng.gen::<f32>() * spawn_extent,
                    self.rng.gen::<f32>() * spawn_extent,
                ),
                angle: self.rng.gen::<f32>() * std::f32::consts::PI * 2.0,
                health: enemy_health,
                color: [150.0, 32.0, 110.0],
            };
            enemies.push(spawn_diamond_square(world, &params, now));
        }
        log::info!("wave {level}: spawned {} enemies", enemies.len());
        self.active = Some(Wave {
            enemies,
            dead: HashSet::new(),
        });
        Ok(())
    }

    /// Recompute the dead set and clear the wave once everything is dead
    ///
    /// Composites whose health reached zero are despawned here, together
    /// with their children; despawned entities stay in the dead set.
    pub fn update(&mut self, world: &mut World) {
        let Some(wave) = &mut self.active else {
            return;
        };

        for &enemy in &wave.enemies {
            if wave.dead.contains(&enemy) {
                continue;
            }
            let dead = match world.get_component::<Health>(enemy) {
                Some(health) => health.is_dead(),
                None => true,
            };
            if dead {
                wave.dead.insert(enemy);
                if world.contains(enemy) {
                    despawn_diamond_square(world, enemy);
                }
            }
        }

        if wave.dead.len() == wave.enemies.len() {
            log::info!("wave {} cleared", self.level);
            self.active = None;
        }
    }
}

//! Projectile simulation
//!
//! Bullets are not ECS entities: hundreds of them move every frame, so they
//! live in a dense parallel-array pool. Live bullets always occupy indices
//! `[0, len)`; removal swaps the last live bullet into the gap and shrinks
//! the range, never leaving tombstones.
//!
//! The per-frame integrate/cull/derive pass runs on a dedicated worker
//! thread. The pool moves into the job message and back out of the result,
//! so the two threads never share it; the frame loop joins on the result
//! before collision runs.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;
use thiserror::Error;
use vector_engine::foundation::math::{Point2, Vec2};
use vector_engine::geometry::Aabb;

/// Fixed bullet pool capacity
pub const MAX_BULLETS: usize = 1000;

/// Half-width of a bullet's oriented collision rectangle
pub const BULLET_THICKNESS: f32 = 1.0;

/// Trail length assigned to freshly fired bullets
const BULLET_TRAIL: f32 = 3.0;

/// Speed floor guarding the normal computation against division by zero
const MIN_BULLET_SPEED: f32 = 0.001;

/// Errors from the projectile worker
#[derive(Debug, Error)]
pub enum SimError {
    /// The worker thread is gone; its channel is closed
    #[error("bullet worker disconnected")]
    WorkerGone,
}

/// Dense pool of live bullets in parallel arrays
///
/// Layout per bullet: position (2 floats), velocity (2), unit normal (2),
/// trail length (1), derived oriented rectangle (8), derived AABB (4).
pub struct BulletPool {
    pos: Vec<f32>,
    vel: Vec<f32>,
    normal: Vec<f32>,
    trail: Vec<f32>,
    polygon: Vec<f32>,
    aabb: Vec<f32>,
    len: usize,
}

impl Default for BulletPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BulletPool {
    /// Create an empty pool at full capacity
    pub fn new() -> Self {
        Self {
            pos: vec![0.0; MAX_BULLETS * 2],
            vel: vec![0.0; MAX_BULLETS * 2],
            normal: vec![0.0; MAX_BULLETS * 2],
            trail: vec![0.0; MAX_BULLETS],
            polygon: vec![0.0; MAX_BULLETS * 8],
            aabb: vec![0.0; MAX_BULLETS * 4],
            len: 0,
        }
    }

    /// Number of live bullets
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no bullets are live
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Spawn a bullet; requests beyond capacity are silently dropped
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2) {
        if self.len == MAX_BULLETS {
            return;
        }
        let i = self.len;
        self.len += 1;
        self.pos[i * 2] = pos.x;
        self.pos[i * 2 + 1] = pos.y;
        self.vel[i * 2] = vel.x;
        self.vel[i * 2 + 1] = vel.y;
        let speed = vel.norm().max(MIN_BULLET_SPEED);
        self.normal[i * 2] = vel.y / speed;
        self.normal[i * 2 + 1] = -vel.x / speed;
        self.trail[i] = BULLET_TRAIL;
        self.derive(i);
    }

    /// Remove a bullet by swapping the last live bullet into its slot
    pub fn remove(&mut self, i: usize) {
        assert!(i < self.len, "bullet index {i} out of range {}", self.len);
        let last = self.len - 1;
        self.copy_bullet(last, i);
        self.len = last;
    }

    /// Position of bullet `i`
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.pos[i * 2], self.pos[i * 2 + 1])
    }

    /// Velocity of bullet `i`
    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vel[i * 2], self.vel[i * 2 + 1])
    }

    /// Derived bounding box of bullet `i`
    pub fn aabb(&self, i: usize) -> Aabb {
        Aabb::new(
            Point2::new(self.aabb[i * 4], self.aabb[i * 4 + 1]),
            Point2::new(self.aabb[i * 4 + 2], self.aabb[i * 4 + 3]),
        )
    }

    /// Derived oriented collision rectangle of bullet `i`
    pub fn polygon(&self, i: usize) -> [Point2; 4] {
        let p = &self.polygon[i * 8..i * 8 + 8];
        [
            Point2::new(p[0], p[1]),
            Point2::new(p[2], p[3]),
            Point2::new(p[4], p[5]),
            Point2::new(p[6], p[7]),
        ]
    }

    /// Integrate, cull, and recompute derived geometry for every bullet
    ///
    /// A bullet straying more than `range` from `player` on either axis is
    /// removed; the swapped-in replacement is processed before the index
    /// advances, so every live bullet integrates exactly once.
    pub fn step(&mut self, player: Vec2, range: f32, dt: f32) {
        let mut i = 0;
        while i < self.len {
            self.pos[i * 2] += self.vel[i * 2] * dt;
            self.pos[i * 2 + 1] += self.vel[i * 2 + 1] * dt;
            if (self.pos[i * 2] - player.x).abs() > range
                || (self.pos[i * 2 + 1] - player.y).abs() > range
            {
                let last = self.len - 1;
                self.copy_bullet(last, i);
                self.len = last;
                continue;
            }
            self.derive(i);
            i += 1;
        }
    }

    /// Recompute the oriented rectangle and AABB for bullet `i`
    fn derive(&mut self, i: usize) {
        let px = self.pos[i * 2];
        let py = self.pos[i * 2 + 1];
        let nx = self.normal[i * 2] * BULLET_THICKNESS;
        let ny = self.normal[i * 2 + 1] * BULLET_THICKNESS;
        // Travel direction recovered from the normal; the trail extends
        // behind the bullet.
        let dir_x = self.normal[i * 2 + 1] * self.trail[i];
        let dir_y = -self.normal[i * 2] * self.trail[i];

        let p = &mut self.polygon[i * 8..i * 8 + 8];
        p[0] = px + nx;
        p[1] = py + ny;
        p[2] = px - nx;
        p[3] = py - ny;
        p[4] = px - dir_x - nx;
        p[5] = py - dir_y - ny;
        p[6] = px - dir_x + nx;
        p[7] = py - dir_y + ny;

        let min_x = p[0].min(p[2]).min(p[4]).min(p[6]);
        let min_y = p[1].min(p[3]).min(p[5]).min(p[7]);
        let max_x = p[0].max(p[2]).max(p[4]).max(p[6]);
        let max_y = p[1].max(p[3]).max(p[5]).max(p[7]);
        self.aabb[i * 4] = min_x;
        self.aabb[i * 4 + 1] = min_y;
        self.aabb[i * 4 + 2] = max_x;
        self.aabb[i * 4 + 3] = max_y;
    }

    fn copy_bullet(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        self.pos.copy_within(from * 2..from * 2 + 2, to * 2);
        self.vel.copy_within(from * 2..from * 2 + 2, to * 2);
        self.normal.copy_within(from * 2..from * 2 + 2, to * 2);
        self.trail[to] = self.trail[from];
        self.polygon.copy_within(from * 8..from * 8 + 8, to * 8);
        self.aabb.copy_within(from * 4..from * 4 + 4, to * 4);
    }
}

/// Fire-rate gate for the player's weapon
pub struct FireControl {
    last_fire: f32,
}

impl FireControl {
    /// Create a fire control primed at the given game time
    pub fn new(now: f32) -> Self {
        Self { last_fire: now }
    }

    /// Spawn a bullet from the shooter when the firing interval has elapsed
    ///
    /// Velocity follows the shooter's facing angle. A full pool drops the
    /// spawn inside [`BulletPool::spawn`].
    pub fn update(
        &mut self,
        pool: &mut BulletPool,
        now: f32,
        firing: bool,
        shooter_pos: Vec2,
        shooter_angle: f32,
        firing_rate: f32,
        projectile_speed: f32,
    ) {
        if !firing {
            return;
        }
        if now - self.last_fire >= firing_rate {
            self.last_fire = now;
            let vel = Vec2::new(
                shooter_angle.sin() * projectile_speed,
                shooter_angle.cos() * projectile_speed,
            );
            pool.spawn(shooter_pos, vel);
        }
    }
}

/// One frame's worth of work for the bullet worker
pub struct BulletJob {
    /// The pool, ownership transferred for the duration of the job
    pub pool: BulletPool,
    /// Player position the cull test references
    pub player_pos: Vec2,
    /// Frame delta time in seconds
    pub dt: f32,
}

/// Dedicated worker thread for the bullet step
///
/// The frame loop submits a [`BulletJob`] after spawning, runs the systems
/// that do not touch bullets, then joins to get the pool back before the
/// collision phase.
pub struct BulletWorker {
    job_tx: Option<Sender<BulletJob>>,
    done_rx: Receiver<BulletPool>,
    handle: Option<JoinHandle<()>>,
}

impl BulletWorker {
    /// Spawn the worker thread
    pub fn spawn(range: f32) -> Self {
        let (job_tx, job_rx) = channel::<BulletJob>();
        let (done_tx, done_rx) = channel::<BulletPool>();
        let handle = std::thread::spawn(move || {
            log::info!("bullet worker started");
            while let Ok(mut job) = job_rx.recv() {
                job.pool.step(job.player_pos, range, job.dt);
                if done_tx.send(job.pool).is_err() {
                    break;
                }
            }
        });
        Self {
            job_tx: Some(job_tx),
            done_rx,
            handle: Some(handle),
        }
    }

    /// Hand the pool to the worker for this frame
    pub fn submit(&self, job: BulletJob) -> Result<(), SimError> {
        self.job_tx
            .as_ref()
            .ok_or(SimError::WorkerGone)?
            .send(job)
            .map_err(|_| SimError::WorkerGone)
    }

    /// Block until the worker returns the updated pool
    pub fn join_frame(&self) -> Result<BulletPool, SimError> {
        self.done_rx.recv().map_err(|_| SimError::WorkerGone)
    }
}

impl Drop for BulletWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spawn_and_integrate() {
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        assert_eq!(pool.len(), 1);

        pool.step(Vec2::zeros(), 700.0, 1.0);
        assert_eq!(pool.len(), 1);
        assert_relative_eq!(pool.position(0).x, 100.0);
        assert_relative_eq!(pool.position(0).y, 0.0);
    }

    #[test]
    fn test_normal_is_rotated_unit_velocity() {
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::zeros(), Vec2::new(0.0, 50.0));
        // Velocity +y gives normal +x.
        let poly = pool.polygon(0);
        assert_relative_eq!(poly[0].x, BULLET_THICKNESS, epsilon = 1e-5);
        assert_relative_eq!(poly[1].x, -BULLET_THICKNESS, epsilon = 1e-5);
    }

    #[test]
    fn test_capacity_drops_silently() {
        let mut pool = BulletPool::new();
        for _ in 0..MAX_BULLETS + 25 {
            pool.spawn(Vec2::zeros(), Vec2::new(1.0, 0.0));
        }
        assert_eq!(pool.len(), MAX_BULLETS);
    }

    #[test]
    fn test_range_cull_swaps_from_end() {
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0));
        pool.spawn(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0));
        pool.spawn(Vec2::new(2.0, 2.0), Vec2::new(0.0, 0.0));

        pool.step(Vec2::zeros(), 700.0, 1.0);
        assert_eq!(pool.len(), 2);
        // The dense range must hold the two survivors, order not preserved.
        let survivors: Vec<(f32, f32)> = (0..pool.len())
            .map(|i| (pool.position(i).x, pool.position(i).y))
            .collect();
        assert!(survivors.contains(&(1.0, 1.0)));
        assert!(survivors.contains(&(2.0, 2.0)));
    }

    #[test]
    fn test_density_invariant_under_mixed_ops() {
        let mut pool = BulletPool::new();
        for i in 0..20 {
            pool.spawn(Vec2::new(i as f32, 0.0), Vec2::new(0.0, 1.0));
        }
        pool.remove(3);
        pool.remove(0);
        pool.remove(pool.len() - 1);
        assert_eq!(pool.len(), 17);
        // Every index in [0, len) must hold a real bullet.
        for i in 0..pool.len() {
            assert!(pool.position(i).x >= 0.0 && pool.position(i).x < 20.0);
        }
    }

    #[test]
    fn test_aabb_contains_polygon() {
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::new(5.0, -3.0), Vec2::new(30.0, 40.0));
        pool.step(Vec2::zeros(), 700.0, 0.1);
        let aabb = pool.aabb(0);
        for corner in pool.polygon(0) {
            assert!(corner.x >= aabb.min.x && corner.x <= aabb.max.x);
            assert!(corner.y >= aabb.min.y && corner.y <= aabb.max.y);
        }
    }

    #[test]
    fn test_fire_control_rate_limits() {
        let mut pool = BulletPool::new();
        let mut fire = FireControl::new(0.0);
        let rate = 0.3;
        for frame in 0..10 {
            let now = frame as f32 * 0.1;
            fire.update(&mut pool, now, true, Vec2::zeros(), 0.0, rate, 100.0);
        }
        // 0.9 seconds at 0.3s per shot: shots at t=0.3, 0.6, 0.9.
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_fire_direction_follows_angle() {
        let mut pool = BulletPool::new();
        let mut fire = FireControl::new(0.0);
        fire.update(
            &mut pool,
            1.0,
            true,
            Vec2::zeros(),
            std::f32::consts::FRAC_PI_2,
            0.3,
            100.0,
        );
        assert_eq!(pool.len(), 1);
        assert_relative_eq!(pool.velocity(0).x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(pool.velocity(0).y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_worker_round_trip() {
        let worker = BulletWorker::spawn(700.0);
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::zeros(), Vec2::new(10.0, 0.0));
        worker
            .submit(BulletJob {
                pool,
                player_pos: Vec2::zeros(),
                dt: 0.5,
            })
            .unwrap();
        let pool = worker.join_frame().unwrap();
        assert_eq!(pool.len(), 1);
        assert_relative_eq!(pool.position(0).x, 5.0);
    }
}

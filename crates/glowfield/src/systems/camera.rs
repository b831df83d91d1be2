//! Camera controller
//!
//! The camera springs toward the player with a long half-life, trailing
//! fast motion instead of locking to it.

use vector_engine::foundation::math::Vec2;
use vector_engine::foundation::spring::{critical_spring_2d, damping_coefficient};

/// Spring-tracked camera position
pub struct CameraController {
    coefficient: f32,
    pos: Vec2,
    vel: Vec2,
}

impl CameraController {
    /// Create a camera with the given spring half-life
    pub fn new(halflife: f32) -> Self {
        Self {
            coefficient: damping_coefficient(halflife),
            pos: Vec2::zeros(),
            vel: Vec2::zeros(),
        }
    }

    /// Advance toward the target and return the new camera position
    pub fn update(&mut self, target: Vec2, dt: f32) -> Vec2 {
        critical_spring_2d(&mut self.pos, &mut self.vel, target, self.coefficient, dt);
        self.pos
    }

    /// Current camera position
    pub fn position(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_trails_then_converges() {
        let mut camera = CameraController::new(2.0);
        let target = Vec2::new(50.0, 50.0);

        camera.update(target, 1.0 / 60.0);
        let early = camera.position();
        // A long half-life means the camera lags well behind at first.
        assert!(early.norm() < target.norm() * 0.1);

        for _ in 0..2000 {
            camera.update(target, 1.0 / 60.0);
        }
        assert!((camera.position() - target).norm() < 1.0);
    }
}

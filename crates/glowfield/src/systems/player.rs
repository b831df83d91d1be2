//! Player controller
//!
//! The player ship springs toward the externally-updated aim point. Input
//! arrives as raw pointer coordinates plus screen dimensions; the mapping
//! to world view units lives here so the host only forwards events.

use vector_engine::foundation::math::Vec2;
use vector_engine::foundation::spring::{critical_spring_2d, damping_coefficient};

/// Half-extent of the visible world along the x axis, in world units
pub const MAX_VIEW: f32 = 500.0;

/// Continuously-updated input snapshot from the host
#[derive(Debug, Clone, Copy)]
pub struct InputState {
    /// Pointer position in screen pixels, origin top-left
    pub pointer: Vec2,
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Whether the weapon is firing
    pub firing: bool,
}

impl InputState {
    /// Pointer position mapped to world view units, origin at screen center
    /// with y up
    pub fn aim(&self) -> Vec2 {
        let half_width = self.screen_width / 2.0;
        let half_height = self.screen_height / 2.0;
        let x = (self.pointer.x - half_width) * MAX_VIEW / half_width;
        let y = (half_height - self.pointer.y) * (self.screen_height / self.screen_width)
            * MAX_VIEW
            / half_height;
        Vec2::new(x, y)
    }
}

/// Spring-tracked player position
pub struct PlayerController {
    coefficient: f32,
    pos: Vec2,
    vel: Vec2,
}

impl PlayerController {
    /// Create a controller with the given spring half-life
    pub fn new(halflife: f32) -> Self {
        Self {
            coefficient: damping_coefficient(halflife),
            pos: Vec2::zeros(),
            vel: Vec2::zeros(),
        }
    }

    /// Advance toward the aim point and return the new position
    pub fn update(&mut self, aim: Vec2, dt: f32) -> Vec2 {
        critical_spring_2d(&mut self.pos, &mut self.vel, aim, self.coefficient, dt);
        self.pos
    }

    /// Current player position
    pub fn position(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aim_mapping_center_is_origin() {
        let input = InputState {
            pointer: Vec2::new(400.0, 300.0),
            screen_width: 800.0,
            screen_height: 600.0,
            firing: false,
        };
        let aim = input.aim();
        assert_relative_eq!(aim.x, 0.0);
        assert_relative_eq!(aim.y, 0.0);
    }

    #[test]
    fn test_aim_mapping_edges() {
        let input = InputState {
            pointer: Vec2::new(800.0, 0.0),
            screen_width: 800.0,
            screen_height: 600.0,
            firing: false,
        };
        let aim = input.aim();
        // Right edge maps to +MAX_VIEW; top edge scales by aspect ratio.
        assert_relative_eq!(aim.x, MAX_VIEW);
        assert_relative_eq!(aim.y, MAX_VIEW * 600.0 / 800.0);
    }

    #[test]
    fn test_player_converges_to_aim() {
        let mut controller = PlayerController::new(0.1);
        let aim = Vec2::new(120.0, -80.0);
        for _ in 0..300 {
            controller.update(aim, 1.0 / 60.0);
        }
        let pos = controller.position();
        assert!((pos - aim).norm() < 1.0);
    }
}

//! Game-specific components

use vector_engine::ecs::{Component, Entity};
use vector_engine::foundation::math::Vec2;

/// Kinematic state for anything that lives in the arena
#[derive(Debug, Clone)]
pub struct Position {
    /// World position
    pub pos: Vec2,

    /// Linear velocity in units per second
    pub vel: Vec2,

    /// Linear acceleration, cleared after each integration step
    pub acc: Vec2,

    /// Facing angle in radians
    pub angle: f32,

    /// Angular velocity in radians per second
    pub angular_vel: f32,
}

impl Component for Position {}

impl Default for Position {
    fn default() -> Self {
        Self {
            pos: Vec2::zeros(),
            vel: Vec2::zeros(),
            acc: Vec2::zeros(),
            angle: 0.0,
            angular_vel: 0.0,
        }
    }
}

impl Position {
    /// Create a position component at a world point
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }
}

/// Health component
#[derive(Debug, Clone)]
pub struct Health {
    /// Current health; the entity is eligible for removal at or below zero
    pub current: f32,
}

impl Component for Health {}

impl Health {
    /// Create a new health component
    pub fn new(current: f32) -> Self {
        Self { current }
    }

    /// Take damage
    pub fn take_damage(&mut self, damage: f32) {
        self.current -= damage;
    }

    /// Check if dead
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Diamond shape tag
#[derive(Debug, Clone, Copy, Default)]
pub struct Diamond {
    /// Animation frame index
    pub frame: u8,
}

impl Component for Diamond {}

/// Crossed-diamond shape tag
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossedDiamond {
    /// Animation frame index
    pub frame: u8,
}

impl Component for CrossedDiamond {}

/// Link from a child shape entity to its owning composite
#[derive(Debug, Clone, Copy)]
pub struct Parent {
    /// Owning composite entity
    pub parent: Entity,
}

impl Component for Parent {}

/// Composite enemy: a body made of four child shape entities in formation
///
/// `shapes` is the sole ownership record; despawning the composite must
/// despawn all four children.
#[derive(Debug, Clone, Copy)]
pub struct DiamondSquare {
    /// The four owned child shape entities
    pub shapes: [Entity; 4],

    /// Elapsed game time when the composite spawned, in seconds
    pub spawn_time: f32,
}

impl Component for DiamondSquare {}

/// Stroke color for a shape entity, linear RGB
#[derive(Debug, Clone, Copy)]
pub struct ShapeColor {
    /// RGB color in 0..=255 per channel
    pub color: [f32; 3],
}

impl Component for ShapeColor {}

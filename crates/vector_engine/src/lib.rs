//! # Vector Engine
//!
//! Simulation engine for 2D vector-style arcade games.
//!
//! ## Features
//!
//! - **Stroke Tesselation**: feathered triangle geometry plus convex
//!   collision polygons from polyline/polygon outlines
//! - **Spatial Partitioning**: quadtree broad-phase over axis-aligned boxes
//! - **Narrow Phase**: exact SAT convex-polygon overlap test
//! - **ECS**: minimal typed world over a generational entity arena
//! - **Springs**: critically-damped tracking for cameras and controllers
//!
//! Rendering is out of scope: the engine produces vertex/index buffers and
//! per-frame instance data for an external renderer to consume.
//!
//! ## Quick Start
//!
//! ```rust
//! use vector_engine::prelude::*;
//!
//! let mut world = World::new();
//! let entity = world.create_entity();
//! assert!(world.contains(entity));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod geometry;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Component, Entity, World},
        foundation::{
            math::{Point2, Vec2},
            spring::{critical_spring, critical_spring_2d, damping_coefficient},
            time::Timer,
        },
        geometry::{
            aabb::Aabb,
            decompose::decompose_polygon,
            tesselate::{tesselate_outlines, LineGeometry, LineVertex, Outline},
            GeometryError,
        },
        physics::sat::polygons_collide,
        spatial::{QuadTree, QuadTreeConfig},
    };
}

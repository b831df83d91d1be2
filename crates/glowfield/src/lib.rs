//! Glowfield: a neon vector arcade shooter simulation core
//!
//! Built on `vector_engine`: shapes are stroked outlines tesselated once at
//! startup, enemies are composite formations of child shape entities, and
//! bullets live in a dense pool stepped on a worker thread. Rendering and
//! particle effects are external collaborators fed plain data.

pub mod components;
pub mod config;
pub mod game;
pub mod render;
pub mod shapes;
pub mod systems;

pub use config::GameConfig;
pub use game::{Game, GameError};
pub use render::{FrameOutput, NullParticles, ParticleSpawner, ShapeInstance};
pub use systems::player::InputState;

//! Entity-Component-System implementation
//!
//! A minimal typed world: entities are generational arena keys, components
//! live in per-type dense columns addressed by entity id.

pub mod world;

pub use world::{Component, Entity, World};

//! Narrow-phase collision testing

pub mod sat;

pub use sat::polygons_collide;

//! Spatial partitioning structures for broad-phase queries

pub mod quadtree;

pub use quadtree::{QuadTree, QuadTreeConfig};

//! Dungeon Engine — procedural dungeon generation for games.
//!
//! Generates connected room layouts at runtime from a stochastic L-system,
//! narrates every room with theme- and story-aware text, and draws the
//! result as an SVG map, using a pipeline of grammar rewriting, turtle
//! interpretation, and stateful narration.

pub mod core;
pub mod schema;

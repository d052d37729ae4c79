//! Scene queries for locomotion: rays and the walkable floor.

pub mod raycast;

pub use raycast::*;

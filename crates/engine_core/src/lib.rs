//! Core types shared by every crate in the Dimensia workspace.
//!
//! This crate provides the foundational types used across the frame loop:
//! - Transform and spatial helpers
//! - Frame time management
//! - Common component types for the hand-visual ECS world

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};

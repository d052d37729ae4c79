//! CPU particle simulation for the Dimensia scene.
//!
//! - [`ParticleField`]: fixed-size pool of ballistic, recycling point particles
//! - [`WaveField`]: flat point grid displaced by a radial sine wave
//! - [`SpriteTexture`]: soft round sprite for drawing the points
//!
//! Each simulation writes a flat `[x, y, z, x, y, z, ...]` buffer that an
//! external renderer uploads whenever the buffer reports itself dirty.

pub mod buffer;
pub mod config;
pub mod error;
pub mod field;
pub mod sprite;
pub mod wave;

pub use buffer::*;
pub use config::*;
pub use error::*;
pub use field::*;
pub use sprite::*;
pub use wave::*;

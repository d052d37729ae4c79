//! Particle simulation settings. Plain serde structs, immutable once a
//! simulation has been built from them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ParticleFieldError, Result};

/// Rendering hints for point sprites. Not part of the simulated state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Tint as `0xRRGGBB`.
    pub color: u32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            min_size: 0.05,
            max_size: 0.2,
        }
    }
}

impl PointStyle {
    /// Color as linear `[r, g, b]` in `0..=1`.
    pub fn rgb(&self) -> [f32; 3] {
        [
            ((self.color >> 16) & 0xff) as f32 / 255.0,
            ((self.color >> 8) & 0xff) as f32 / 255.0,
            (self.color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Settings for a [`crate::ParticleField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldConfig {
    /// Number of particles in the pool.
    pub count: usize,
    /// Full width of the spawn box per axis, centred on the origin.
    pub position_spread: Vec3,
    /// Mean spawn velocity.
    pub velocity: Vec3,
    /// Full width of the uniform jitter added to `velocity` per axis.
    pub velocity_spread: Vec3,
    /// Shortest lifetime in seconds.
    pub min_age: f32,
    /// Longest lifetime in seconds.
    pub max_age: f32,
    pub style: PointStyle,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: 50,
            position_spread: Vec3::splat(20.0),
            velocity: Vec3::new(0.0, -0.1, 0.0),
            velocity_spread: Vec3::splat(0.1),
            min_age: 5.0,
            max_age: 10.0,
            style: PointStyle::default(),
        }
    }
}

impl ParticleFieldConfig {
    /// Check the constraints the simulation relies on.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("position_spread", self.position_spread),
            ("velocity", self.velocity),
            ("velocity_spread", self.velocity_spread),
        ] {
            if !v.is_finite() {
                return Err(ParticleFieldError::InvalidConfiguration(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        for (name, age) in [("min_age", self.min_age), ("max_age", self.max_age)] {
            if !age.is_finite() || age < 0.0 {
                return Err(ParticleFieldError::InvalidConfiguration(format!(
                    "{name} must be a finite, non-negative number of seconds, got {age}"
                )));
            }
        }
        if self.min_age > self.max_age {
            return Err(ParticleFieldError::InvalidConfiguration(format!(
                "min_age ({}) is greater than max_age ({})",
                self.min_age, self.max_age
            )));
        }
        Ok(())
    }
}

/// Settings for a [`crate::WaveField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveFieldConfig {
    /// Number of points scattered on the XZ plane.
    pub count: usize,
    /// Full width of the square the points are scattered in.
    pub spread: f32,
    /// Peak height of the wave.
    pub amplitude: f32,
    /// Radial frequency (radians per metre from the centre).
    pub frequency: f32,
    /// How fast the wave travels outwards (phase per second).
    pub speed: f32,
    pub particle_size: f32,
    /// Tint as `0xRRGGBB`.
    pub color: u32,
}

impl Default for WaveFieldConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            spread: 100.0,
            amplitude: 0.3,
            frequency: 2.0,
            speed: 0.2,
            particle_size: 0.02,
            color: 0xffffff,
        }
    }
}

impl WaveFieldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(ParticleFieldError::InvalidConfiguration(format!(
                "wave spread must be finite and non-negative, got {}",
                self.spread
            )));
        }
        for (name, value) in [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("speed", self.speed),
        ] {
            if !value.is_finite() {
                return Err(ParticleFieldError::InvalidConfiguration(format!(
                    "wave {name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

//! Ambient particle field: a fixed pool of points drifting ballistically and
//! respawning inside a box when their lifetime runs out.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PositionBuffer;
use crate::config::ParticleFieldConfig;
use crate::error::Result;

/// A single simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Drawn at spawn, constant for the whole life of the particle.
    pub velocity: Vec3,
    /// Seconds since the last (re)spawn.
    pub age: f32,
    /// Lifetime threshold drawn at spawn.
    pub max_age: f32,
}

/// Fixed-size particle pool plus the position buffer a renderer draws from.
///
/// The pool size never changes after [`ParticleField::initialize`]. Changing
/// any setting means disposing the field and building a new one.
#[derive(Debug)]
pub struct ParticleField {
    config: ParticleFieldConfig,
    /// `config.position_spread` by magnitude.
    spawn_extent: Vec3,
    particles: Vec<Particle>,
    buffer: PositionBuffer,
    rng: StdRng,
    disposed: bool,
}

impl ParticleField {
    /// Build a pool seeded from OS entropy.
    pub fn initialize(config: ParticleFieldConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build a pool whose spawns and respawns are reproducible for `seed`.
    pub fn initialize_seeded(config: ParticleFieldConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleFieldConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;

        let spawn_extent = config.position_spread.abs();
        let velocity_jitter = config.velocity_spread.abs();
        let lifetime_range = config.max_age - config.min_age;

        let mut buffer = PositionBuffer::with_points(config.count);
        let particles: Vec<Particle> = (0..config.count)
            .map(|i| {
                let position = sample_centered(&mut rng, spawn_extent);
                let velocity = config.velocity + sample_centered(&mut rng, velocity_jitter);
                let max_age = config.min_age + rng.gen::<f32>() * lifetime_range;
                buffer.write(i, position);
                Particle {
                    position,
                    velocity,
                    age: 0.0,
                    max_age,
                }
            })
            .collect();

        log::info!(
            "Particle field created: {} particles, spread {}, lifetime {}..{}s",
            particles.len(),
            spawn_extent,
            config.min_age,
            config.max_age
        );

        Ok(Self {
            config,
            spawn_extent,
            particles,
            buffer,
            rng,
            disposed: false,
        })
    }

    /// Step every particle forward by `dt` seconds.
    ///
    /// Each particle ages; one that reaches its lifetime is respawned at a new
    /// random point in the spawn box with its age zeroed, and is then moved by
    /// one step of its (unchanged) velocity. Large steps are integrated in one
    /// go, there is no sub-stepping. Does nothing once disposed.
    pub fn advance(&mut self, dt: f32) {
        if self.disposed {
            return;
        }
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ignoring invalid particle time step {dt}, using 0");
            0.0
        };

        let mut respawned = 0usize;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            particle.age += dt;
            if particle.age >= particle.max_age {
                particle.age = 0.0;
                particle.position = sample_centered(&mut self.rng, self.spawn_extent);
                respawned += 1;
            }
            particle.position += particle.velocity * dt;
            self.buffer.write(i, particle.position);
        }
        self.buffer.mark_dirty();

        log::trace!("Particle field advanced by {dt:.4}s, {respawned} respawned");
    }

    /// Release the particles and the position buffer. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.particles = Vec::new();
        self.buffer.release();
        self.disposed = true;
        log::info!("Particle field disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &ParticleFieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Flat `xyz` positions, particle index order.
    pub fn positions(&self) -> &[f32] {
        self.buffer.as_slice()
    }

    /// Positions as raw bytes for a vertex buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Whether positions changed since the renderer last asked. Clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        self.buffer.take_dirty()
    }

    /// True when `point` lies inside the (closed) spawn box.
    pub fn in_spawn_volume(&self, point: Vec3) -> bool {
        let half = self.spawn_extent * 0.5;
        point.abs().cmple(half).all()
    }
}

/// Uniform sample in `[-extent/2, extent/2)` per axis.
fn sample_centered(rng: &mut StdRng, extent: Vec3) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent.x,
        (rng.gen::<f32>() - 0.5) * extent.y,
        (rng.gen::<f32>() - 0.5) * extent.z,
    )
}

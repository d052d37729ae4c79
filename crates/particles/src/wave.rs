//! Radial wave field: points scattered on the ground plane bobbing on a sine
//! wave that travels outwards from the origin.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PositionBuffer;
use crate::config::WaveFieldConfig;
use crate::error::Result;

#[derive(Debug)]
pub struct WaveField {
    config: WaveFieldConfig,
    /// XZ placement of each point and its distance from the origin.
    anchors: Vec<(f32, f32, f32)>,
    buffer: PositionBuffer,
}

impl WaveField {
    pub fn new(config: WaveFieldConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);

        let mut buffer = PositionBuffer::with_points(config.count);
        let anchors = (0..config.count)
            .map(|i| {
                let x = (rng.gen::<f32>() - 0.5) * config.spread;
                let z = (rng.gen::<f32>() - 0.5) * config.spread;
                buffer.write(i, Vec3::new(x, 0.0, z));
                (x, z, (x * x + z * z).sqrt())
            })
            .collect();

        log::info!("Wave field created: {} points over {}m", config.count, config.spread);
        Ok(Self {
            config,
            anchors,
            buffer,
        })
    }

    /// Height of the wave at `distance` from the centre, `elapsed` seconds in.
    pub fn height_at(&self, distance: f32, elapsed: f32) -> f32 {
        let t = elapsed * self.config.speed;
        self.config.amplitude * (distance * self.config.frequency - t).sin()
    }

    /// Recompute every point's height for the given scene time.
    pub fn update(&mut self, elapsed_seconds: f32) {
        for (i, &(x, z, distance)) in self.anchors.iter().enumerate() {
            let y = self.height_at(distance, elapsed_seconds);
            self.buffer.write(i, Vec3::new(x, y, z));
        }
        self.buffer.mark_dirty();
    }

    pub fn config(&self) -> &WaveFieldConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        self.buffer.as_slice()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.buffer.read(index)
    }

    pub fn take_dirty(&mut self) -> bool {
        self.buffer.take_dirty()
    }
}

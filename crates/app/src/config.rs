//! App configuration (particles, camera, teleport, session). Loaded from config.ron at startup.

use glam::Vec3;
use particles::{ParticleFieldConfig, PointStyle, WaveFieldConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Desktop look and movement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Where the camera rig starts (eye height in Y).
    pub start_position: Vec3,
    /// Distance per frame at 60 fps while walking.
    pub move_speed: f32,
    /// Speed multiplier while Shift is held.
    pub sprint_multiplier: f32,
    /// Horizontal look range multiplier (1.0 = cursor edge turns half a revolution).
    pub sensitivity_x: f32,
    /// Vertical look range multiplier.
    pub sensitivity_y: f32,
    /// Fraction of the remaining look angle covered each frame.
    pub smoothing: f32,
    /// Pitch stays this far (radians) from straight up / down.
    pub pitch_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.6, 20.0),
            move_speed: 0.5,
            sprint_multiplier: 2.0,
            sensitivity_x: 1.5,
            sensitivity_y: 1.0,
            smoothing: 0.1,
            pitch_margin: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Fingertip distance (metres) that counts as a pinch.
    pub pinch_threshold: f32,
    /// Edge length of the walkable floor square.
    pub floor_size: f32,
    pub floor_height: f32,
    /// Lift of the marker ring above the floor, to avoid z-fighting.
    pub marker_height: f32,
    /// Longest aim ray.
    pub max_distance: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: input::DEFAULT_PINCH_THRESHOLD,
            floor_size: 300.0,
            floor_height: 0.0,
            marker_height: 0.01,
            max_distance: 1000.0,
        }
    }
}

/// Scripted headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames to run before exiting.
    pub frames: u64,
    /// Fixed frame time in seconds; `None` uses the wall clock.
    pub fixed_dt: Option<f32>,
    /// Frame at which an immersive session starts.
    pub enter_vr_at_frame: Option<u64>,
    /// Frame at which the immersive session ends.
    pub exit_vr_at_frame: Option<u64>,
    /// Seed for particle spawns; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fixed_dt: Some(1.0 / 60.0),
            enter_vr_at_frame: Some(200),
            exit_vr_at_frame: Some(400),
            seed: None,
        }
    }
}

/// Persistent app settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Particle field shown on desktop.
    pub particles: ParticleFieldConfig,
    /// Particle field used inside an immersive session; falls back to `particles`.
    pub vr_particles: Option<ParticleFieldConfig>,
    /// Optional radial wave of points on the floor.
    pub wave: Option<WaveFieldConfig>,
    pub camera: CameraConfig,
    pub teleport: TeleportConfig,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            particles: desktop_particles(),
            vr_particles: None,
            wave: None,
            camera: CameraConfig::default(),
            teleport: TeleportConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Light blue snow drifting down through a 100 m cube.
fn desktop_particles() -> ParticleFieldConfig {
    ParticleFieldConfig {
        count: 100_000,
        position_spread: Vec3::splat(100.0),
        velocity: Vec3::new(0.0, -0.5, 0.0),
        max_age: 8.0,
        style: PointStyle {
            color: 0x87cefa,
            max_size: 0.05,
            ..Default::default()
        },
        ..Default::default()
    }
}

impl AppConfig {
    /// Load config from `config.ron` in the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create(&config_path())
    }

    /// Load config from `path`. A missing file is created with the defaults;
    /// an unreadable or invalid one is an error.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, writing defaults", path);
                let config = Self::default();
                config.save_to(path);
                Ok(config)
            }
            result => result,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Save current config to `path`. Logs on error.
    pub fn save_to(&self, path: &Path) {
        match self.to_ron_string() {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Particle settings for an immersive session.
    pub fn vr_particles(&self) -> &ParticleFieldConfig {
        self.vr_particles.as_ref().unwrap_or(&self.particles)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

//! Application state: which mode we are in and everything a frame touches.

use anyhow::{Context, Result};
use input::{HandJoint, Handedness, InputState, XrInput};
use particles::{ParticleField, ParticleFieldConfig, WaveField};
use physics::Ray;

use crate::camera::CameraRig;
use crate::config::AppConfig;
use crate::hands::HandVisuals;
use crate::teleport::{Teleport, TeleportSource};

/// Desktop (keyboard + mouse) or inside an immersive XR session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Desktop,
    ImmersiveVr,
}

pub struct AppContext {
    config: AppConfig,
    mode: AppMode,
    particles: ParticleField,
    wave: Option<WaveField>,
    rig: CameraRig,
    teleport: Teleport,
    hands: HandVisuals,
    /// Seconds of simulated time since start.
    elapsed: f32,
    /// Number of particle fields built so far; offsets the session seed.
    generation: u64,
}

impl AppContext {
    /// Build the desktop scene from `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let particles = build_field(config.particles.clone(), config.session.seed, 0)
            .context("Failed to create desktop particle field")?;

        let wave = match config.wave.clone() {
            Some(wave_config) => {
                let seed = config.session.seed.unwrap_or_else(rand::random);
                Some(WaveField::new(wave_config, seed).context("Failed to create wave field")?)
            }
            None => None,
        };

        let rig = CameraRig::new(config.camera.clone());
        let teleport = Teleport::new(&config.teleport);

        log::info!("Scene ready in desktop mode");

        Ok(Self {
            config,
            mode: AppMode::Desktop,
            particles,
            wave,
            rig,
            teleport,
            hands: HandVisuals::new(),
            elapsed: 0.0,
            generation: 1,
        })
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleField {
        &mut self.particles
    }

    pub fn wave(&self) -> Option<&WaveField> {
        self.wave.as_ref()
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn teleport(&self) -> &Teleport {
        &self.teleport
    }

    pub fn hands(&self) -> &HandVisuals {
        &self.hands
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Start an immersive session: swap in the VR particle field.
    pub fn enter_vr(&mut self) -> Result<()> {
        if self.mode == AppMode::ImmersiveVr {
            log::info!("Already in VR, ignoring enter request");
            return Ok(());
        }
        let config = self.config.vr_particles().clone();
        self.swap_particles(config).context("Failed to create VR particle field")?;
        self.teleport.reset();
        self.mode = AppMode::ImmersiveVr;
        log::info!("Entered VR ({} particles)", self.particles.len());
        Ok(())
    }

    /// Leave the immersive session: back to the desktop field, hands hidden.
    pub fn exit_vr(&mut self) -> Result<()> {
        if self.mode == AppMode::Desktop {
            log::info!("Already on desktop, ignoring exit request");
            return Ok(());
        }
        let config = self.config.particles.clone();
        self.swap_particles(config).context("Failed to create desktop particle field")?;
        self.teleport.reset();
        self.hands.hide_all();
        self.mode = AppMode::Desktop;
        log::info!("Exited VR ({} particles)", self.particles.len());
        Ok(())
    }

    /// Build the replacement first so a bad config leaves the current field running.
    fn swap_particles(&mut self, config: ParticleFieldConfig) -> Result<()> {
        let next = build_field(config, self.config.session.seed, self.generation)?;
        self.generation += 1;
        let mut previous = std::mem::replace(&mut self.particles, next);
        previous.dispose();
        Ok(())
    }

    /// Run one frame: mode-specific interaction, then the point fields.
    /// A negative or non-finite `dt` is treated as 0 for the whole frame.
    pub fn frame(&mut self, input: &InputState, xr: &XrInput, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ignoring invalid frame time step {dt}, using 0");
            0.0
        };

        match self.mode {
            AppMode::Desktop => self.rig.update_desktop(input, dt),
            AppMode::ImmersiveVr => self.update_xr(xr),
        }

        self.elapsed += dt;
        self.particles.advance(dt);
        if let Some(wave) = &mut self.wave {
            wave.update(self.elapsed);
        }
    }

    fn update_xr(&mut self, xr: &XrInput) {
        for hand in Handedness::BOTH {
            let controller = xr.controller(hand);
            let ray = Ray::from_transform(&self.rig.to_world(&controller.transform));
            self.teleport.update_source(
                TeleportSource::Controller(hand),
                controller.squeezing,
                Some(ray),
                &mut self.rig,
            );
        }

        let threshold = self.config.teleport.pinch_threshold;
        for hand in Handedness::BOTH {
            let pose = xr.hand(hand);
            let pinching = pose.is_some_and(|p| p.is_pinching(threshold));
            let ray = pose
                .and_then(|p| p.joint(HandJoint::IndexMetacarpal))
                .map(|joint| Ray::from_transform(&self.rig.to_world(joint)));
            self.teleport
                .update_source(TeleportSource::Hand(hand), pinching, ray, &mut self.rig);
        }

        // Hands are drawn after any teleport so they land with the rig.
        for hand in Handedness::BOTH {
            self.hands.update(hand, xr.hand(hand), &self.rig);
        }
    }
}

fn build_field(config: ParticleFieldConfig, seed: Option<u64>, generation: u64) -> Result<ParticleField> {
    let field = match seed {
        Some(seed) => ParticleField::initialize_seeded(config, seed.wrapping_add(generation))?,
        None => ParticleField::initialize(config)?,
    };
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Transform, Vec3};
    use input::{ElementState, HandPose, Key};
    use particles::WaveFieldConfig;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.particles.count = 64;
        config.vr_particles = Some(ParticleFieldConfig {
            count: 16,
            ..Default::default()
        });
        config.camera.start_position = Vec3::new(0.0, 1.6, 0.0);
        config.session.seed = Some(7);
        config
    }

    /// Right hand with the index knuckle pointing down and forward at the
    /// floor, pinching or not.
    fn aiming_hand(pinching: bool) -> HandPose {
        let mut pose = HandPose::new();
        let mut knuckle = Transform::from_position(Vec3::new(0.0, -0.6, -0.3));
        knuckle.look_to(Vec3::new(0.0, -1.0, -1.0), Vec3::Y);
        pose.set_joint(HandJoint::IndexMetacarpal, knuckle);
        pose.set_joint(HandJoint::Wrist, Transform::from_position(Vec3::new(0.0, -0.6, -0.25)));
        let gap = if pinching { 0.01 } else { 0.05 };
        pose.set_joint(HandJoint::IndexTip, Transform::from_position(Vec3::new(0.0, -0.6, -0.4)));
        pose.set_joint(HandJoint::ThumbTip, Transform::from_position(Vec3::new(gap, -0.6, -0.4)));
        pose
    }

    #[test]
    fn starts_on_desktop_with_desktop_pool() {
        let ctx = AppContext::new(small_config()).unwrap();
        assert_eq!(ctx.mode(), AppMode::Desktop);
        assert_eq!(ctx.particles().len(), 64);
        assert!(ctx.wave().is_none());
    }

    #[test]
    fn mode_transitions_swap_pools() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        ctx.enter_vr().unwrap();
        assert_eq!(ctx.mode(), AppMode::ImmersiveVr);
        assert_eq!(ctx.particles().len(), 16);

        ctx.exit_vr().unwrap();
        assert_eq!(ctx.mode(), AppMode::Desktop);
        assert_eq!(ctx.particles().len(), 64);
        assert!(!ctx.particles().is_disposed());
    }

    #[test]
    fn re_entering_current_mode_keeps_pool() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        ctx.enter_vr().unwrap();
        ctx.frame(&InputState::new(), &XrInput::default(), 0.25);
        let before = ctx.particles().particles().to_vec();
        ctx.enter_vr().unwrap();
        assert_eq!(ctx.particles().particles(), before.as_slice());

        ctx.exit_vr().unwrap();
        ctx.exit_vr().unwrap();
        assert_eq!(ctx.mode(), AppMode::Desktop);
    }

    #[test]
    fn invalid_vr_config_is_reported() {
        let mut config = small_config();
        config.vr_particles = Some(ParticleFieldConfig {
            min_age: 10.0,
            max_age: 1.0,
            ..Default::default()
        });
        let mut ctx = AppContext::new(config).unwrap();
        assert!(ctx.enter_vr().is_err());

        // The desktop field keeps running.
        assert_eq!(ctx.mode(), AppMode::Desktop);
        assert!(!ctx.particles().is_disposed());
        assert_eq!(ctx.particles().len(), 64);
        let before = ctx.particles().particles()[0].age;
        ctx.frame(&InputState::new(), &XrInput::default(), 0.5);
        assert!((ctx.particles().particles()[0].age - before - 0.5).abs() < 1e-6);
    }

    #[test]
    fn invalid_time_step_leaves_rig_intact() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        let mut input = InputState::new();
        input.process_keyboard(Key::W, ElementState::Pressed);

        ctx.frame(&input, &XrInput::default(), f32::NAN);
        assert_eq!(ctx.rig().position(), Vec3::new(0.0, 1.6, 0.0));
        ctx.frame(&input, &XrInput::default(), -1.0);
        assert_eq!(ctx.elapsed(), 0.0);

        ctx.frame(&input, &XrInput::default(), 1.0 / 60.0);
        assert!(ctx.rig().position().is_finite());
        assert!(ctx.rig().position().abs_diff_eq(Vec3::new(0.0, 1.6, -0.5), 1e-5));
    }

    #[test]
    fn desktop_frame_walks_and_advances_particles() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        let mut input = InputState::new();
        input.process_keyboard(Key::W, ElementState::Pressed);
        let before = ctx.particles().particles()[0];
        ctx.frame(&input, &XrInput::default(), 1.0 / 60.0);

        assert!(ctx.rig().position().z < 0.0);
        let after = ctx.particles().particles()[0];
        assert!((after.age - before.age - 1.0 / 60.0).abs() < 1e-6);
        assert!(ctx.particles().is_dirty());
    }

    #[test]
    fn vr_frame_ignores_keyboard() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        ctx.enter_vr().unwrap();
        let mut input = InputState::new();
        input.process_keyboard(Key::W, ElementState::Pressed);
        ctx.frame(&input, &XrInput::default(), 1.0 / 60.0);
        assert_eq!(ctx.rig().position(), Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn pinch_release_teleports_rig() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        ctx.enter_vr().unwrap();

        let mut xr = XrInput::default();
        xr.hands[Handedness::Right.index()] = Some(aiming_hand(true));
        ctx.frame(&InputState::new(), &xr, 1.0 / 60.0);
        let marker = *ctx.teleport().marker();
        assert!(marker.visible);
        // Knuckle sits 1.0 m above the floor and aims 45 degrees down.
        assert!(marker.position.abs_diff_eq(Vec3::new(0.0, 0.01, -1.3), 1e-4));
        assert!(ctx.hands().joint_transform(Handedness::Right, HandJoint::Wrist).is_some());

        xr.hands[Handedness::Right.index()] = Some(aiming_hand(false));
        ctx.frame(&InputState::new(), &xr, 1.0 / 60.0);
        assert!(ctx.rig().position().abs_diff_eq(Vec3::new(0.0, 1.6, -1.3), 1e-4));
        assert!(!ctx.teleport().marker().visible);

        // Joints are redrawn relative to the moved rig.
        let wrist = ctx.hands().joint_transform(Handedness::Right, HandJoint::Wrist).unwrap();
        assert!(wrist.position.abs_diff_eq(Vec3::new(0.0, 1.0, -1.55), 1e-4));
    }

    #[test]
    fn exit_vr_hides_hands() {
        let mut ctx = AppContext::new(small_config()).unwrap();
        ctx.enter_vr().unwrap();
        let mut xr = XrInput::default();
        xr.hands[Handedness::Left.index()] = Some(aiming_hand(false));
        ctx.frame(&InputState::new(), &xr, 1.0 / 60.0);
        assert!(ctx.hands().visible_count() > 0);

        ctx.exit_vr().unwrap();
        assert_eq!(ctx.hands().visible_count(), 0);
    }

    #[test]
    fn wave_follows_elapsed_time() {
        let mut config = small_config();
        config.wave = Some(WaveFieldConfig {
            count: 32,
            ..Default::default()
        });
        let mut ctx = AppContext::new(config).unwrap();
        for _ in 0..10 {
            ctx.frame(&InputState::new(), &XrInput::default(), 0.1);
        }
        assert!((ctx.elapsed() - 1.0).abs() < 1e-5);
        let wave = ctx.wave().unwrap();
        assert_eq!(wave.len(), 32);
        let point = wave.position(0);
        let distance = (point.x * point.x + point.z * point.z).sqrt();
        assert!((point.y - wave.height_at(distance, ctx.elapsed())).abs() < 1e-5);
    }
}

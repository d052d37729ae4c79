//! Camera rig: the group carrying the viewer. Desktop mode drives it with
//! WASD and a smoothed cursor look; in VR the headset pose rides on top of it
//! and only teleports move it.

use engine_core::{Transform, Vec3};
use input::InputState;
use std::f32::consts::PI;

use crate::config::CameraConfig;

/// Reference frame rate the per-frame move distance is tuned for.
const REFERENCE_FPS: f32 = 60.0;

#[derive(Debug, Clone)]
pub struct CameraRig {
    /// World transform of the rig. Tracked XR poses are relative to this.
    pub rig: Transform,
    /// Camera transform relative to the rig (desktop look only).
    pub camera: Transform,
    yaw: f32,
    pitch: f32,
    config: CameraConfig,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            rig: Transform::from_position(config.start_position),
            camera: Transform::default(),
            yaw: 0.0,
            pitch: 0.0,
            config,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.rig.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Camera in world space.
    pub fn camera_world(&self) -> Transform {
        self.to_world(&self.camera)
    }

    /// Map a rig-local pose (XR tracking space) into world space.
    pub fn to_world(&self, local: &Transform) -> Transform {
        Transform {
            position: self.rig.position + self.rig.rotation * (local.position * self.rig.scale),
            rotation: self.rig.rotation * local.rotation,
            scale: self.rig.scale * local.scale,
        }
    }

    /// Desktop frame: walk, then ease the view toward the cursor.
    pub fn update_desktop(&mut self, input: &InputState, dt: f32) {
        self.walk(input, dt);
        self.look(input);
    }

    fn walk(&mut self, input: &InputState, dt: f32) {
        let movement = input.movement_input();
        if movement == glam::Vec2::ZERO {
            return;
        }
        let speed = if input.is_sprinting() {
            self.config.move_speed * self.config.sprint_multiplier
        } else {
            self.config.move_speed
        };
        let distance = speed * dt * REFERENCE_FPS;

        // Walk on the horizontal plane regardless of pitch.
        let forward = self.camera_world().forward();
        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y);

        self.rig
            .translate((forward * movement.y + right * movement.x) * distance);
    }

    fn look(&mut self, input: &InputState) {
        let cursor = input.cursor();
        let target_yaw = -cursor.x * PI * self.config.sensitivity_x;
        let target_pitch = cursor.y * PI * 0.5 * self.config.sensitivity_y;

        self.yaw += (target_yaw - self.yaw) * self.config.smoothing;
        self.pitch += (target_pitch - self.pitch) * self.config.smoothing;

        let max_pitch = PI / 2.0 - self.config.pitch_margin;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.camera.set_yaw_pitch(self.yaw, self.pitch);
    }

    /// Move the rig to `target` on the floor plane, keeping its height.
    pub fn teleport_to(&mut self, target: Vec3) {
        self.rig.position.x = target.x;
        self.rig.position.z = target.z;
    }
}

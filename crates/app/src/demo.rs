//! Scripted input for the headless session: a desktop walk with a sweeping
//! cursor, and inside VR a right hand that repeatedly pinches, aims at the
//! floor and lets go.

use engine_core::{Transform, Vec3};
use input::{ElementState, Finger, HandJoint, HandPose, Handedness, InputState, JointKind, Key, XrInput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Window size the scripted cursor moves in.
const WINDOW: (u32, u32) = (1280, 720);
/// Frames per pinch / release cycle in VR.
const PINCH_CYCLE: u64 = 90;
/// Frames of each cycle spent pinching.
const PINCH_FRAMES: u64 = 45;
/// Where the scripted wrist sits relative to the rig.
const WRIST: Vec3 = Vec3::new(0.15, -0.5, -0.3);

pub struct DemoScript {
    rng: StdRng,
    /// Aim direction for the current pinch cycle, rig-local.
    aim: Vec3,
}

impl DemoScript {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            aim: Vec3::new(0.0, -1.0, -1.0).normalize(),
        }
    }

    /// Desktop frame: walk forward for a while, sprint halfway, and sweep the
    /// cursor in a slow ellipse.
    pub fn desktop_input(&mut self, frame: u64, input: &mut InputState) {
        let phase = frame % 240;
        match phase {
            0 => input.process_keyboard(Key::W, ElementState::Pressed),
            60 => input.process_keyboard(Key::Shift, ElementState::Pressed),
            120 => {
                input.process_keyboard(Key::W, ElementState::Released);
                input.process_keyboard(Key::Shift, ElementState::Released);
                input.process_keyboard(Key::D, ElementState::Pressed);
            }
            180 => input.process_keyboard(Key::D, ElementState::Released),
            _ => {}
        }

        let angle = frame as f64 * 0.02;
        let (w, h) = (WINDOW.0 as f64, WINDOW.1 as f64);
        input.process_cursor_position(
            (w * 0.5 + angle.cos() * w * 0.3, h * 0.5 + angle.sin() * h * 0.2),
            WINDOW,
        );
    }

    /// VR frame `vr_frame` frames into the session.
    pub fn xr_input(&mut self, vr_frame: u64) -> XrInput {
        let phase = vr_frame % PINCH_CYCLE;
        if phase == 0 {
            // New target each cycle: down and ahead with some sideways jitter.
            let side = self.rng.gen_range(-0.6..0.6);
            let down = self.rng.gen_range(-1.2..-0.4);
            self.aim = Vec3::new(side, down, -1.0).normalize();
        }
        let pinching = phase < PINCH_FRAMES;

        let mut xr = XrInput::default();
        xr.hands[Handedness::Right.index()] = Some(scripted_hand(self.aim, pinching));
        xr
    }
}

/// A flat right hand with fingers along -Z, its index knuckle pointing along `aim`.
pub fn scripted_hand(aim: Vec3, pinching: bool) -> HandPose {
    let mut pose = HandPose::new();
    for joint in HandJoint::ALL {
        let lane = match joint.finger() {
            None | Some(Finger::Middle) => 0.0,
            Some(Finger::Thumb) => -0.045,
            Some(Finger::Index) => -0.022,
            Some(Finger::Ring) => 0.02,
            Some(Finger::Pinky) => 0.038,
        };
        let depth = match joint.kind() {
            JointKind::Wrist => 0.0,
            JointKind::Metacarpal => 0.035,
            JointKind::Proximal => 0.08,
            JointKind::Intermediate => 0.11,
            JointKind::Distal => 0.13,
            JointKind::Tip => 0.15,
        };
        pose.set_joint(joint, Transform::from_position(WRIST + Vec3::new(lane, 0.0, -depth)));
    }

    if let Some(mut knuckle) = pose.joint(HandJoint::IndexMetacarpal).copied() {
        knuckle.look_to(aim, Vec3::Y);
        pose.set_joint(HandJoint::IndexMetacarpal, knuckle);
    }
    if let Some(index_tip) = pose.position(HandJoint::IndexTip) {
        let gap = if pinching { 0.01 } else { 0.06 };
        pose.set_joint(
            HandJoint::ThumbTip,
            Transform::from_position(index_tip - Vec3::new(gap, 0.0, 0.0)),
        );
    }
    pose
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::DEFAULT_PINCH_THRESHOLD;

    #[test]
    fn scripted_hand_pinch_toggles() {
        let pinch = scripted_hand(Vec3::NEG_Z, true);
        let open = scripted_hand(Vec3::NEG_Z, false);
        assert!(pinch.is_pinching(DEFAULT_PINCH_THRESHOLD));
        assert!(!open.is_pinching(DEFAULT_PINCH_THRESHOLD));
        assert_eq!(pinch.tracked().count(), 25);
    }

    #[test]
    fn knuckle_faces_aim() {
        let aim = Vec3::new(0.3, -1.0, -1.0).normalize();
        let pose = scripted_hand(aim, true);
        let knuckle = pose.joint(HandJoint::IndexMetacarpal).unwrap();
        assert!(knuckle.forward().abs_diff_eq(aim, 1e-5));
    }

    #[test]
    fn pinch_cycle_alternates() {
        let mut script = DemoScript::new(Some(3));
        let pinching = |xr: XrInput| {
            xr.hand(Handedness::Right)
                .is_some_and(|h| h.is_pinching(DEFAULT_PINCH_THRESHOLD))
        };
        assert!(pinching(script.xr_input(0)));
        assert!(pinching(script.xr_input(PINCH_FRAMES - 1)));
        assert!(!pinching(script.xr_input(PINCH_FRAMES)));
        assert!(pinching(script.xr_input(PINCH_CYCLE)));
    }

    #[test]
    fn desktop_script_walks_then_strafes() {
        let mut script = DemoScript::new(Some(1));
        let mut input = InputState::new();
        script.desktop_input(0, &mut input);
        assert!(input.is_key_held(Key::W));
        script.desktop_input(60, &mut input);
        assert!(input.is_sprinting());
        script.desktop_input(120, &mut input);
        assert!(!input.is_key_held(Key::W));
        assert!(input.is_key_held(Key::D));
        assert!(input.cursor().x.abs() <= 1.0);
    }
}

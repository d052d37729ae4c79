//! Tracked XR input: controller poses and articulated hand joints.
//!
//! Poses arrive from the XR runtime once per frame, expressed in the local
//! space of the camera rig (the tracking reference space). Nothing here talks
//! to a device.

use engine_core::{Transform, Vec3};

/// Thumb tip to index tip distance (metres) below which a hand counts as pinching.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.02;

/// Number of tracked joints per hand.
pub const JOINT_COUNT: usize = 25;

/// Which hand / controller slot. Slot 0 is the right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    pub const BOTH: [Handedness; 2] = [Handedness::Right, Handedness::Left];

    pub fn index(self) -> usize {
        match self {
            Handedness::Right => 0,
            Handedness::Left => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Anatomical role of a joint, used to pick its visual shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointKind {
    Wrist,
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
    Tip,
}

/// The 25 joints of the WebXR hand model, in runtime order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    PinkyMetacarpal,
    PinkyProximal,
    PinkyIntermediate,
    PinkyDistal,
    PinkyTip,
}

impl HandJoint {
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        HandJoint::Wrist,
        HandJoint::ThumbMetacarpal,
        HandJoint::ThumbProximal,
        HandJoint::ThumbDistal,
        HandJoint::ThumbTip,
        HandJoint::IndexMetacarpal,
        HandJoint::IndexProximal,
        HandJoint::IndexIntermediate,
        HandJoint::IndexDistal,
        HandJoint::IndexTip,
        HandJoint::MiddleMetacarpal,
        HandJoint::MiddleProximal,
        HandJoint::MiddleIntermediate,
        HandJoint::MiddleDistal,
        HandJoint::MiddleTip,
        HandJoint::RingMetacarpal,
        HandJoint::RingProximal,
        HandJoint::RingIntermediate,
        HandJoint::RingDistal,
        HandJoint::RingTip,
        HandJoint::PinkyMetacarpal,
        HandJoint::PinkyProximal,
        HandJoint::PinkyIntermediate,
        HandJoint::PinkyDistal,
        HandJoint::PinkyTip,
    ];

    /// Position in [`HandJoint::ALL`] and in [`HandPose`] storage.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> JointKind {
        use HandJoint::*;
        match self {
            Wrist => JointKind::Wrist,
            ThumbMetacarpal | IndexMetacarpal | MiddleMetacarpal | RingMetacarpal
            | PinkyMetacarpal => JointKind::Metacarpal,
            ThumbProximal | IndexProximal | MiddleProximal | RingProximal | PinkyProximal => {
                JointKind::Proximal
            }
            IndexIntermediate | MiddleIntermediate | RingIntermediate | PinkyIntermediate => {
                JointKind::Intermediate
            }
            ThumbDistal | IndexDistal | MiddleDistal | RingDistal | PinkyDistal => {
                JointKind::Distal
            }
            ThumbTip | IndexTip | MiddleTip | RingTip | PinkyTip => JointKind::Tip,
        }
    }

    /// The finger this joint belongs to; `None` for the wrist.
    pub fn finger(self) -> Option<Finger> {
        match self.index() {
            0 => None,
            1..=4 => Some(Finger::Thumb),
            5..=9 => Some(Finger::Index),
            10..=14 => Some(Finger::Middle),
            15..=19 => Some(Finger::Ring),
            _ => Some(Finger::Pinky),
        }
    }

    /// The joint one step closer to the wrist.
    pub fn parent(self) -> Option<HandJoint> {
        match self.kind() {
            JointKind::Wrist => None,
            JointKind::Metacarpal => Some(HandJoint::Wrist),
            _ => Some(HandJoint::ALL[self.index() - 1]),
        }
    }
}

/// Pairs of joints connected by a bone, wrist outwards, finger by finger.
pub fn bones() -> impl Iterator<Item = (HandJoint, HandJoint)> {
    HandJoint::ALL
        .into_iter()
        .filter_map(|joint| joint.parent().map(|parent| (parent, joint)))
}

/// Rig-local transforms of one tracked hand. A joint is `None` while the runtime
/// has no pose for it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandPose {
    joints: [Option<Transform>; JOINT_COUNT],
}

impl HandPose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn joint(&self, joint: HandJoint) -> Option<&Transform> {
        self.joints[joint.index()].as_ref()
    }

    pub fn set_joint(&mut self, joint: HandJoint, transform: Transform) {
        self.joints[joint.index()] = Some(transform);
    }

    pub fn clear_joint(&mut self, joint: HandJoint) {
        self.joints[joint.index()] = None;
    }

    pub fn position(&self, joint: HandJoint) -> Option<Vec3> {
        self.joint(joint).map(|t| t.position)
    }

    /// Tracked joints with their transforms, in runtime order.
    pub fn tracked(&self) -> impl Iterator<Item = (HandJoint, &Transform)> {
        HandJoint::ALL
            .into_iter()
            .zip(self.joints.iter())
            .filter_map(|(joint, transform)| transform.as_ref().map(|t| (joint, t)))
    }

    /// Thumb and index fingertips closer than `threshold`.
    pub fn is_pinching(&self, threshold: f32) -> bool {
        match (
            self.position(HandJoint::ThumbTip),
            self.position(HandJoint::IndexTip),
        ) {
            (Some(thumb), Some(index)) => thumb.distance(index) < threshold,
            _ => false,
        }
    }
}

/// One motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub transform: Transform,
    /// Grip button held.
    pub squeezing: bool,
}

/// Everything the XR runtime reported for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XrInput {
    pub controllers: [ControllerState; 2],
    pub hands: [Option<HandPose>; 2],
}

impl XrInput {
    pub fn controller(&self, hand: Handedness) -> &ControllerState {
        &self.controllers[hand.index()]
    }

    pub fn hand(&self, hand: Handedness) -> Option<&HandPose> {
        self.hands[hand.index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_table_is_consistent() {
        for (i, joint) in HandJoint::ALL.into_iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn joint_kinds_and_fingers() {
        assert_eq!(HandJoint::Wrist.kind(), JointKind::Wrist);
        assert_eq!(HandJoint::Wrist.finger(), None);
        assert_eq!(HandJoint::ThumbDistal.kind(), JointKind::Distal);
        assert_eq!(HandJoint::ThumbTip.finger(), Some(Finger::Thumb));
        assert_eq!(HandJoint::RingIntermediate.kind(), JointKind::Intermediate);
        assert_eq!(HandJoint::PinkyMetacarpal.finger(), Some(Finger::Pinky));
        assert_eq!(HandJoint::MiddleTip.finger(), Some(Finger::Middle));
    }

    #[test]
    fn bones_connect_wrist_to_tips() {
        let bones: Vec<_> = bones().collect();
        assert_eq!(bones.len(), 24);
        assert_eq!(bones[0], (HandJoint::Wrist, HandJoint::ThumbMetacarpal));
        assert!(bones.contains(&(HandJoint::ThumbDistal, HandJoint::ThumbTip)));
        assert!(bones.contains(&(HandJoint::Wrist, HandJoint::PinkyMetacarpal)));
        assert!(bones.contains(&(HandJoint::IndexIntermediate, HandJoint::IndexDistal)));
        let wrist_bones = bones.iter().filter(|(from, _)| *from == HandJoint::Wrist).count();
        assert_eq!(wrist_bones, 5);
    }

    #[test]
    fn pinch_uses_threshold() {
        let mut pose = HandPose::new();
        assert!(!pose.is_pinching(DEFAULT_PINCH_THRESHOLD));

        pose.set_joint(HandJoint::ThumbTip, Transform::from_position(Vec3::ZERO));
        pose.set_joint(HandJoint::IndexTip, Transform::from_position(Vec3::new(0.015, 0.0, 0.0)));
        assert!(pose.is_pinching(DEFAULT_PINCH_THRESHOLD));

        pose.set_joint(HandJoint::IndexTip, Transform::from_position(Vec3::new(0.05, 0.0, 0.0)));
        assert!(!pose.is_pinching(DEFAULT_PINCH_THRESHOLD));

        pose.clear_joint(HandJoint::ThumbTip);
        assert!(!pose.is_pinching(1.0));
    }

    #[test]
    fn tracked_skips_missing_joints() {
        let mut pose = HandPose::new();
        pose.set_joint(HandJoint::Wrist, Transform::default());
        pose.set_joint(HandJoint::IndexTip, Transform::default());
        let joints: Vec<_> = pose.tracked().map(|(joint, _)| joint).collect();
        assert_eq!(joints, vec![HandJoint::Wrist, HandJoint::IndexTip]);
    }
}

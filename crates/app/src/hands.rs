//! Hand visuals: procedural joint spheres, fingernails, bone cylinders and a
//! back-of-hand plate that follow the tracked hand joints each frame.
//!
//! All pieces live as entities in a private `hecs::World` so the renderer can
//! walk one list of (shape, material, transform, visible) instances.

use engine_core::{
    MaterialId, MeshInstance, MeshShape, Quat, Transform, TransformRaw, Vec3, Visible, World,
};
use hecs::Entity;
use input::{bones, Finger, HandJoint, HandPose, Handedness, JointKind, JOINT_COUNT};
use std::f32::consts::PI;

use crate::camera::CameraRig;

/// Bones are drawn slightly shorter than the joint gap so spheres show at both ends.
const BONE_LENGTH_FACTOR: f32 = 0.9;
const BONE_RADIUS_TOP: f32 = 0.005;
const BONE_RADIUS_BOTTOM: f32 = 0.007;
/// How far past the fingertip the nail sits, along the finger.
const NAIL_OFFSET: f32 = 0.006;
const THUMB_NAIL_SCALE: f32 = 1.2;
/// Back-of-hand plate offset from the wrist, in wrist space.
const HAND_BACK_OFFSET: Vec3 = Vec3::new(0.0, 0.005, -0.03);
/// Wrist to thumb metacarpal distance the plate mesh is modelled for.
const HAND_BACK_REFERENCE_SPAN: f32 = 0.08;

/// Sphere parameters for one joint kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointShape {
    pub radius: f32,
    pub stretch: Vec3,
}

impl JointShape {
    pub fn for_kind(kind: JointKind) -> Self {
        let (radius, stretch) = match kind {
            JointKind::Wrist => (0.02, Vec3::ONE),
            // Knuckles: bigger and a bit flattened.
            JointKind::Metacarpal => (0.012 * 1.2, Vec3::new(1.0, 0.8, 1.1)),
            JointKind::Proximal => (0.009, Vec3::ONE),
            JointKind::Intermediate => (0.008, Vec3::ONE),
            JointKind::Distal => (0.007, Vec3::ONE),
            // Fingertips: smaller and slightly elongated.
            JointKind::Tip => (0.006 * 0.8, Vec3::new(0.9, 0.9, 1.1)),
        };
        Self { radius, stretch }
    }

    pub fn mesh(&self) -> MeshShape {
        MeshShape::Sphere {
            radius: self.radius,
            stretch: self.stretch,
        }
    }
}

/// Which hand an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandTag(pub Handedness);

#[derive(Debug)]
struct HandEntities {
    joints: [Entity; JOINT_COUNT],
    /// Nail per fingertip, keyed by the tip joint.
    nails: Vec<(HandJoint, Entity)>,
    bones: Vec<(HandJoint, HandJoint, Entity)>,
    back: Entity,
}

pub struct HandVisuals {
    world: World,
    hands: [HandEntities; 2],
}

impl HandVisuals {
    /// Spawn every hand piece up front, hidden.
    pub fn new() -> Self {
        let mut world = World::new();
        let hands = Handedness::BOTH.map(|hand| spawn_hand(&mut world, hand));
        Self { world, hands }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Copy this frame's joint poses onto the hand pieces. An untracked hand
    /// (`None`) is hidden entirely. Poses are rig-local and mapped through `rig`.
    pub fn update(&mut self, hand: Handedness, pose: Option<&HandPose>, rig: &CameraRig) {
        let Some(pose) = pose else {
            self.hide(hand);
            return;
        };
        let entities = &self.hands[hand.index()];

        let mut world_joints: [Option<Transform>; JOINT_COUNT] = [None; JOINT_COUNT];
        for (joint, local) in pose.tracked() {
            world_joints[joint.index()] = Some(rig.to_world(local));
        }
        let joint_at = |joint: HandJoint| world_joints[joint.index()];

        for joint in HandJoint::ALL {
            set(&mut self.world, entities.joints[joint.index()], joint_at(joint));
        }

        for &(tip, entity) in &entities.nails {
            let placement = tip
                .parent()
                .and_then(|distal| Some((joint_at(distal)?, joint_at(tip)?)))
                .map(|(distal, tip_pose)| nail_transform(tip, distal.position, tip_pose.position));
            set(&mut self.world, entity, placement);
        }

        for &(from, to, entity) in &entities.bones {
            let placement = match (joint_at(from), joint_at(to)) {
                (Some(a), Some(b)) => Some(bone_transform(a.position, b.position)),
                _ => None,
            };
            set(&mut self.world, entity, placement);
        }

        let back = joint_at(HandJoint::Wrist).map(|wrist| {
            let span = joint_at(HandJoint::ThumbMetacarpal)
                .map(|thumb| thumb.position.distance(wrist.position))
                .unwrap_or(HAND_BACK_REFERENCE_SPAN);
            hand_back_transform(&wrist, span)
        });
        set(&mut self.world, entities.back, back);
    }

    /// Hide every piece of one hand.
    pub fn hide(&mut self, hand: Handedness) {
        for (_, (tag, visible)) in self.world.query_mut::<(&HandTag, &mut Visible)>() {
            if tag.0 == hand {
                visible.0 = false;
            }
        }
    }

    pub fn hide_all(&mut self) {
        for (_, visible) in self.world.query_mut::<&mut Visible>() {
            visible.0 = false;
        }
    }

    /// Number of pieces currently shown.
    pub fn visible_count(&self) -> usize {
        self.world
            .query::<&Visible>()
            .iter()
            .filter(|(_, visible)| visible.is_visible())
            .count()
    }

    /// Visible pieces as (mesh, GPU instance data) for the renderer.
    pub fn instances(&self) -> Vec<(MeshInstance, TransformRaw)> {
        self.world
            .query::<(&MeshInstance, &Transform, &Visible)>()
            .iter()
            .filter(|(_, (_, _, visible))| visible.is_visible())
            .map(|(_, (mesh, transform, _))| (*mesh, TransformRaw::from(transform)))
            .collect()
    }

    pub fn joint_transform(&self, hand: Handedness, joint: HandJoint) -> Option<Transform> {
        self.visible_transform(self.hands[hand.index()].joints[joint.index()])
    }

    pub fn nail_transform(&self, hand: Handedness, tip: HandJoint) -> Option<Transform> {
        let entity = self.hands[hand.index()]
            .nails
            .iter()
            .find(|(joint, _)| *joint == tip)?
            .1;
        self.visible_transform(entity)
    }

    pub fn bone_transform(&self, hand: Handedness, from: HandJoint, to: HandJoint) -> Option<Transform> {
        let entity = self.hands[hand.index()]
            .bones
            .iter()
            .find(|(a, b, _)| *a == from && *b == to)?
            .2;
        self.visible_transform(entity)
    }

    pub fn hand_back_transform(&self, hand: Handedness) -> Option<Transform> {
        self.visible_transform(self.hands[hand.index()].back)
    }

    fn visible_transform(&self, entity: Entity) -> Option<Transform> {
        let mut query = self.world.query_one::<(&Transform, &Visible)>(entity).ok()?;
        let (transform, visible) = query.get()?;
        visible.is_visible().then_some(*transform)
    }
}

impl Default for HandVisuals {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_hand(world: &mut World, hand: Handedness) -> HandEntities {
    let tag = HandTag(hand);
    let hidden = Visible(false);

    let joints = HandJoint::ALL.map(|joint| {
        let shape = JointShape::for_kind(joint.kind()).mesh();
        world.spawn((tag, joint, MeshInstance::new(shape, MaterialId::Skin), Transform::default(), hidden))
    });

    let nails = HandJoint::ALL
        .into_iter()
        .filter(|joint| joint.kind() == JointKind::Tip)
        .map(|tip| {
            let mesh = MeshInstance::new(MeshShape::Nail, MaterialId::Nail);
            (tip, world.spawn((tag, mesh, Transform::default(), hidden)))
        })
        .collect();

    let bones = bones()
        .map(|(from, to)| {
            let mesh = MeshInstance::new(
                MeshShape::Cylinder {
                    radius_top: BONE_RADIUS_TOP,
                    radius_bottom: BONE_RADIUS_BOTTOM,
                },
                MaterialId::Skin,
            );
            (from, to, world.spawn((tag, mesh, Transform::default(), hidden)))
        })
        .collect();

    let back = world.spawn((
        tag,
        MeshInstance::new(MeshShape::HandBack, MaterialId::Skin),
        Transform::default(),
        hidden,
    ));

    HandEntities {
        joints,
        nails,
        bones,
        back,
    }
}

/// Show `entity` at `placement`, or hide it when there is none.
fn set(world: &mut World, entity: Entity, placement: Option<Transform>) {
    if let Ok((transform, visible)) = world.query_one_mut::<(&mut Transform, &mut Visible)>(entity) {
        match placement {
            Some(t) => {
                *transform = t;
                visible.0 = true;
            }
            None => visible.0 = false,
        }
    }
}

/// Nail just past the fingertip, facing along the finger.
pub fn nail_transform(tip: HandJoint, distal: Vec3, tip_position: Vec3) -> Transform {
    let direction = (tip_position - distal).normalize_or_zero();
    let mut t = Transform::from_position(tip_position + direction * NAIL_OFFSET);
    // Local +Z along the finger, then turn the flat nail outline onto the finger's back.
    t.look_to(-direction, Vec3::Y);
    t.rotation = t.rotation * Quat::from_rotation_x(-PI / 2.0) * Quat::from_rotation_z(PI);
    let scale = if tip.finger() == Some(Finger::Thumb) {
        THUMB_NAIL_SCALE
    } else {
        1.0
    };
    t.scale = Vec3::splat(scale);
    t
}

/// Unit cylinder stretched between two joints.
pub fn bone_transform(from: Vec3, to: Vec3) -> Transform {
    let mut t = Transform::between(from, to);
    t.scale = Vec3::new(1.0, from.distance(to) * BONE_LENGTH_FACTOR, 1.0);
    t
}

/// Back-of-hand plate on the wrist, scaled with the wrist to thumb span.
pub fn hand_back_transform(wrist: &Transform, span: f32) -> Transform {
    Transform {
        position: wrist.position + wrist.rotation * HAND_BACK_OFFSET,
        rotation: wrist.rotation,
        scale: Vec3::splat(span / HAND_BACK_REFERENCE_SPAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn rig_at_origin() -> CameraRig {
        CameraRig::new(CameraConfig {
            start_position: Vec3::ZERO,
            ..Default::default()
        })
    }

    /// A flat hand: fingers spread along -Z from the wrist, joints 3 cm apart.
    fn open_hand() -> HandPose {
        let mut pose = HandPose::new();
        for joint in HandJoint::ALL {
            let lane = match joint.finger() {
                None => 0.0,
                Some(Finger::Thumb) => 0.04,
                Some(Finger::Index) => 0.02,
                Some(Finger::Middle) => 0.0,
                Some(Finger::Ring) => -0.02,
                Some(Finger::Pinky) => -0.04,
            };
            let depth = match joint.kind() {
                JointKind::Wrist => 0.0,
                JointKind::Metacarpal => 0.03,
                JointKind::Proximal => 0.06,
                JointKind::Intermediate => 0.09,
                JointKind::Distal => 0.12,
                JointKind::Tip => 0.15,
            };
            pose.set_joint(joint, Transform::from_position(Vec3::new(lane, 0.0, -depth)));
        }
        pose
    }

    #[test]
    fn shape_table_matches_joint_kinds() {
        assert_eq!(JointShape::for_kind(JointKind::Wrist).radius, 0.02);
        let knuckle = JointShape::for_kind(JointKind::Metacarpal);
        assert!((knuckle.radius - 0.0144).abs() < 1e-6);
        assert_eq!(knuckle.stretch, Vec3::new(1.0, 0.8, 1.1));
        let tip = JointShape::for_kind(JointKind::Tip);
        assert!((tip.radius - 0.0048).abs() < 1e-6);
        assert!(JointShape::for_kind(JointKind::Proximal).radius > JointShape::for_kind(JointKind::Distal).radius);
    }

    #[test]
    fn all_pieces_start_hidden() {
        let visuals = HandVisuals::new();
        // Per hand: 25 joints, 5 nails, 24 bones, 1 back.
        assert_eq!(visuals.world().len(), 2 * (25 + 5 + 24 + 1));
        assert_eq!(visuals.visible_count(), 0);
        assert!(visuals.instances().is_empty());
    }

    #[test]
    fn tracked_hand_shows_every_piece() {
        let mut visuals = HandVisuals::new();
        let rig = rig_at_origin();
        visuals.update(Handedness::Right, Some(&open_hand()), &rig);
        assert_eq!(visuals.visible_count(), 55);
        assert_eq!(visuals.instances().len(), 55);

        let wrist = visuals.joint_transform(Handedness::Right, HandJoint::Wrist).unwrap();
        assert_eq!(wrist.position, Vec3::ZERO);
        assert!(visuals.joint_transform(Handedness::Left, HandJoint::Wrist).is_none());
    }

    #[test]
    fn joints_follow_the_rig() {
        let mut visuals = HandVisuals::new();
        let mut rig = rig_at_origin();
        rig.teleport_to(Vec3::new(3.0, 0.0, -4.0));
        visuals.update(Handedness::Left, Some(&open_hand()), &rig);
        let tip = visuals.joint_transform(Handedness::Left, HandJoint::IndexTip).unwrap();
        assert!(tip.position.abs_diff_eq(Vec3::new(3.02, 0.0, -4.15), 1e-5));
    }

    #[test]
    fn bone_spans_joint_gap() {
        let mut visuals = HandVisuals::new();
        visuals.update(Handedness::Right, Some(&open_hand()), &rig_at_origin());
        let bone = visuals
            .bone_transform(Handedness::Right, HandJoint::IndexProximal, HandJoint::IndexIntermediate)
            .unwrap();
        assert!(bone.position.abs_diff_eq(Vec3::new(0.02, 0.0, -0.075), 1e-6));
        assert!((bone.scale.y - 0.03 * 0.9).abs() < 1e-6);
        // Cylinder axis points from the proximal joint toward the intermediate one.
        assert!(bone.up().abs_diff_eq(-Vec3::Z, 1e-5));
    }

    #[test]
    fn nails_sit_past_fingertips() {
        let mut visuals = HandVisuals::new();
        visuals.update(Handedness::Right, Some(&open_hand()), &rig_at_origin());
        let nail = visuals.nail_transform(Handedness::Right, HandJoint::MiddleTip).unwrap();
        assert!(nail.position.abs_diff_eq(Vec3::new(0.0, 0.0, -0.156), 1e-6));
        assert_eq!(nail.scale, Vec3::ONE);
        let thumb = visuals.nail_transform(Handedness::Right, HandJoint::ThumbTip).unwrap();
        assert_eq!(thumb.scale, Vec3::splat(1.2));
    }

    #[test]
    fn hand_back_scales_with_thumb_span() {
        let mut visuals = HandVisuals::new();
        visuals.update(Handedness::Right, Some(&open_hand()), &rig_at_origin());
        let back = visuals.hand_back_transform(Handedness::Right).unwrap();
        let span = Vec3::new(0.04, 0.0, -0.03).length();
        assert!((back.scale.x - span / 0.08).abs() < 1e-6);
        assert!(back.position.abs_diff_eq(Vec3::new(0.0, 0.005, -0.03), 1e-6));
    }

    #[test]
    fn missing_joints_hide_dependent_pieces() {
        let mut visuals = HandVisuals::new();
        let rig = rig_at_origin();
        let mut pose = open_hand();
        pose.clear_joint(HandJoint::IndexDistal);
        visuals.update(Handedness::Right, Some(&pose), &rig);

        assert!(visuals.joint_transform(Handedness::Right, HandJoint::IndexDistal).is_none());
        assert!(visuals.nail_transform(Handedness::Right, HandJoint::IndexTip).is_none());
        assert!(visuals
            .bone_transform(Handedness::Right, HandJoint::IndexDistal, HandJoint::IndexTip)
            .is_none());
        // One joint, one nail and two bones disappear.
        assert_eq!(visuals.visible_count(), 55 - 4);
    }

    #[test]
    fn lost_tracking_hides_hand() {
        let mut visuals = HandVisuals::new();
        let rig = rig_at_origin();
        visuals.update(Handedness::Right, Some(&open_hand()), &rig);
        visuals.update(Handedness::Left, Some(&open_hand()), &rig);
        visuals.update(Handedness::Right, None, &rig);
        assert_eq!(visuals.visible_count(), 55);
        visuals.hide_all();
        assert_eq!(visuals.visible_count(), 0);
    }
}

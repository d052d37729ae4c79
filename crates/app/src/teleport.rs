//! Teleport locomotion: aim at the floor while a controller grip is squeezed
//! or a hand is pinching, jump when it is let go.

use engine_core::{MaterialId, MeshInstance, MeshShape, Transform, Vec3};
use input::Handedness;
use physics::{FloorPlane, Ray};
use std::f32::consts::FRAC_PI_2;

use crate::camera::CameraRig;
use crate::config::TeleportConfig;

/// Ring shown on the floor at the pending destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportMarker {
    pub position: Vec3,
    pub visible: bool,
}

impl TeleportMarker {
    pub const INNER_RADIUS: f32 = 0.5;
    pub const OUTER_RADIUS: f32 = 0.8;

    pub fn mesh() -> MeshInstance {
        MeshInstance::new(
            MeshShape::Ring {
                inner_radius: Self::INNER_RADIUS,
                outer_radius: Self::OUTER_RADIUS,
            },
            MaterialId::Marker,
        )
    }

    /// Ring laid flat on the floor.
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(
            self.position,
            engine_core::Quat::from_rotation_x(-FRAC_PI_2),
        )
    }
}

/// Something that can aim a teleport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportSource {
    Controller(Handedness),
    Hand(Handedness),
}

impl TeleportSource {
    fn slot(self) -> usize {
        match self {
            TeleportSource::Controller(hand) => hand.index(),
            TeleportSource::Hand(hand) => 2 + hand.index(),
        }
    }
}

#[derive(Debug)]
pub struct Teleport {
    marker: TeleportMarker,
    floor: FloorPlane,
    marker_height: f32,
    max_distance: f32,
    /// Whether each source was aiming last frame.
    was_active: [bool; 4],
}

impl Teleport {
    pub fn new(config: &TeleportConfig) -> Self {
        Self {
            marker: TeleportMarker {
                position: Vec3::ZERO,
                visible: false,
            },
            floor: FloorPlane::new(config.floor_height, config.floor_size),
            marker_height: config.marker_height,
            max_distance: config.max_distance,
            was_active: [false; 4],
        }
    }

    pub fn marker(&self) -> &TeleportMarker {
        &self.marker
    }

    /// Point the marker where `ray` meets the floor, or hide it on a miss.
    pub fn aim(&mut self, ray: &Ray) {
        match self.floor.raycast(ray, self.max_distance) {
            Some(hit) => {
                self.marker.position = Vec3::new(hit.point.x, hit.point.y + self.marker_height, hit.point.z);
                self.marker.visible = true;
            }
            None => self.marker.visible = false,
        }
    }

    /// Feed one source for this frame.
    ///
    /// While `active`, a world-space `ray` (when the pose is tracked) re-aims
    /// the marker. On the frame the source stops being active, a visible
    /// marker moves the rig there and is hidden. Returns the destination when
    /// a teleport happened.
    pub fn update_source(
        &mut self,
        source: TeleportSource,
        active: bool,
        ray: Option<Ray>,
        rig: &mut CameraRig,
    ) -> Option<Vec3> {
        let slot = source.slot();
        let was_active = std::mem::replace(&mut self.was_active[slot], active);

        if active {
            if let Some(ray) = ray {
                self.aim(&ray);
            }
            return None;
        }
        if was_active && self.marker.visible {
            let target = self.marker.position;
            rig.teleport_to(target);
            self.marker.visible = false;
            log::info!("Teleported via {:?} to ({:.2}, {:.2})", source, target.x, target.z);
            return Some(target);
        }
        None
    }

    /// Forget all in-progress aims (leaving VR).
    pub fn reset(&mut self) {
        self.was_active = [false; 4];
        self.marker.visible = false;
    }
}

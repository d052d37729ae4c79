//! Common ECS components used across the workspace.

use glam::Vec3;

/// Visibility flag for anything an external renderer draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visible(pub bool);

impl Visible {
    pub fn is_visible(&self) -> bool {
        self.0
    }
}

/// Procedural shape an entity should be drawn with. The renderer owns the
/// actual tessellation; these are only the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    /// Sphere of `radius`, stretched per axis by `stretch` before the entity transform.
    Sphere { radius: f32, stretch: Vec3 },
    /// Unit-height cylinder, oriented along local +Y.
    Cylinder { radius_top: f32, radius_bottom: f32 },
    /// Extruded fingernail outline.
    Nail,
    /// Extruded back-of-hand outline.
    HandBack,
    /// Flat ring lying in the local XY plane.
    Ring { inner_radius: f32, outer_radius: f32 },
}

/// Material slot, resolved by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MaterialId {
    #[default]
    Skin,
    Nail,
    Marker,
}

/// Mesh reference component - links an entity to a shape and material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub shape: MeshShape,
    pub material: MaterialId,
}

impl MeshInstance {
    pub fn new(shape: MeshShape, material: MaterialId) -> Self {
        Self { shape, material }
    }
}

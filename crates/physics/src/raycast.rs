//! Raycasting against the teleport floor.

use engine_core::{Transform, Vec3};

/// A half-line from `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `origin`; `direction` is normalized here.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray leaving a tracked pose along its local -Z (pointing) axis.
    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.position, transform.forward())
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a raycast query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Horizontal, square, walkable floor centred on the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPlane {
    /// World Y of the floor.
    pub height: f32,
    /// Half the edge length of the floor square.
    pub half_extent: f32,
}

impl Default for FloorPlane {
    fn default() -> Self {
        Self {
            height: 0.0,
            half_extent: 150.0,
        }
    }
}

impl FloorPlane {
    /// Floor of the given full edge length at `height`.
    pub fn new(height: f32, size: f32) -> Self {
        Self {
            height,
            half_extent: size.abs() * 0.5,
        }
    }

    /// Cast a ray and return the floor hit, if any. The floor is double sided;
    /// an origin lying on the floor counts as above it.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let denom = ray.direction.y;
        if denom.abs() < 1e-6 {
            return None;
        }
        let above = ray.origin.y >= self.height;
        if (above && denom > 0.0) || (!above && denom < 0.0) {
            // Heading away from the floor.
            return None;
        }
        let distance = (self.height - ray.origin.y) / denom;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        let point = ray.point_at(distance);
        if point.x.abs() > self.half_extent || point.z.abs() > self.half_extent {
            return None;
        }
        let normal = if above {
            Vec3::Y
        } else {
            Vec3::NEG_Y
        };
        Some(RaycastHit {
            distance,
            point: Vec3::new(point.x, self.height, point.z),
            normal,
        })
    }
}

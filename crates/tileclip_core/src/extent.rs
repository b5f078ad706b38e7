use bevy_math::Vec3;

/// Sphere enclosing the clip target, as reported by the scene.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BoundingVolume {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingVolume {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn extent(&self) -> VolumeExtent {
        VolumeExtent::from_radius(self.radius)
    }
}

/// Box-like size of the target derived from its bounding sphere.
///
/// Only the sphere is known, so width, height and depth are all the diameter.
/// Recompute it whenever it is needed; the target may have been resized.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VolumeExtent {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub radius: f32,
}

impl VolumeExtent {
    pub fn from_radius(radius: f32) -> Self {
        let diameter = radius * 2.0;
        Self {
            width: diameter,
            height: diameter,
            depth: diameter,
            radius,
        }
    }
}

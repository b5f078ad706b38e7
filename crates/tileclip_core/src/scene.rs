//! The seam between the controller and whatever engine renders the scene.
//!
//! Handles are plain values owned by the controller. Every mutation of a
//! handle goes back through the scene, so an implementation can keep them as
//! ids into its own storage.

use std::fmt::Debug;

use bevy_math::{Vec2, Vec3};

use crate::extent::BoundingVolume;

/// Handle types a scene hands out.
pub trait SceneHandles {
    /// The model being clipped.
    type Target: Copy + PartialEq + Debug;
    /// The clip volume attached to a target.
    type Volume: Debug;
    /// A pickable scene entity. The visual plane is one of these.
    type Entity: Copy + PartialEq + Debug;
    /// An installed set of pointer handlers.
    type Subscription: Debug;
}

/// Everything needed to spawn the visual plane.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VisualPlaneDesc {
    pub extent: Vec2,
    pub normal: Vec3,
    pub distance: f32,
    pub center: Vec3,
}

pub trait ClipScene<H: SceneHandles> {
    fn bounding_volume(&self, target: H::Target) -> Option<BoundingVolume>;

    fn attach_clip_volume(&mut self, target: H::Target, normal: Vec3, distance: f32) -> H::Volume;
    fn set_clip_plane(&mut self, volume: &H::Volume, normal: Vec3, distance: f32);
    fn detach_clip_volume(&mut self, volume: H::Volume);

    fn create_visual_plane(&mut self, desc: VisualPlaneDesc) -> H::Entity;
    fn set_plane_extent(&mut self, plane: H::Entity, extent: Vec2);
    fn set_plane_fn(&mut self, plane: H::Entity, normal: Vec3, distance: f32);
    fn set_plane_visible(&mut self, plane: H::Entity, visible: bool);
    fn set_plane_position(&mut self, plane: H::Entity, position: Vec3);
    fn remove_visual_plane(&mut self, plane: H::Entity);

    /// Start routing pointer press/move/release to the controller.
    fn subscribe_pointer(&mut self) -> H::Subscription;
    fn cancel_subscription(&mut self, subscription: H::Subscription);

    /// Entity under `screen_pos`, if any.
    fn pick(&mut self, screen_pos: Vec2) -> Option<H::Entity>;

    /// Suppressed while the plane is dragged so the drag does not orbit the camera.
    fn set_camera_rotation_enabled(&mut self, enabled: bool);
}

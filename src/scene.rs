use std::collections::BTreeSet;

use bevy::{
    ecs::system::SystemState,
    picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility},
    prelude::*,
};
use tileclip_camera::OrbitCamera;
use tileclip_core::{BoundingVolume, ClipScene, SceneHandles, VisualPlaneDesc};

use crate::{bounds::ClipBounds, settings::ClipStyle, ClipCamera};

// ---------------------------------------------------------------------------
// Components & resources
// ---------------------------------------------------------------------------

/// Clip plane attached to a target. `normal` is in the target's Z-up frame;
/// see [`ClipStyle::frame`] for the mapping into the world.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ClipVolume {
    pub normal: Vec3,
    pub distance: f32,
}

impl ClipVolume {
    pub fn world_normal(&self, frame: Quat) -> Vec3 {
        (frame * self.normal).normalize_or_zero()
    }
}

/// The draggable plane handle. Its `Transform` is derived from these fields.
/// `normal` is a visual normal, mapped by [`ClipStyle::visual_frame`].
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct VisualPlane {
    pub extent: Vec2,
    pub normal: Vec3,
    pub distance: f32,
    pub center: Vec3,
}

impl VisualPlane {
    pub fn transform(&self, visual_frame: Quat) -> Transform {
        let normal = (visual_frame * self.normal).normalize_or_zero();
        Transform {
            translation: self.center - normal * self.distance,
            rotation: Quat::from_rotation_arc(Vec3::Y, normal),
            scale: Vec3::new(self.extent.x, 1.0, self.extent.y),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SubscriptionId(u64);

/// Installed pointer subscriptions. Input is only forwarded to the clip
/// controller while at least one is present.
#[derive(Resource, Default, Debug)]
pub struct PointerSubscriptions {
    next: u64,
    active: BTreeSet<SubscriptionId>,
}

impl PointerSubscriptions {
    pub fn subscribe(&mut self) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.active.insert(id);
        id
    }

    pub fn cancel(&mut self, id: SubscriptionId) {
        self.active.remove(&id);
    }

    pub fn is_listening(&self) -> bool {
        !self.active.is_empty()
    }
}

#[derive(Resource, Clone)]
pub struct ClipPlaneAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

impl FromWorld for ClipPlaneAssets {
    fn from_world(world: &mut World) -> Self {
        let color = world
            .get_resource::<ClipStyle>()
            .map(|style| style.plane_color)
            .unwrap_or(ClipStyle::default().plane_color);
        let mesh = world
            .get_resource_mut::<Assets<Mesh>>()
            .map(|mut meshes| meshes.add(Plane3d::default().mesh().size(1.0, 1.0)))
            .unwrap_or_default();
        let material = world
            .get_resource_mut::<Assets<StandardMaterial>>()
            .map(|mut materials| {
                materials.add(StandardMaterial {
                    base_color: color,
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                })
            })
            .unwrap_or_default();
        Self { mesh, material }
    }
}

// ---------------------------------------------------------------------------
// World-backed scene
// ---------------------------------------------------------------------------

pub struct BevyHandles;

impl SceneHandles for BevyHandles {
    type Target = Entity;
    type Volume = Entity;
    type Entity = Entity;
    type Subscription = SubscriptionId;
}

/// [`ClipScene`] over the ECS world. Targets are entities carrying
/// [`ClipBounds`]; the clip volume lives on the target as a [`ClipVolume`].
pub struct WorldScene<'w> {
    world: &'w mut World,
}

impl<'w> WorldScene<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn visual_frame(&self) -> Quat {
        self.world
            .get_resource::<ClipStyle>()
            .map(|style| style.visual_frame)
            .unwrap_or(ClipStyle::default().visual_frame)
    }

    /// World ray under `screen_pos` from the first [`ClipCamera`].
    fn viewport_ray(&mut self, screen_pos: Vec2) -> Option<Ray3d> {
        let mut cameras = self
            .world
            .query_filtered::<(&Camera, &GlobalTransform), With<ClipCamera>>();
        let (camera, cam_tf) = cameras.iter(self.world).next()?;
        camera.viewport_to_world(cam_tf, screen_pos).ok()
    }

    /// Nearest visible mesh hit by `ray`.
    pub(crate) fn cast_pick_ray(&mut self, ray: Ray3d) -> Option<Entity> {
        if !self.world.contains_resource::<Assets<Mesh>>() {
            return None;
        }
        let mut system_state: SystemState<MeshRayCast> = SystemState::new(self.world);
        let mut ray_cast = system_state.get_mut(self.world);
        let settings = MeshRayCastSettings::default().with_visibility(RayCastVisibility::Visible);
        ray_cast
            .cast_ray(ray, &settings)
            .first()
            .map(|(entity, _)| *entity)
    }

    fn with_plane(&mut self, plane: Entity, f: impl FnOnce(&mut VisualPlane)) {
        if let Some(mut visual) = self.world.get_mut::<VisualPlane>(plane) {
            f(&mut visual);
        }
    }
}

impl ClipScene<BevyHandles> for WorldScene<'_> {
    fn bounding_volume(&self, target: Entity) -> Option<BoundingVolume> {
        self.world.get::<ClipBounds>(target).map(|bounds| bounds.0)
    }

    fn attach_clip_volume(&mut self, target: Entity, normal: Vec3, distance: f32) -> Entity {
        if let Ok(mut entity) = self.world.get_entity_mut(target) {
            entity.insert(ClipVolume { normal, distance });
        }
        target
    }

    fn set_clip_plane(&mut self, volume: &Entity, normal: Vec3, distance: f32) {
        if let Some(mut clip) = self.world.get_mut::<ClipVolume>(*volume) {
            clip.normal = normal;
            clip.distance = distance;
        }
    }

    fn detach_clip_volume(&mut self, volume: Entity) {
        if let Ok(mut entity) = self.world.get_entity_mut(volume) {
            entity.remove::<ClipVolume>();
        }
    }

    fn create_visual_plane(&mut self, desc: VisualPlaneDesc) -> Entity {
        if !self.world.contains_resource::<ClipPlaneAssets>() {
            self.world.init_resource::<ClipPlaneAssets>();
        }
        let assets = self.world.resource::<ClipPlaneAssets>().clone();
        let visual = VisualPlane {
            extent: desc.extent,
            normal: desc.normal,
            distance: desc.distance,
            center: desc.center,
        };
        let transform = visual.transform(self.visual_frame());
        self.world
            .spawn((
                Name::new("Clip Plane"),
                visual,
                Mesh3d(assets.mesh),
                MeshMaterial3d(assets.material),
                transform,
                Visibility::Inherited,
            ))
            .id()
    }

    fn set_plane_extent(&mut self, plane: Entity, extent: Vec2) {
        self.with_plane(plane, |visual| visual.extent = extent);
    }

    fn set_plane_fn(&mut self, plane: Entity, normal: Vec3, distance: f32) {
        self.with_plane(plane, |visual| {
            visual.normal = normal;
            visual.distance = distance;
        });
    }

    fn set_plane_visible(&mut self, plane: Entity, visible: bool) {
        if let Ok(mut entity) = self.world.get_entity_mut(plane) {
            entity.insert(if visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            });
        }
    }

    fn set_plane_position(&mut self, plane: Entity, position: Vec3) {
        self.with_plane(plane, |visual| visual.center = position);
    }

    fn remove_visual_plane(&mut self, plane: Entity) {
        if let Ok(entity) = self.world.get_entity_mut(plane) {
            entity.despawn();
        }
    }

    fn subscribe_pointer(&mut self) -> SubscriptionId {
        self.world
            .get_resource_or_init::<PointerSubscriptions>()
            .subscribe()
    }

    fn cancel_subscription(&mut self, subscription: SubscriptionId) {
        if let Some(mut subscriptions) = self.world.get_resource_mut::<PointerSubscriptions>() {
            subscriptions.cancel(subscription);
        }
    }

    fn pick(&mut self, screen_pos: Vec2) -> Option<Entity> {
        let ray = self.viewport_ray(screen_pos)?;
        self.cast_pick_ray(ray)
    }

    fn set_camera_rotation_enabled(&mut self, enabled: bool) {
        let mut cameras = self.world.query::<&mut OrbitCamera>();
        for mut orbit in cameras.iter_mut(self.world) {
            orbit.rotate_enabled = enabled;
        }
    }
}

pub mod bounds;
pub mod input;
pub mod scene;
pub mod settings;
pub mod visual;

use bevy::{prelude::*, transform::TransformSystems};
use tileclip_camera::OrbitCameraSystems;
use tileclip_core::{ClipDirection, ClipRejected, ClipSettings, ClippingPlaneController};

pub use bounds::{ClipBounds, ClipTarget};
pub use scene::{BevyHandles, ClipVolume, PointerSubscriptions, VisualPlane, WorldScene};
pub use settings::{ClipKeybinds, ClipStyle};

/// Camera used for picking the plane handle.
#[derive(Component, Default)]
pub struct ClipCamera;

/// The clip controller for this app.
#[derive(Resource, Deref, DerefMut)]
pub struct ClipController(pub ClippingPlaneController<BevyHandles>);

/// Host-side requests. Trigger with `commands.trigger(..)`; they are applied
/// with world access at the next command flush.
#[derive(Event, Clone, Debug)]
pub enum ClipRequest {
    /// Remember the target a later `SetActive { active: true, .. }` clips.
    BindTarget(Entity),
    Create {
        target: Entity,
        direction: ClipDirection,
    },
    SetActive {
        active: bool,
        direction: Option<ClipDirection>,
    },
    /// Uses the target the clip was created on.
    ChangeDirection(ClipDirection),
    Destroy,
}

#[derive(Default)]
pub struct ClippingPlanePlugin {
    pub settings: ClipSettings,
}

impl Plugin for ClippingPlanePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClipController(ClippingPlaneController::new(
            self.settings.clone(),
        )))
        .init_resource::<ClipStyle>()
        .init_resource::<ClipKeybinds>()
        .init_resource::<PointerSubscriptions>()
        .init_resource::<input::PointerTracker>()
        .init_gizmo_group::<visual::ClipGizmos>()
        .add_systems(
            Update,
            (
                bounds::update_clip_bounds,
                input::clip_shortcuts,
                input::forward_pointer_events.before(OrbitCameraSystems),
                visual::configure_clip_gizmos,
            ),
        )
        .add_systems(
            PostUpdate,
            (visual::sync_visual_planes, visual::draw_clip_outlines)
                .chain()
                .before(TransformSystems::Propagate),
        )
        .add_observer(handle_clip_request);
    }
}

fn handle_clip_request(request: On<ClipRequest>, mut commands: Commands) {
    let request = ClipRequest::clone(&request);
    commands.queue(move |world: &mut World| {
        if let Err(rejected) = apply_clip_request(world, request) {
            debug!("Clip request dropped: {rejected}");
        }
    });
}

/// Apply a request immediately. Usable from exclusive systems and tests.
pub fn apply_clip_request(world: &mut World, request: ClipRequest) -> Result<(), ClipRejected> {
    let now = world
        .get_resource::<Time<Real>>()
        .map(|time| time.elapsed())
        .unwrap_or_default();

    world.resource_scope(|world, mut controller: Mut<ClipController>| {
        let mut scene = WorldScene::new(world);
        match request {
            ClipRequest::BindTarget(target) => {
                controller.bind_target(target);
                Ok(())
            }
            ClipRequest::Create { target, direction } => {
                controller.create(&mut scene, target, direction)
            }
            ClipRequest::SetActive { active, direction } => {
                controller.set_active(&mut scene, active, direction, now)
            }
            ClipRequest::ChangeDirection(direction) => {
                let Some(target) = controller.target() else {
                    return Err(ClipRejected::NoClipVolume);
                };
                controller.change_direction(&mut scene, target, direction, now)
            }
            ClipRequest::Destroy => {
                controller.destroy(&mut scene);
                Ok(())
            }
        }
    })
}

//! Tileset viewer: loads a glTF model, frames it and attaches an interactive
//! clipping plane.
//!
//! Usage: `cargo run --example viewer -- [model.glb] [settings.json] [direction]`
//!
//! `direction` is a name such as `left_to_right`; unknown names cut top to bottom.
//!
//! - 1..6: top→bottom, bottom→top, left→right, right→left, front→back, back→front
//! - C: toggle the clip handle
//! - Drag the yellow plane to move the cut, hold Z to move faster

use anyhow::Context;
use bevy::{asset::LoadState, prelude::*};
use bevy_infinite_grid::{InfiniteGrid, InfiniteGridPlugin};
use tileclip::{ClipBounds, ClipCamera, ClipRequest, ClipTarget, ClippingPlanePlugin};
use tileclip_camera::{OrbitCamera, TileclipCameraPlugin};
use tileclip_core::{ClipDirection, ClipSettings};

#[derive(Resource)]
struct ModelSource {
    path: String,
    scene: Handle<Scene>,
}

/// Set once the model is framed and the clip is created.
#[derive(Resource, Default)]
struct ViewerState {
    framed: bool,
    load_failure_reported: bool,
}

fn main() -> AppExit {
    let mut args = std::env::args().skip(1);
    let model = args
        .next()
        .unwrap_or_else(|| "models/tileset.glb".to_string());
    // Logging is not up until the app runs, so a load failure is reported from `setup`.
    let (settings, settings_error) = match args.next().map(|path| load_settings(&path)) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(err)) => (ClipSettings::default(), Some(format!("{err:#}"))),
        None => (ClipSettings::default(), None),
    };
    let direction = args
        .next()
        .map(|name| ClipDirection::from_name_lossy(&name))
        .unwrap_or_default();

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((
            InfiniteGridPlugin,
            TileclipCameraPlugin,
            ClippingPlanePlugin { settings },
        ))
        .insert_resource(ClearColor(Color::srgb_u8(0x1e, 0x1e, 0x1e)))
        .insert_resource(ModelPath(model))
        .insert_resource(SettingsError(settings_error))
        .insert_resource(StartDirection(direction))
        .init_resource::<ViewerState>()
        .add_systems(Startup, setup)
        .add_systems(Update, (report_load_failure, frame_and_clip))
        .run()
}

#[derive(Resource)]
struct ModelPath(String);

#[derive(Resource)]
struct SettingsError(Option<String>);

#[derive(Resource)]
struct StartDirection(ClipDirection);

fn load_settings(path: &str) -> anyhow::Result<ClipSettings> {
    ClipSettings::load(path).with_context(|| format!("failed to load clip settings from {path}"))
}

fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    model: Res<ModelPath>,
    settings_error: Res<SettingsError>,
) {
    if let Some(err) = &settings_error.0 {
        warn!("{err}; using default clip settings");
    }

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        ClipCamera,
        OrbitCamera::default(),
        Transform::default(),
    ));
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((Name::new("Ground Grid"), InfiniteGrid));

    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.0.clone()));
    commands.spawn((
        Name::new("Tileset"),
        ClipTarget,
        SceneRoot(scene.clone()),
        Transform::default(),
    ));
    commands.insert_resource(ModelSource {
        path: model.0.clone(),
        scene,
    });

    info!("Keys 1-6 select the clip direction, C toggles the clip, hold Z to drag faster");
}

fn report_load_failure(
    asset_server: Res<AssetServer>,
    source: Res<ModelSource>,
    mut state: ResMut<ViewerState>,
) {
    if state.load_failure_reported {
        return;
    }
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(source.scene.id()) {
        warn!("Failed to load 3D model '{}': {err}", source.path);
        state.load_failure_reported = true;
    }
}

/// Once the model's bounds are known: frame the camera, drop the grid under
/// the model and activate a clip on it.
fn frame_and_clip(
    mut state: ResMut<ViewerState>,
    start: Res<StartDirection>,
    targets: Query<(Entity, &ClipBounds), With<ClipTarget>>,
    mut cameras: Query<&mut OrbitCamera>,
    mut grids: Query<&mut Transform, With<InfiniteGrid>>,
    mut commands: Commands,
) {
    if state.framed {
        return;
    }
    let Some((target, bounds)) = targets.iter().next() else {
        return;
    };
    let bounds = bounds.0;

    for mut orbit in &mut cameras {
        *orbit = OrbitCamera {
            rotate_enabled: orbit.rotate_enabled,
            ..OrbitCamera::framing(bounds.center, bounds.radius)
        };
    }
    for mut transform in &mut grids {
        transform.translation.y = bounds.center.y - bounds.radius;
    }

    commands.trigger(ClipRequest::BindTarget(target));
    commands.trigger(ClipRequest::SetActive {
        active: true,
        direction: Some(start.0),
    });
    state.framed = true;
    info!(
        "Clip attached to tileset ({}, radius {:.2})",
        start.0, bounds.radius
    );
}

use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};

pub struct TileclipCameraPlugin;

impl Plugin for TileclipCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, orbit_camera_system.in_set(OrbitCameraSystems));
    }
}

/// Systems that move orbit cameras. Order input that locks rotation before it.
#[derive(SystemSet, Clone, PartialEq, Eq, Hash, Debug)]
pub struct OrbitCameraSystems;

/// Orbit camera placed on the viewer camera entity.
///
/// Controls:
/// - Left-click + drag: orbit around `focus` (blocked while `rotate_enabled` is false)
/// - Middle-click + drag: pan the focus point
/// - Scroll wheel: zoom towards / away from `focus`
#[derive(Component)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Orbit sensitivity (radians per pixel).
    pub sensitivity: f32,
    /// Zoom step as a fraction of the current radius per scroll line.
    pub zoom_step: f32,
    /// Cleared while something else owns left-drag, e.g. a clip plane drag.
    pub rotate_enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: 10.0,
            yaw: 0.6,
            pitch: 0.5,
            sensitivity: 0.005,
            zoom_step: 0.1,
            rotate_enabled: true,
        }
    }
}

impl OrbitCamera {
    /// Frame a bounding sphere from the current yaw/pitch.
    pub fn framing(center: Vec3, radius: f32) -> Self {
        Self {
            focus: center,
            radius: (radius * 2.5).max(1.0),
            ..default()
        }
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let translation = self.focus + rotation * Vec3::new(0.0, 0.0, self.radius);
        Transform::from_translation(translation).looking_at(self.focus, Vec3::Y)
    }
}

fn orbit_camera_system(
    mouse: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let mut mouse_delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        mouse_delta += motion.delta;
    }
    let mut scroll = 0.0;
    for event in scroll_events.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };
    }

    for (mut orbit, mut transform) in &mut camera_query {
        if mouse.pressed(MouseButton::Left) && orbit.rotate_enabled && mouse_delta != Vec2::ZERO {
            orbit.yaw -= mouse_delta.x * orbit.sensitivity;
            orbit.pitch = (orbit.pitch + mouse_delta.y * orbit.sensitivity).clamp(
                -std::f32::consts::FRAC_PI_2 + 0.01,
                std::f32::consts::FRAC_PI_2 - 0.01,
            );
        }

        if mouse.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
            let right = transform.right().as_vec3();
            let up = transform.up().as_vec3();
            let pan_scale = orbit.radius * 0.002;
            orbit.focus += (-right * mouse_delta.x + up * mouse_delta.y) * pan_scale;
        }

        if scroll != 0.0 {
            let factor = (1.0 - scroll * orbit.zoom_step).clamp(0.5, 1.5);
            orbit.radius = (orbit.radius * factor).max(0.1);
        }

        *transform = orbit.transform();
    }
}

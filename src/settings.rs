use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

#[derive(Resource, Clone, Debug)]
pub struct ClipStyle {
    /// Fill of the plane handle.
    pub plane_color: Color,
    pub outline: bool,
    pub outline_color: Color,
    /// Outline of the cut itself, drawn on the clip plane.
    pub edge_color: Color,
    pub edge_width: f32,
    /// Maps the Z-up frame clip directions are defined in to Bevy's Y-up world.
    pub frame: Quat,
    /// Maps visual normals into the world. Those are expressed with x up,
    /// y east and z north, so this is `frame` after an axis cycle.
    pub visual_frame: Quat,
}

/// Up/east/north axes onto the east/north/up axes clip normals use.
fn up_east_north_to_enu() -> Quat {
    Quat::from_mat3(&Mat3::from_cols(Vec3::Z, Vec3::X, Vec3::Y))
}

impl Default for ClipStyle {
    fn default() -> Self {
        let frame = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        Self {
            plane_color: Color::srgba(1.0, 1.0, 0.0, 0.3),
            outline: true,
            outline_color: Color::srgb(1.0, 1.0, 0.0),
            edge_color: Color::srgb(1.0, 1.0, 0.0),
            edge_width: 2.0,
            frame,
            visual_frame: frame * up_east_north_to_enu(),
        }
    }
}

// ---------------------------------------------------------------------------
// Key bindings
// ---------------------------------------------------------------------------

#[derive(Resource, Clone, Debug)]
pub struct ClipKeybinds {
    /// Held to drag the plane five times faster.
    pub speed_modifier: KeyCode,
    pub toggle: KeyCode,
    /// One key per direction, in `ClipDirection::ALL` order.
    pub directions: [KeyCode; 6],
}

impl Default for ClipKeybinds {
    fn default() -> Self {
        Self {
            speed_modifier: KeyCode::KeyZ,
            toggle: KeyCode::KeyC,
            directions: [
                KeyCode::Digit1,
                KeyCode::Digit2,
                KeyCode::Digit3,
                KeyCode::Digit4,
                KeyCode::Digit5,
                KeyCode::Digit6,
            ],
        }
    }
}

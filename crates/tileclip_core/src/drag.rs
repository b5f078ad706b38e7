use bevy_math::Vec2;

use crate::{direction::ClipDirection, settings::ClipSettings};

/// Collapses a screen-space pointer delta onto the cut axis.
///
/// Vertical cuts follow the pointer's vertical motion only. Lateral and depth
/// cuts combine both screen axes so the drag follows the diagonal the axis
/// takes on screen from the default viewing angle.
pub fn directional_magnitude(direction: ClipDirection, delta: Vec2) -> f32 {
    match direction {
        ClipDirection::TopToBottom | ClipDirection::BottomToTop => delta.y,
        ClipDirection::LeftToRight | ClipDirection::FrontToBack => delta.x + delta.y,
        ClipDirection::RightToLeft | ClipDirection::BackToFront => -(delta.x + delta.y),
    }
}

/// Signed distance change for one pointer-move event.
pub fn drag_delta(
    direction: ClipDirection,
    delta: Vec2,
    speed_modifier: bool,
    settings: &ClipSettings,
) -> f32 {
    let boost = if speed_modifier {
        settings.boost_multiplier
    } else {
        1.0
    };
    directional_magnitude(direction, delta)
        * settings.base_speed
        * boost
        * direction.axis_multiplier()
}

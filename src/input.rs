use bevy::{prelude::*, window::PrimaryWindow};
use tileclip_core::ClipDirection;

use crate::{
    scene::{PointerSubscriptions, WorldScene},
    settings::ClipKeybinds,
    ClipController, ClipRequest,
};

/// Cursor position seen on the previous frame, for per-frame move deltas.
#[derive(Resource, Default)]
pub struct PointerTracker {
    pub last_cursor: Option<Vec2>,
}

/// Forward primary-window pointer press/move/release to the clip controller.
///
/// Runs as an exclusive system because picking and plane updates go through
/// [`WorldScene`].
pub(crate) fn forward_pointer_events(world: &mut World) {
    let keybinds = world.resource::<ClipKeybinds>().clone();
    let modifier_held = world
        .resource::<ButtonInput<KeyCode>>()
        .pressed(keybinds.speed_modifier);
    let mouse = world.resource::<ButtonInput<MouseButton>>();
    let pressed = mouse.just_pressed(MouseButton::Left);
    let released = mouse.just_released(MouseButton::Left);

    let cursor = world
        .query_filtered::<&Window, With<PrimaryWindow>>()
        .single(world)
        .ok()
        .and_then(|window| window.cursor_position());

    let mut tracker = world.resource_mut::<PointerTracker>();
    let delta = match (tracker.last_cursor, cursor) {
        (Some(last), Some(now)) => now - last,
        _ => Vec2::ZERO,
    };
    tracker.last_cursor = cursor;

    let listening = world.resource::<PointerSubscriptions>().is_listening();

    world.resource_scope(|world, mut controller: Mut<ClipController>| {
        if controller.state().speed_modifier != modifier_held {
            controller.set_speed_modifier(modifier_held);
        }
        if !listening {
            return;
        }

        let mut scene = WorldScene::new(world);
        if pressed && let Some(cursor) = cursor {
            controller.pointer_down(&mut scene, cursor);
        }
        if delta != Vec2::ZERO && controller.is_dragging() {
            controller.pointer_move(&mut scene, delta);
        }
        if released {
            controller.pointer_up(&mut scene);
        }
    });
}

/// Toggle key and per-direction keys, standing in for a direction dropdown.
pub(crate) fn clip_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybinds: Res<ClipKeybinds>,
    controller: Res<ClipController>,
    mut commands: Commands,
) {
    if keyboard.just_pressed(keybinds.toggle) {
        commands.trigger(ClipRequest::SetActive {
            active: !controller.is_active(),
            direction: None,
        });
    }
    for (key, direction) in keybinds.directions.iter().zip(ClipDirection::ALL) {
        if keyboard.just_pressed(*key) {
            commands.trigger(ClipRequest::ChangeDirection(direction));
        }
    }
}

use bevy::prelude::*;

use crate::{
    bounds::ClipBounds,
    scene::{ClipVolume, VisualPlane},
    settings::ClipStyle,
};

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ClipGizmos;

pub(crate) fn configure_clip_gizmos(mut config_store: ResMut<GizmoConfigStore>, style: Res<ClipStyle>) {
    if !style.is_changed() {
        return;
    }
    let (config, _) = config_store.config_mut::<ClipGizmos>();
    config.line.width = style.edge_width;
}

/// Keep plane handle transforms in step with their plane function.
pub(crate) fn sync_visual_planes(
    style: Res<ClipStyle>,
    mut planes: Query<(Ref<VisualPlane>, &mut Transform)>,
) {
    for (visual, mut transform) in &mut planes {
        if visual.is_changed() || style.is_changed() {
            *transform = visual.transform(style.visual_frame);
        }
    }
}

/// Outline the plane handle and the cut it produces on each clipped target.
pub(crate) fn draw_clip_outlines(
    style: Res<ClipStyle>,
    planes: Query<(&VisualPlane, &Visibility)>,
    volumes: Query<(&ClipVolume, &ClipBounds)>,
    mut gizmos: Gizmos<ClipGizmos>,
) {
    if style.outline {
        for (visual, visibility) in &planes {
            if *visibility == Visibility::Hidden {
                continue;
            }
            let transform = visual.transform(style.visual_frame);
            let corners = rect_corners(transform.translation, transform.rotation, visual.extent);
            draw_loop(&mut gizmos, corners, style.outline_color);
        }
    }

    for (volume, bounds) in &volumes {
        let normal = volume.world_normal(style.frame);
        let center = bounds.0.center - normal * volume.distance;
        let size = Vec2::splat(bounds.0.radius * 2.0);
        let corners = rect_corners(center, Quat::from_rotation_arc(Vec3::Y, normal), size);
        draw_loop(&mut gizmos, corners, style.edge_color);
    }
}

/// Corners of a `size` rectangle lying in the local XZ plane.
fn rect_corners(center: Vec3, rotation: Quat, size: Vec2) -> [Vec3; 4] {
    let half = size * 0.5;
    [
        center + rotation * Vec3::new(-half.x, 0.0, -half.y),
        center + rotation * Vec3::new(half.x, 0.0, -half.y),
        center + rotation * Vec3::new(half.x, 0.0, half.y),
        center + rotation * Vec3::new(-half.x, 0.0, half.y),
    ]
}

fn draw_loop(gizmos: &mut Gizmos<ClipGizmos>, corners: [Vec3; 4], color: Color) {
    for i in 0..corners.len() {
        gizmos.line(corners[i], corners[(i + 1) % corners.len()], color);
    }
}

use bevy::{camera::primitives::Aabb, prelude::*};
use tileclip_core::BoundingVolume;

/// Marks the model a clip can be attached to, usually a glTF scene root.
#[derive(Component, Default)]
pub struct ClipTarget;

/// World-space bounding sphere of a [`ClipTarget`] and all of its meshes.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ClipBounds(pub BoundingVolume);

/// Recompute target bounds from the `Aabb`s of the target and its descendants.
/// Targets without any mesh yet (scene still loading) get no bounds.
pub(crate) fn update_clip_bounds(
    mut commands: Commands,
    targets: Query<(Entity, Option<&ClipBounds>), With<ClipTarget>>,
    children_query: Query<&Children>,
    aabb_query: Query<(&Aabb, &GlobalTransform)>,
) {
    for (target, current) in &targets {
        let corners = std::iter::once(target)
            .chain(children_query.iter_descendants(target))
            .filter_map(|entity| aabb_query.get(entity).ok())
            .flat_map(|(aabb, global_tf)| world_corners(aabb, global_tf));

        let Some(bounds) = sphere_enclosing(corners) else {
            continue;
        };
        if current.map(|c| c.0) != Some(bounds) {
            commands.entity(target).insert(ClipBounds(bounds));
        }
    }
}

fn world_corners(aabb: &Aabb, global_tf: &GlobalTransform) -> [Vec3; 8] {
    let center = Vec3::from(aabb.center);
    let half = Vec3::from(aabb.half_extents);
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sign = Vec3::new(
            if i & 1 == 0 { -1.0 } else { 1.0 },
            if i & 2 == 0 { -1.0 } else { 1.0 },
            if i & 4 == 0 { -1.0 } else { 1.0 },
        );
        *corner = global_tf.transform_point(center + half * sign);
    }
    corners
}

/// Sphere around the axis-aligned box of `points`.
pub fn sphere_enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<BoundingVolume> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Some(BoundingVolume::new((min + max) * 0.5, (max - min).length() * 0.5))
}

use std::time::Duration;

use bevy_math::{Vec2, Vec3};
use tracing::{debug, info};

use crate::{
    direction::ClipDirection,
    drag::drag_delta,
    error::ClipRejected,
    extent::BoundingVolume,
    scene::{ClipScene, SceneHandles, VisualPlaneDesc},
    settings::ClipSettings,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Active,
    Inactive,
    Destroyed,
}

/// Mutable clip state. `distance` is the single source of truth for where
/// the cut sits; the scene's clip volume and visual plane mirror it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipState {
    pub direction: ClipDirection,
    pub distance: f32,
    pub lifecycle: Lifecycle,
    pub dragging: bool,
    pub speed_modifier: bool,
    /// Host-clock time of the last accepted toggle.
    pub last_toggle: Option<Duration>,
}

/// Snapshot of what the render step needs to draw the plane handle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VisualPlaneState {
    pub clip_normal: Vec3,
    pub visual_normal: Vec3,
    pub distance: f32,
    pub extent: Vec2,
    pub visible: bool,
}

/// Owns one clip: its volume on the target, the draggable plane handle and
/// the pointer subscription that drives it.
///
/// Every operation takes the scene explicitly. Times are host-clock offsets
/// (for example time since startup) and only need to be monotonic.
pub struct ClippingPlaneController<H: SceneHandles> {
    settings: ClipSettings,
    state: ClipState,
    target: Option<H::Target>,
    volume: Option<H::Volume>,
    plane: Option<H::Entity>,
    plane_extent: Vec2,
    subscription: Option<H::Subscription>,
    revision: u64,
}

impl<H: SceneHandles> Default for ClippingPlaneController<H> {
    fn default() -> Self {
        Self::new(ClipSettings::default())
    }
}

impl<H: SceneHandles> ClippingPlaneController<H> {
    pub fn new(settings: ClipSettings) -> Self {
        Self {
            settings,
            state: ClipState::default(),
            target: None,
            volume: None,
            plane: None,
            plane_extent: Vec2::ZERO,
            subscription: None,
            revision: 0,
        }
    }

    pub fn settings(&self) -> &ClipSettings {
        &self.settings
    }

    pub fn state(&self) -> &ClipState {
        &self.state
    }

    pub fn direction(&self) -> ClipDirection {
        self.state.direction
    }

    pub fn distance(&self) -> f32 {
        self.state.distance
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.state.lifecycle == Lifecycle::Active
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// Whether a clip volume and plane handle currently exist.
    pub fn exists(&self) -> bool {
        self.volume.is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn target(&self) -> Option<H::Target> {
        self.target
    }

    pub fn plane(&self) -> Option<H::Entity> {
        self.plane
    }

    /// Bumped on every observable change, so hosts can poll instead of diffing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn visual_plane(&self) -> Option<VisualPlaneState> {
        self.plane?;
        let direction = self.state.direction;
        Some(VisualPlaneState {
            clip_normal: direction.clip_normal(),
            visual_normal: direction.visual_normal(),
            distance: self.state.distance,
            extent: self.plane_extent,
            visible: self.is_active(),
        })
    }

    /// Remember the target later `set_active(true)` calls should clip.
    pub fn bind_target(&mut self, target: H::Target) {
        self.target = Some(target);
    }

    pub fn create(
        &mut self,
        scene: &mut impl ClipScene<H>,
        target: H::Target,
        direction: ClipDirection,
    ) -> Result<(), ClipRejected> {
        if self.volume.is_some() {
            return Err(ClipRejected::AlreadyCreated);
        }
        let bounds = scene
            .bounding_volume(target)
            .ok_or(ClipRejected::MissingBounds)?;

        self.state.direction = direction;
        self.target = Some(target);
        self.build_clip(scene, target, bounds);
        self.state.lifecycle = Lifecycle::Active;
        info!("Clip created on {target:?} ({direction})");
        Ok(())
    }

    /// Toggle between active and inactive, rate-limited by the cooldown.
    ///
    /// Activating an uninitialized controller with a bound target creates the
    /// clip. Deactivating hides the handle and stops input but leaves the cut
    /// on the target.
    pub fn set_active(
        &mut self,
        scene: &mut impl ClipScene<H>,
        active: bool,
        direction: Option<ClipDirection>,
        now: Duration,
    ) -> Result<(), ClipRejected> {
        if self.state.lifecycle == Lifecycle::Destroyed {
            return Err(ClipRejected::Destroyed);
        }
        if let Some(last) = self.state.last_toggle {
            let elapsed = now.saturating_sub(last);
            let cooldown = self.settings.toggle_cooldown();
            if elapsed < cooldown {
                return Err(ClipRejected::CoolingDown {
                    remaining: cooldown - elapsed,
                });
            }
        }
        if active == self.is_active() {
            return Err(ClipRejected::Unchanged);
        }

        if active {
            self.activate(scene, direction)?;
        } else {
            self.deactivate(scene);
        }
        self.state.last_toggle = Some(now);
        debug!("Clip toggled to {:?}", self.state.lifecycle);
        Ok(())
    }

    /// Switch the cutting direction, re-deriving all geometry from the
    /// target's current bounds. An inactive clip is activated first, ignoring
    /// the toggle cooldown.
    pub fn change_direction(
        &mut self,
        scene: &mut impl ClipScene<H>,
        target: H::Target,
        direction: ClipDirection,
        now: Duration,
    ) -> Result<(), ClipRejected> {
        let Some(plane) = self.plane else {
            return Err(ClipRejected::NoClipVolume);
        };
        if self.volume.is_none() {
            return Err(ClipRejected::NoClipVolume);
        }
        let bounds = scene
            .bounding_volume(target)
            .ok_or(ClipRejected::MissingBounds)?;

        if self.target != Some(target) {
            self.retarget(scene, target);
        }
        if self.state.lifecycle == Lifecycle::Inactive {
            scene.set_plane_visible(plane, true);
            self.state.lifecycle = Lifecycle::Active;
            self.state.last_toggle = Some(now);
        }

        self.state.direction = direction;
        self.apply_geometry(scene, bounds);
        self.resubscribe(scene);
        debug!("Clip direction changed to {direction}");
        Ok(())
    }

    /// Tear everything down. Safe to call repeatedly.
    pub fn destroy(&mut self, scene: &mut impl ClipScene<H>) {
        if let Some(subscription) = self.subscription.take() {
            scene.cancel_subscription(subscription);
        }
        self.end_drag(scene);
        if let Some(plane) = self.plane.take() {
            scene.remove_visual_plane(plane);
        }
        if let Some(volume) = self.volume.take() {
            scene.detach_clip_volume(volume);
        }
        self.target = None;
        self.plane_extent = Vec2::ZERO;

        if self.state.lifecycle != Lifecycle::Destroyed {
            info!("Clip destroyed");
            self.state = ClipState {
                lifecycle: Lifecycle::Destroyed,
                last_toggle: self.state.last_toggle,
                ..ClipState::default()
            };
            self.touch();
        }
    }

    pub fn set_speed_modifier(&mut self, held: bool) {
        self.state.speed_modifier = held;
    }

    /// Pointer pressed. Starts a drag when the press lands on the plane handle.
    pub fn pointer_down(&mut self, scene: &mut impl ClipScene<H>, screen_pos: Vec2) -> bool {
        if self.subscription.is_none() || !self.is_active() {
            return false;
        }
        let Some(plane) = self.plane else {
            return false;
        };
        if scene.pick(screen_pos) != Some(plane) {
            return false;
        }
        self.state.dragging = true;
        scene.set_camera_rotation_enabled(false);
        self.touch();
        true
    }

    /// Pointer moved by `delta` pixels since the previous move event.
    /// Returns the new distance when a drag is in progress.
    pub fn pointer_move(&mut self, scene: &mut impl ClipScene<H>, delta: Vec2) -> Option<f32> {
        if !self.state.dragging {
            return None;
        }
        let (Some(volume), Some(plane)) = (&self.volume, self.plane) else {
            return None;
        };

        let direction = self.state.direction;
        let step = drag_delta(direction, delta, self.state.speed_modifier, &self.settings);
        self.state.distance = self.settings.clamp_distance(self.state.distance + step);

        scene.set_clip_plane(volume, direction.clip_normal(), self.state.distance);
        scene.set_plane_fn(plane, direction.visual_normal(), self.state.distance);
        self.touch();
        Some(self.state.distance)
    }

    /// Pointer released. Always ends the drag while handlers are installed.
    pub fn pointer_up(&mut self, scene: &mut impl ClipScene<H>) {
        if self.subscription.is_none() {
            return;
        }
        let was_dragging = self.state.dragging;
        self.state.dragging = false;
        scene.set_camera_rotation_enabled(true);
        if was_dragging {
            self.touch();
        }
    }

    fn activate(
        &mut self,
        scene: &mut impl ClipScene<H>,
        direction: Option<ClipDirection>,
    ) -> Result<(), ClipRejected> {
        let target = self.target.ok_or(ClipRejected::NoTarget)?;
        let bounds = scene
            .bounding_volume(target)
            .ok_or(ClipRejected::MissingBounds)?;

        if let Some(direction) = direction {
            self.state.direction = direction;
        }

        match self.plane {
            Some(plane) if self.volume.is_some() => {
                scene.set_plane_visible(plane, true);
                self.apply_geometry(scene, bounds);
            }
            _ => self.build_clip(scene, target, bounds),
        }

        if self.subscription.is_none() {
            self.subscription = Some(scene.subscribe_pointer());
        }
        self.state.lifecycle = Lifecycle::Active;
        self.touch();
        Ok(())
    }

    fn deactivate(&mut self, scene: &mut impl ClipScene<H>) {
        self.state.lifecycle = Lifecycle::Inactive;
        self.end_drag(scene);
        if let Some(plane) = self.plane {
            scene.set_plane_visible(plane, false);
        }
        if let Some(subscription) = self.subscription.take() {
            scene.cancel_subscription(subscription);
        }
        self.touch();
    }

    fn build_clip(
        &mut self,
        scene: &mut impl ClipScene<H>,
        target: H::Target,
        bounds: BoundingVolume,
    ) {
        let direction = self.state.direction;
        let extent = bounds.extent();
        self.state.distance = self
            .settings
            .clamp_distance(direction.initial_offset(&extent, self.settings.offset_fraction));
        self.plane_extent = direction.visual_extent(&extent);

        self.volume = Some(scene.attach_clip_volume(
            target,
            direction.clip_normal(),
            self.state.distance,
        ));
        self.plane = Some(scene.create_visual_plane(VisualPlaneDesc {
            extent: self.plane_extent,
            normal: direction.visual_normal(),
            distance: self.state.distance,
            center: bounds.center,
        }));
        self.resubscribe(scene);
        self.touch();
    }

    /// Push direction-derived geometry and a fresh starting distance to both
    /// the clip volume and the plane handle.
    fn apply_geometry(&mut self, scene: &mut impl ClipScene<H>, bounds: BoundingVolume) {
        let (Some(volume), Some(plane)) = (&self.volume, self.plane) else {
            return;
        };
        let direction = self.state.direction;
        let extent = bounds.extent();
        self.state.distance = self
            .settings
            .clamp_distance(direction.initial_offset(&extent, self.settings.offset_fraction));
        self.plane_extent = direction.visual_extent(&extent);

        scene.set_clip_plane(volume, direction.clip_normal(), self.state.distance);
        scene.set_plane_extent(plane, self.plane_extent);
        scene.set_plane_fn(plane, direction.visual_normal(), self.state.distance);
        scene.set_plane_position(plane, bounds.center);
        self.touch();
    }

    fn retarget(&mut self, scene: &mut impl ClipScene<H>, target: H::Target) {
        if let Some(volume) = self.volume.take() {
            scene.detach_clip_volume(volume);
            let direction = self.state.direction;
            self.volume = Some(scene.attach_clip_volume(
                target,
                direction.clip_normal(),
                self.state.distance,
            ));
        }
        self.target = Some(target);
    }

    fn resubscribe(&mut self, scene: &mut impl ClipScene<H>) {
        if let Some(subscription) = self.subscription.take() {
            scene.cancel_subscription(subscription);
        }
        self.end_drag(scene);
        self.subscription = Some(scene.subscribe_pointer());
    }

    fn end_drag(&mut self, scene: &mut impl ClipScene<H>) {
        if self.state.dragging {
            self.state.dragging = false;
            scene.set_camera_rotation_enabled(true);
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    struct TestHandles;

    impl SceneHandles for TestHandles {
        type Target = u32;
        type Volume = u32;
        type Entity = u32;
        type Subscription = u32;
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct FakeVolume {
        target: u32,
        normal: Vec3,
        distance: f32,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct FakePlane {
        extent: Vec2,
        normal: Vec3,
        distance: f32,
        position: Vec3,
        visible: bool,
    }

    /// Scene double that keeps what the controller pushed into it.
    struct FakeScene {
        bounds: HashMap<u32, BoundingVolume>,
        volumes: HashMap<u32, FakeVolume>,
        planes: HashMap<u32, FakePlane>,
        subscriptions: HashSet<u32>,
        hovered: Option<u32>,
        camera_rotation: bool,
        next_id: u32,
    }

    impl FakeScene {
        fn with_target(target: u32, radius: f32) -> Self {
            let mut bounds = HashMap::new();
            bounds.insert(target, BoundingVolume::new(Vec3::new(1.0, 2.0, 3.0), radius));
            Self {
                bounds,
                volumes: HashMap::new(),
                planes: HashMap::new(),
                subscriptions: HashSet::new(),
                hovered: None,
                camera_rotation: true,
                next_id: 100,
            }
        }

        fn id(&mut self) -> u32 {
            self.next_id += 1;
            self.next_id
        }

        fn only_plane(&self) -> (u32, FakePlane) {
            assert_eq!(self.planes.len(), 1);
            let (id, plane) = self.planes.iter().next().unwrap();
            (*id, *plane)
        }

        fn only_volume(&self) -> FakeVolume {
            assert_eq!(self.volumes.len(), 1);
            *self.volumes.values().next().unwrap()
        }

        fn hover_plane(&mut self) {
            self.hovered = Some(self.only_plane().0);
        }
    }

    impl ClipScene<TestHandles> for FakeScene {
        fn bounding_volume(&self, target: u32) -> Option<BoundingVolume> {
            self.bounds.get(&target).copied()
        }

        fn attach_clip_volume(&mut self, target: u32, normal: Vec3, distance: f32) -> u32 {
            let id = self.id();
            self.volumes.insert(
                id,
                FakeVolume {
                    target,
                    normal,
                    distance,
                },
            );
            id
        }

        fn set_clip_plane(&mut self, volume: &u32, normal: Vec3, distance: f32) {
            let volume = self.volumes.get_mut(volume).unwrap();
            volume.normal = normal;
            volume.distance = distance;
        }

        fn detach_clip_volume(&mut self, volume: u32) {
            self.volumes.remove(&volume).unwrap();
        }

        fn create_visual_plane(&mut self, desc: VisualPlaneDesc) -> u32 {
            let id = self.id();
            self.planes.insert(
                id,
                FakePlane {
                    extent: desc.extent,
                    normal: desc.normal,
                    distance: desc.distance,
                    position: desc.center,
                    visible: true,
                },
            );
            id
        }

        fn set_plane_extent(&mut self, plane: u32, extent: Vec2) {
            self.planes.get_mut(&plane).unwrap().extent = extent;
        }

        fn set_plane_fn(&mut self, plane: u32, normal: Vec3, distance: f32) {
            let plane = self.planes.get_mut(&plane).unwrap();
            plane.normal = normal;
            plane.distance = distance;
        }

        fn set_plane_visible(&mut self, plane: u32, visible: bool) {
            self.planes.get_mut(&plane).unwrap().visible = visible;
        }

        fn set_plane_position(&mut self, plane: u32, position: Vec3) {
            self.planes.get_mut(&plane).unwrap().position = position;
        }

        fn remove_visual_plane(&mut self, plane: u32) {
            self.planes.remove(&plane).unwrap();
        }

        fn subscribe_pointer(&mut self) -> u32 {
            let id = self.id();
            self.subscriptions.insert(id);
            id
        }

        fn cancel_subscription(&mut self, subscription: u32) {
            assert!(self.subscriptions.remove(&subscription));
        }

        fn pick(&mut self, _screen_pos: Vec2) -> Option<u32> {
            self.hovered
        }

        fn set_camera_rotation_enabled(&mut self, enabled: bool) {
            self.camera_rotation = enabled;
        }
    }

    const TARGET: u32 = 7;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn created(direction: ClipDirection) -> (ClippingPlaneController<TestHandles>, FakeScene) {
        let mut scene = FakeScene::with_target(TARGET, 10.0);
        let mut clip = ClippingPlaneController::default();
        clip.create(&mut scene, TARGET, direction).unwrap();
        (clip, scene)
    }

    fn assert_in_sync(clip: &ClippingPlaneController<TestHandles>, scene: &FakeScene) {
        let volume = scene.only_volume();
        let (_, plane) = scene.only_plane();
        assert_eq!(volume.distance, clip.distance());
        assert_eq!(plane.distance, clip.distance());
        assert_eq!(volume.normal, clip.direction().clip_normal());
        assert_eq!(plane.normal, clip.direction().visual_normal());
    }

    #[test]
    fn create_derives_geometry_from_bounds() {
        let (clip, scene) = created(ClipDirection::TopToBottom);

        assert_eq!(clip.lifecycle(), Lifecycle::Active);
        assert!(clip.exists());
        assert!(close(clip.distance(), 6.0));

        let volume = scene.only_volume();
        assert_eq!(volume.target, TARGET);
        assert_eq!(volume.normal, Vec3::new(0.0, 0.0, -1.0));

        let (id, plane) = scene.only_plane();
        assert_eq!(clip.plane(), Some(id));
        assert_eq!(plane.extent, Vec2::new(20.0, 20.0));
        assert_eq!(plane.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(plane.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(plane.visible);
        assert_eq!(scene.subscriptions.len(), 1);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn create_without_bounds_does_nothing() {
        let mut scene = FakeScene::with_target(TARGET, 10.0);
        let mut clip = ClippingPlaneController::<TestHandles>::default();

        let result = clip.create(&mut scene, 99, ClipDirection::LeftToRight);

        assert_eq!(result, Err(ClipRejected::MissingBounds));
        assert_eq!(clip.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(clip.direction(), ClipDirection::TopToBottom);
        assert!(scene.volumes.is_empty() && scene.planes.is_empty());
    }

    #[test]
    fn second_create_is_rejected() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        let result = clip.create(&mut scene, TARGET, ClipDirection::FrontToBack);

        assert_eq!(result, Err(ClipRejected::AlreadyCreated));
        assert_eq!(clip.direction(), ClipDirection::TopToBottom);
        assert_eq!(scene.volumes.len(), 1);
        assert_eq!(scene.planes.len(), 1);
    }

    #[test]
    fn first_activation_creates_the_clip() {
        let mut scene = FakeScene::with_target(TARGET, 5.0);
        let mut clip = ClippingPlaneController::<TestHandles>::default();
        clip.bind_target(TARGET);

        clip.set_active(&mut scene, true, Some(ClipDirection::FrontToBack), ms(0))
            .unwrap();

        assert!(clip.is_active());
        assert_eq!(clip.direction(), ClipDirection::FrontToBack);
        assert!(close(clip.distance(), 3.0));
        assert_eq!(scene.subscriptions.len(), 1);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn activation_without_target_is_dropped() {
        let mut scene = FakeScene::with_target(TARGET, 5.0);
        let mut clip = ClippingPlaneController::<TestHandles>::default();

        let result = clip.set_active(&mut scene, true, None, ms(0));

        assert_eq!(result, Err(ClipRejected::NoTarget));
        assert_eq!(clip.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(clip.state().last_toggle, None);
    }

    #[test]
    fn activating_twice_within_cooldown_has_no_effect() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        clip.set_active(&mut scene, false, None, ms(1_000)).unwrap();
        clip.set_active(&mut scene, true, None, ms(2_000)).unwrap();
        let before = clip.state().clone();

        let result = clip.set_active(&mut scene, true, None, ms(2_100));

        assert!(matches!(result, Err(ClipRejected::CoolingDown { .. })));
        assert_eq!(clip.state(), &before);
    }

    #[test]
    fn toggle_inside_cooldown_is_dropped() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        clip.set_active(&mut scene, false, None, ms(1_000)).unwrap();

        let result = clip.set_active(
            &mut scene,
            true,
            Some(ClipDirection::LeftToRight),
            ms(1_299),
        );
        assert_eq!(
            result,
            Err(ClipRejected::CoolingDown {
                remaining: ms(1)
            })
        );
        assert_eq!(clip.lifecycle(), Lifecycle::Inactive);
        assert_eq!(clip.direction(), ClipDirection::TopToBottom);

        clip.set_active(&mut scene, true, None, ms(1_300)).unwrap();
        assert!(clip.is_active());
        assert_eq!(clip.direction(), ClipDirection::TopToBottom);
    }

    #[test]
    fn same_state_request_does_not_start_cooldown() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);

        assert_eq!(
            clip.set_active(&mut scene, true, None, ms(500)),
            Err(ClipRejected::Unchanged)
        );
        clip.set_active(&mut scene, false, None, ms(600)).unwrap();
        assert_eq!(clip.lifecycle(), Lifecycle::Inactive);
    }

    #[test]
    fn deactivation_hides_handle_but_keeps_the_cut() {
        let (mut clip, mut scene) = created(ClipDirection::LeftToRight);

        clip.set_active(&mut scene, false, None, ms(0)).unwrap();

        assert_eq!(clip.lifecycle(), Lifecycle::Inactive);
        assert!(!clip.is_subscribed());
        assert!(scene.subscriptions.is_empty());
        assert!(!scene.only_plane().1.visible);
        assert_eq!(scene.only_volume().target, TARGET);
        assert_eq!(clip.visual_plane().map(|p| p.visible), Some(false));
    }

    #[test]
    fn reactivation_follows_resized_target() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);
        clip.pointer_move(&mut scene, Vec2::new(0.0, 50.0));
        clip.pointer_up(&mut scene);
        clip.set_active(&mut scene, false, None, ms(0)).unwrap();

        scene.bounds.get_mut(&TARGET).unwrap().radius = 20.0;
        clip.set_active(&mut scene, true, None, ms(400)).unwrap();

        assert!(close(clip.distance(), 12.0));
        assert!(scene.only_plane().1.visible);
        assert_eq!(scene.only_plane().1.extent, Vec2::new(40.0, 40.0));
        assert_eq!(scene.subscriptions.len(), 1);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn activation_can_switch_direction() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        clip.set_active(&mut scene, false, None, ms(0)).unwrap();

        clip.set_active(&mut scene, true, Some(ClipDirection::BackToFront), ms(300))
            .unwrap();

        assert_eq!(clip.direction(), ClipDirection::BackToFront);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn change_direction_while_inactive_activates() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        clip.set_active(&mut scene, false, None, ms(1_000)).unwrap();

        clip.change_direction(&mut scene, TARGET, ClipDirection::RightToLeft, ms(1_050))
            .unwrap();

        assert_eq!(clip.lifecycle(), Lifecycle::Active);
        assert!(close(clip.distance(), 0.3 * 20.0));
        assert!(scene.only_plane().1.visible);
        assert_eq!(scene.only_plane().1.extent, Vec2::new(20.0, 20.0));
        assert_eq!(scene.subscriptions.len(), 1);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn change_direction_without_clip_is_dropped() {
        let mut scene = FakeScene::with_target(TARGET, 10.0);
        let mut clip = ClippingPlaneController::<TestHandles>::default();

        let result = clip.change_direction(&mut scene, TARGET, ClipDirection::FrontToBack, ms(0));

        assert_eq!(result, Err(ClipRejected::NoClipVolume));
        assert_eq!(clip.direction(), ClipDirection::TopToBottom);
        assert!(scene.subscriptions.is_empty());
    }

    #[test]
    fn change_direction_replaces_subscription_and_ends_drag() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hover_plane();
        assert!(clip.pointer_down(&mut scene, Vec2::ZERO));

        clip.change_direction(&mut scene, TARGET, ClipDirection::LeftToRight, ms(0))
            .unwrap();

        assert!(!clip.is_dragging());
        assert!(scene.camera_rotation);
        assert_eq!(scene.subscriptions.len(), 1);
    }

    #[test]
    fn change_direction_to_new_target_moves_the_volume() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene
            .bounds
            .insert(8, BoundingVolume::new(Vec3::ZERO, 1.0));

        clip.change_direction(&mut scene, 8, ClipDirection::TopToBottom, ms(0))
            .unwrap();

        assert_eq!(clip.target(), Some(8));
        assert_eq!(scene.only_volume().target, 8);
        assert!(close(clip.distance(), 0.6));
        assert_eq!(scene.only_plane().1.position, Vec3::ZERO);
    }

    #[test]
    fn direction_round_trip_matches_fresh_create() {
        let (mut clip, mut scene) = created(ClipDirection::FrontToBack);
        for direction in [
            ClipDirection::BottomToTop,
            ClipDirection::FrontToBack,
        ] {
            clip.change_direction(&mut scene, TARGET, direction, ms(0))
                .unwrap();
        }

        let (fresh, fresh_scene) = created(ClipDirection::FrontToBack);
        assert_eq!(clip.distance(), fresh.distance());
        assert_eq!(clip.visual_plane(), fresh.visual_plane());
        let strip = |v: FakeVolume| (v.normal, v.distance);
        assert_eq!(strip(scene.only_volume()), strip(fresh_scene.only_volume()));
        assert_eq!(scene.only_plane().1, fresh_scene.only_plane().1);
    }

    #[test]
    fn horizontal_drag_left_to_right() {
        let (mut clip, mut scene) = created(ClipDirection::LeftToRight);
        let start = clip.distance();
        scene.hover_plane();

        assert!(clip.pointer_down(&mut scene, Vec2::new(300.0, 200.0)));
        let distance = clip.pointer_move(&mut scene, Vec2::new(10.0, 0.0));

        assert!(close(distance.unwrap() - start, -0.4));
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn vertical_pair_drags_in_opposite_directions() {
        let mut changes = Vec::new();
        for direction in [ClipDirection::TopToBottom, ClipDirection::BottomToTop] {
            let (mut clip, mut scene) = created(direction);
            let start = clip.distance();
            scene.hover_plane();
            clip.pointer_down(&mut scene, Vec2::ZERO);
            clip.pointer_move(&mut scene, Vec2::new(4.0, 15.0));
            changes.push(clip.distance() - start);
        }
        assert!(changes[0] < 0.0);
        assert!(close(changes[0], -changes[1]));
    }

    #[test]
    fn speed_modifier_boosts_drag() {
        let (mut clip, mut scene) = created(ClipDirection::FrontToBack);
        let start = clip.distance();
        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);
        clip.set_speed_modifier(true);

        clip.pointer_move(&mut scene, Vec2::new(1.0, 1.0));

        assert!(close(clip.distance() - start, 2.0 * 0.04 * 5.0));
    }

    #[test]
    fn drag_respects_distance_limit() {
        let mut scene = FakeScene::with_target(TARGET, 10.0);
        let mut clip = ClippingPlaneController::<TestHandles>::new(ClipSettings {
            distance_limit: Some(8.0),
            ..ClipSettings::default()
        });
        clip.create(&mut scene, TARGET, ClipDirection::BottomToTop)
            .unwrap();
        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);

        clip.pointer_move(&mut scene, Vec2::new(0.0, 1_000.0));

        assert_eq!(clip.distance(), 8.0);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn press_off_the_handle_does_not_drag() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hovered = Some(12345);
        let start = clip.distance();

        assert!(!clip.pointer_down(&mut scene, Vec2::ZERO));
        assert_eq!(clip.pointer_move(&mut scene, Vec2::new(0.0, 30.0)), None);
        assert_eq!(clip.distance(), start);
        assert!(scene.camera_rotation);
    }

    #[test]
    fn drag_locks_camera_rotation_until_release() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hover_plane();

        clip.pointer_down(&mut scene, Vec2::ZERO);
        assert!(clip.is_dragging());
        assert!(!scene.camera_rotation);

        clip.pointer_up(&mut scene);
        assert!(!clip.is_dragging());
        assert!(scene.camera_rotation);
        assert_eq!(clip.pointer_move(&mut scene, Vec2::new(0.0, 5.0)), None);
    }

    #[test]
    fn deactivating_mid_drag_ends_it() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);

        clip.set_active(&mut scene, false, None, ms(0)).unwrap();

        assert!(!clip.is_dragging());
        assert!(scene.camera_rotation);
        assert!(!clip.pointer_down(&mut scene, Vec2::ZERO));
    }

    #[test]
    fn destroy_releases_everything_and_later_calls_are_inert() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);

        clip.destroy(&mut scene);

        assert_eq!(clip.lifecycle(), Lifecycle::Destroyed);
        assert!(!clip.exists());
        assert!(scene.volumes.is_empty());
        assert!(scene.planes.is_empty());
        assert!(scene.subscriptions.is_empty());
        assert!(scene.camera_rotation);

        let revision = clip.revision();
        assert_eq!(
            clip.set_active(&mut scene, true, None, ms(10_000)),
            Err(ClipRejected::Destroyed)
        );
        assert!(!clip.pointer_down(&mut scene, Vec2::ZERO));
        assert_eq!(clip.pointer_move(&mut scene, Vec2::new(3.0, 3.0)), None);
        clip.pointer_up(&mut scene);
        clip.destroy(&mut scene);
        assert_eq!(clip.revision(), revision);
        assert_eq!(clip.lifecycle(), Lifecycle::Destroyed);
    }

    #[test]
    fn create_after_destroy_starts_over() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        clip.destroy(&mut scene);

        clip.create(&mut scene, TARGET, ClipDirection::BackToFront)
            .unwrap();

        assert!(clip.is_active());
        assert_eq!(scene.volumes.len(), 1);
        assert_eq!(scene.planes.len(), 1);
        assert_in_sync(&clip, &scene);
    }

    #[test]
    fn revision_tracks_changes() {
        let (mut clip, mut scene) = created(ClipDirection::TopToBottom);
        let before = clip.revision();

        clip.pointer_move(&mut scene, Vec2::new(0.0, 1.0));
        assert_eq!(clip.revision(), before);

        scene.hover_plane();
        clip.pointer_down(&mut scene, Vec2::ZERO);
        clip.pointer_move(&mut scene, Vec2::new(0.0, 1.0));
        assert!(clip.revision() > before);
    }
}

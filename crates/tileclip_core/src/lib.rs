//! Engine-agnostic clipping-plane interaction: direction geometry, drag
//! mapping and the activation state machine for one clip per controller.

pub mod controller;
pub mod direction;
pub mod drag;
pub mod error;
pub mod extent;
pub mod scene;
pub mod settings;

pub use controller::{ClipState, ClippingPlaneController, Lifecycle, VisualPlaneState};
pub use direction::{ClipDirection, CutAxis};
pub use error::{ClipRejected, SettingsError, UnknownDirection};
pub use extent::{BoundingVolume, VolumeExtent};
pub use scene::{ClipScene, SceneHandles, VisualPlaneDesc};
pub use settings::ClipSettings;

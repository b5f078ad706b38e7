use std::{fmt, str::FromStr};

use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{error::UnknownDirection, extent::VolumeExtent};

/// The six axis-aligned cutting directions.
///
/// Vectors produced by the lookup tables below are expressed in the target's
/// Z-up frame. Engines with a different up axis convert at their boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipDirection {
    #[default]
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
    FrontToBack,
    BackToFront,
}

/// Which extent of the volume a direction cuts through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CutAxis {
    Vertical,
    Lateral,
    Depth,
}

const CLIP_NORMALS: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
];

// Facing of the rendered plane. Not derivable from CLIP_NORMALS; the renderer
// orients plane entities differently from clip volumes.
const VISUAL_NORMALS: [Vec3; 6] = [
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

const AXIS_MULTIPLIERS: [f32; 6] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0];

const NAMES: [&str; 6] = [
    "top_to_bottom",
    "bottom_to_top",
    "left_to_right",
    "right_to_left",
    "front_to_back",
    "back_to_front",
];

impl ClipDirection {
    pub const ALL: [ClipDirection; 6] = [
        ClipDirection::TopToBottom,
        ClipDirection::BottomToTop,
        ClipDirection::LeftToRight,
        ClipDirection::RightToLeft,
        ClipDirection::FrontToBack,
        ClipDirection::BackToFront,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Normal of the invisible clip plane.
    pub const fn clip_normal(self) -> Vec3 {
        CLIP_NORMALS[self.index()]
    }

    /// Normal used to face the rendered plane handle.
    pub const fn visual_normal(self) -> Vec3 {
        VISUAL_NORMALS[self.index()]
    }

    /// Sign turning drag magnitude into a signed distance change.
    pub const fn axis_multiplier(self) -> f32 {
        AXIS_MULTIPLIERS[self.index()]
    }

    pub const fn cut_axis(self) -> CutAxis {
        match self {
            ClipDirection::TopToBottom | ClipDirection::BottomToTop => CutAxis::Vertical,
            ClipDirection::LeftToRight | ClipDirection::RightToLeft => CutAxis::Lateral,
            ClipDirection::FrontToBack | ClipDirection::BackToFront => CutAxis::Depth,
        }
    }

    /// Starting distance: `fraction` of the extent the direction cuts through.
    pub fn initial_offset(self, extent: &VolumeExtent, fraction: f32) -> f32 {
        let along = match self.cut_axis() {
            CutAxis::Vertical => extent.height,
            CutAxis::Lateral => extent.width,
            CutAxis::Depth => extent.depth,
        };
        along * fraction
    }

    /// 2D size of the rendered plane.
    pub fn visual_extent(self, extent: &VolumeExtent) -> Vec2 {
        match self.cut_axis() {
            CutAxis::Vertical => Vec2::new(extent.width, extent.depth),
            CutAxis::Lateral => Vec2::new(extent.depth, extent.height),
            CutAxis::Depth => Vec2::new(extent.width, extent.height),
        }
    }

    pub const fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Parses a direction name, falling back to [`ClipDirection::TopToBottom`]
    /// for anything unrecognized.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for ClipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClipDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ClipDirection::ALL
            .into_iter()
            .find(|dir| dir.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

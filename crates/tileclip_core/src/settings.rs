use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Tuning for the clip controller.
///
/// Every field has a default, so a settings file only needs the values it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    /// Distance units per pointer pixel.
    pub base_speed: f32,
    /// Speed multiplier while the modifier key is held.
    pub boost_multiplier: f32,
    /// Minimum time between accepted activate/deactivate toggles.
    pub toggle_cooldown_ms: u64,
    /// Fraction of the cut extent used as the starting distance.
    pub offset_fraction: f32,
    /// Clamp for `|distance|`. Unbounded when `None`.
    pub distance_limit: Option<f32>,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            base_speed: 0.04,
            boost_multiplier: 5.0,
            toggle_cooldown_ms: 300,
            offset_fraction: 0.3,
            distance_limit: None,
        }
    }
}

impl ClipSettings {
    pub fn toggle_cooldown(&self) -> Duration {
        Duration::from_millis(self.toggle_cooldown_ms)
    }

    pub fn clamp_distance(&self, distance: f32) -> f32 {
        match self.distance_limit {
            Some(limit) => distance.clamp(-limit.abs(), limit.abs()),
            None => distance,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

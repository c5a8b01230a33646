//! Tunables for the city layout, highlight emphasis and timers.
//!
//! Every field has a default; a JSON override only needs the keys it changes.

use serde::Deserialize;

use crate::geometry::{MAX_REACH_HEIGHT, MIN_REACH_HEIGHT};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// World units per rank step.
    pub elevation_scale: f64,
    pub arc_segments: usize,
    pub arc_width: f32,
    pub min_reach_height: f64,
    pub max_reach_height: f64,
    pub base_opacity: u8,
    pub highlight_opacity: u8,
    /// Tower fill alpha outside of hover emphasis.
    pub tower_alpha: u8,
    /// Inset of the cell background plate from the cell border.
    pub plate_inset: f64,
    pub label_offset: [f64; 3],
    pub trail: TrailSettings,
    pub timers: TimerSettings,
    pub camera: CameraSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            elevation_scale: 20.0,
            arc_segments: 200,
            arc_width: 5.0,
            min_reach_height: MIN_REACH_HEIGHT,
            max_reach_height: MAX_REACH_HEIGHT,
            base_opacity: 50,
            highlight_opacity: 255,
            tower_alpha: 51,
            plate_inset: 0.5,
            label_offset: [2.0, -2.0, 4.0],
            trail: TrailSettings::default(),
            timers: TimerSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl SceneSettings {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    pub enabled: bool,
    /// Staggered copies per connection.
    pub copies: usize,
    pub timestamp_step: f64,
    pub trail_length: f64,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            copies: 6,
            timestamp_step: 0.5,
            trail_length: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub animation_start_delay_s: f64,
    pub trail_start_delay_s: f64,
    pub trail_step_s: f64,
    pub trail_wrap_at: u32,
    pub trail_wrap_to: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            animation_start_delay_s: 0.001,
            trail_start_delay_s: 1.7,
            trail_step_s: 1.0,
            trail_wrap_at: 170,
            trail_wrap_to: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub target: [f64; 3],
    /// Screen pixels per world unit.
    pub zoom: f32,
    /// Screen pixels per world unit of elevation.
    pub lift: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            target: [450.0, -100.0, 0.0],
            zoom: 1.0,
            lift: 0.6,
        }
    }
}

//! Tilted top-down camera for the city view.
//!
//! Drag pans, scroll zooms.

use egui::{pos2, Pos2, Rect, Vec2};

use crate::settings::CameraSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct CityCamera {
    pub target: [f64; 3],
    pub zoom: f32,
    /// Screen pixels per world unit of elevation, before zoom.
    pub lift: f32,
    /// Vertical squash of the ground plane.
    pub tilt: f32,
}

impl CityCamera {
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            target: settings.target,
            zoom: settings.zoom.max(0.01),
            lift: settings.lift,
            tilt: 0.6,
        }
    }

    /// World position to screen position inside `rect`.
    pub fn project(&self, rect: Rect, p: [f64; 3]) -> Pos2 {
        let center = rect.center();
        let x = (p[0] - self.target[0]) as f32;
        let y = (p[1] - self.target[1]) as f32;
        let z = (p[2] - self.target[2]) as f32;
        let sx = x * self.zoom;
        let sy = -y * self.tilt * self.zoom - z * self.lift * self.zoom;
        pos2(center.x + sx, center.y + sy)
    }

    pub fn pan(&mut self, screen_delta: Vec2) {
        self.target[0] -= (screen_delta.x / self.zoom) as f64;
        self.target[1] += (screen_delta.y / (self.zoom * self.tilt)) as f64;
    }

    pub fn zoom_by(&mut self, scroll: f32) {
        self.zoom = (self.zoom * (1.0 + scroll * 0.001)).clamp(0.05, 20.0);
    }
}

impl Default for CityCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

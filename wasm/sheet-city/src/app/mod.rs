//! egui view of the city. Paints the scene's current frame and reports the
//! hovered tower or arc back to the scene.

pub mod camera;
pub mod painter;
pub mod picking;

#[cfg(target_arch = "wasm32")]
mod eframe_app;
#[cfg(target_arch = "wasm32")]
pub use eframe_app::SheetCityApp;

use egui::{Sense, Ui};

use crate::highlight::HighlightState;
use crate::scene::{Scene, SceneEvent};
use camera::CityCamera;

pub struct CityView {
    pub camera: CityCamera,
}

impl CityView {
    pub fn new(scene: &Scene) -> Self {
        Self {
            camera: CityCamera::from_settings(&scene.settings().camera),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, scene: &mut Scene) {
        let rect = ui.max_rect();
        let response = ui.interact(rect, ui.id().with("city"), Sense::drag());
        if response.dragged() {
            self.camera.pan(response.drag_delta());
        }
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            self.camera.zoom_by(scroll);
        }

        let painter = ui.painter_at(rect);
        let Some(frame) = scene.frame() else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "loading...",
                egui::FontId::monospace(14.0),
                egui::Color32::from_gray(160),
            );
            return;
        };

        painter::paint_frame(&painter, rect, &self.camera, frame);

        let hovered = match response.hover_pos() {
            Some(pointer) if !response.dragged() => {
                picking::pick(&self.camera, rect, frame, pointer)
            }
            _ => HighlightState::None,
        };
        scene.handle(SceneEvent::Hover(hovered));

        if let (Some(pointer), Some(text)) = (response.hover_pos(), scene.tooltip()) {
            painter::paint_tooltip(&painter, pointer, &text);
        }
    }
}

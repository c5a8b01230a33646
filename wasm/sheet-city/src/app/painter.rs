use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

use crate::app::camera::CityCamera;
use crate::app::picking::{arc_screen_path, tower_roof};
use crate::projection::{Frame, Tower};
use crate::theme::{self, Rgb, Rgba};

/// Samples per arc when painting.
const DRAW_SEGMENTS: usize = 48;

pub fn rgba(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

pub fn rgb(c: Rgb) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

pub fn paint_frame(painter: &Painter, rect: Rect, camera: &CityCamera, frame: &Frame) {
    painter.rect_filled(rect, 0.0, rgb(theme::background()));

    let grid = Stroke::new(1.0, rgb(theme::grid()));
    for line in frame.rows.iter().chain(frame.cols.iter()) {
        let points: Vec<Pos2> = line
            .path
            .iter()
            .map(|[x, y]| camera.project(rect, [*x, *y, 0.0]))
            .collect();
        painter.add(Shape::line(points, grid));
    }

    for plate in &frame.backgrounds {
        let points = plate.polygon.iter().map(|p| camera.project(rect, *p)).collect();
        painter.add(Shape::convex_polygon(points, rgba(plate.fill), Stroke::NONE));
    }

    for tower in &frame.towers {
        paint_tower(painter, rect, camera, tower);
    }

    for arc in &frame.arcs {
        let points = arc_screen_path(camera, rect, arc, DRAW_SEGMENTS);
        let width = (arc.width * camera.zoom * 0.5).clamp(1.0, 8.0);
        painter.add(Shape::line(points, Stroke::new(width, rgba(arc.source_color))));
    }

    if camera.zoom >= 1.0 {
        let font = FontId::monospace(9.0 * camera.zoom.min(2.0));
        for label in &frame.labels {
            if label.text.is_empty() {
                continue;
            }
            painter.text(
                camera.project(rect, label.position),
                Align2::LEFT_TOP,
                &label.text,
                font.clone(),
                rgba(label.color),
            );
        }
    }
}

fn paint_tower(painter: &Painter, rect: Rect, camera: &CityCamera, tower: &Tower) {
    let fill = rgba(tower.fill);
    let [r, g, b, _] = tower.fill;
    let edge = Stroke::new(1.0, Color32::from_rgba_unmultiplied(r, g, b, 160));
    let roof = tower_roof(camera, rect, tower);
    for [x, y] in &tower.polygon {
        let base = camera.project(rect, [*x, *y, 0.0]);
        let top = camera.project(rect, [*x, *y, tower.elevation]);
        painter.add(Shape::line_segment([base, top], edge));
    }
    painter.add(Shape::convex_polygon(roof, fill, edge));
}

pub fn paint_tooltip(painter: &Painter, at: Pos2, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::monospace(12.0),
        Color32::from_gray(230),
    );
    let pos = at + egui::vec2(14.0, 14.0);
    let bg = Rect::from_min_size(pos, galley.size()).expand(6.0);
    painter.rect_filled(bg, 2.0, Color32::from_rgba_unmultiplied(0, 0, 0, 200));
    painter.galley(pos, galley, Color32::from_gray(230));
}

use egui::{Pos2, Rect};
use nalgebra::Point3;

use crate::app::camera::CityCamera;
use crate::geometry::sample_arc;
use crate::highlight::HighlightState;
use crate::projection::{ArcSegment, Frame, Tower};

/// Samples per arc when hit-testing; coarser than the drawn arc.
pub const PICK_SEGMENTS: usize = 24;

pub fn point_in_polygon(p: Pos2, polygon: &[Pos2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

pub fn tower_roof(camera: &CityCamera, rect: Rect, tower: &Tower) -> Vec<Pos2> {
    tower
        .polygon
        .iter()
        .map(|[x, y]| camera.project(rect, [*x, *y, tower.elevation]))
        .collect()
}

pub fn arc_screen_path(
    camera: &CityCamera,
    rect: Rect,
    arc: &ArcSegment,
    segments: usize,
) -> Vec<Pos2> {
    let source = Point3::from(arc.source);
    let target = Point3::from(arc.target);
    sample_arc(source, target, segments, arc.height)
        .into_iter()
        .map(|p| camera.project(rect, [p.x, p.y, p.z]))
        .collect()
}

/// What sits under `pointer`: towers first (front-most wins), then arcs.
pub fn pick(camera: &CityCamera, rect: Rect, frame: &Frame, pointer: Pos2) -> HighlightState {
    if let Some(tower) = frame
        .towers
        .iter()
        .rev()
        .find(|t| point_in_polygon(pointer, &tower_roof(camera, rect, t)))
    {
        return HighlightState::tower(tower.name.clone());
    }

    let mut best: Option<(&ArcSegment, f32)> = None;
    for arc in &frame.arcs {
        let tolerance = (arc.width * camera.zoom).max(4.0);
        let path = arc_screen_path(camera, rect, arc, PICK_SEGMENTS);
        let d = path
            .windows(2)
            .map(|w| distance_to_segment(pointer, w[0], w[1]))
            .fold(f32::INFINITY, f32::min);
        if d <= tolerance && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((arc, d));
        }
    }

    match best {
        Some((arc, _)) => HighlightState::arc(arc.from.clone(), arc.to.clone()),
        None => HighlightState::None,
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::*;
    use crate::dataset::{Cell, Dataset};
    use crate::projection::build_frame;
    use crate::scene::SceneState;
    use crate::settings::SceneSettings;

    fn frame() -> Frame {
        let state = SceneState::from_dataset(Dataset::from_cells(vec![
            Cell::new("A", 0, [0.0, 0.0], 10.0, 10.0).with_used_by(["B"]),
            Cell::new("B", 1, [200.0, 0.0], 10.0, 10.0),
        ]));
        build_frame(&state, &HighlightState::None, true, &SceneSettings::default())
    }

    fn camera() -> CityCamera {
        CityCamera {
            target: [100.0, 0.0, 0.0],
            zoom: 2.0,
            lift: 0.6,
            tilt: 0.6,
        }
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0), pos2(0.0, 10.0)];
        assert!(point_in_polygon(pos2(5.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(15.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(5.0, 5.0), &[]));
    }

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_segment(pos2(5.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);
        let d = distance_to_segment(pos2(-4.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_tower_roof() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let frame = frame();
        let camera = camera();
        let roof_center = camera.project(rect, [205.0, -5.0, frame.towers[0].elevation]);
        assert_eq!(pick(&camera, rect, &frame, roof_center), HighlightState::tower("B"));
    }

    #[test]
    fn test_pick_arc_and_empty_space() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let frame = frame();
        let camera = camera();
        let path = arc_screen_path(&camera, rect, &frame.arcs[0], PICK_SEGMENTS);
        let mid = path[PICK_SEGMENTS / 2];
        assert_eq!(pick(&camera, rect, &frame, mid), HighlightState::arc("A", "B"));
        assert_eq!(
            pick(&camera, rect, &frame, pos2(5.0, 590.0)),
            HighlightState::None
        );
    }
}

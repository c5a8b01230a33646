//! Pure projections from cells and connections to draw primitives.
//!
//! Nothing here keeps state between frames: `build_frame` rebuilds the
//! connection set from the cells every time it runs.

use nalgebra::Point3;
use serde::Serialize;

use crate::dataset::{Cell, GridLine};
use crate::geometry::{reach_height_between, sample_arc};
use crate::graph::{Connection, DependencyGraph, SpanScalars};
use crate::highlight::{HighlightState, UpstreamPaths};
use crate::scene::SceneState;
use crate::settings::SceneSettings;
use crate::theme::{self, Rgb, Rgba};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub path: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
    pub position: [f64; 3],
    pub text: String,
    pub color: Rgba,
}

/// Flat plate under a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    pub name: String,
    pub polygon: [[f64; 3]; 4],
    pub fill: Rgba,
}

/// Extruded cell footprint. `polygon` is the ground outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tower {
    pub name: String,
    pub polygon: [[f64; 2]; 4],
    pub elevation: f64,
    pub fill: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcSegment {
    pub from: String,
    pub to: String,
    pub source: [f64; 3],
    pub target: [f64; 3],
    pub source_color: Rgba,
    pub target_color: Rgba,
    pub width: f32,
    /// Curvature handed to the arc sampler.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trail {
    pub path: Vec<[f64; 3]>,
    pub timestamps: Vec<f64>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    pub rows: Vec<Polyline>,
    pub cols: Vec<Polyline>,
    pub labels: Vec<Label>,
    pub backgrounds: Vec<Footprint>,
    pub towers: Vec<Tower>,
    pub arcs: Vec<ArcSegment>,
    pub trails: Vec<Trail>,
    pub trail_length: f64,
}

fn quad(cell: &Cell, inset: f64) -> [[f64; 2]; 4] {
    let [x, y] = cell.coord;
    let (w, h) = (cell.width, cell.height);
    [
        [x + inset, y - inset],
        [x + w - inset, y - inset],
        [x + w - inset, y - h + inset],
        [x + inset, y - h + inset],
    ]
}

/// Elevation of a cell's top surface, flat until the towers rise.
pub fn rank_elevation(rank: u32, animating: bool, settings: &SceneSettings) -> f64 {
    if animating {
        rank as f64 * settings.elevation_scale
    } else {
        0.0
    }
}

pub fn grid_line(line: &GridLine) -> Polyline {
    Polyline {
        path: line.path.clone(),
    }
}

pub fn cell_label(cell: &Cell, settings: &SceneSettings) -> Label {
    let [dx, dy, dz] = settings.label_offset;
    Label {
        name: cell.name.clone(),
        position: [
            cell.coord[0] + dx,
            cell.coord[1] + dy,
            cell.rank as f64 * settings.elevation_scale + dz,
        ],
        text: cell.value.clone(),
        color: cell.text_color,
    }
}

pub fn cell_background(cell: &Cell, settings: &SceneSettings) -> Footprint {
    let elevation = cell.rank as f64 * settings.elevation_scale + 1.0;
    let polygon = quad(cell, settings.plate_inset).map(|[x, y]| [x, y, elevation]);
    Footprint {
        name: cell.name.clone(),
        polygon,
        fill: cell.bg_color,
    }
}

/// `None` for rank-0 cells, which stay flat.
pub fn tower(
    cell: &Cell,
    span: &SpanScalars,
    highlight: &HighlightState,
    animating: bool,
    settings: &SceneSettings,
) -> Option<Tower> {
    if cell.rank == 0 {
        return None;
    }

    let elevation = if animating {
        rank_elevation(cell.rank, true, settings) - 1.0
    } else {
        0.0
    };
    let fill = if highlight.hovered_tower() == Some(cell.name.as_str()) {
        theme::highlight()
    } else {
        theme::with_alpha(theme::tower_color(cell.rank, span.max_rank), settings.tower_alpha)
    };

    Some(Tower {
        name: cell.name.clone(),
        polygon: quad(cell, 0.0),
        elevation,
        fill,
    })
}

pub fn arc_segment(
    connection: &Connection,
    span: &SpanScalars,
    highlight: &HighlightState,
    upstream: &UpstreamPaths,
    animating: bool,
    settings: &SceneSettings,
) -> ArcSegment {
    let opacity = if highlight.emphasizes(connection, upstream) {
        settings.highlight_opacity
    } else {
        settings.base_opacity
    };
    let color = theme::with_alpha(connection.color, opacity);
    let (from, to) = (&connection.from, &connection.to);

    ArcSegment {
        from: from.name.clone(),
        to: to.name.clone(),
        source: [
            from.coords.x,
            from.coords.y,
            rank_elevation(from.rank, animating, settings),
        ],
        target: [
            to.coords.x,
            to.coords.y,
            rank_elevation(to.rank, animating, settings),
        ],
        source_color: color,
        target_color: color,
        width: settings.arc_width,
        height: reach_height_between(
            connection,
            span,
            settings.min_reach_height,
            settings.max_reach_height,
        ),
    }
}

/// Sampled arc repeated with staggered timestamps for motion trails.
pub fn trails(
    connection: &Connection,
    span: &SpanScalars,
    animating: bool,
    settings: &SceneSettings,
) -> Vec<Trail> {
    let (from, to) = (&connection.from, &connection.to);
    let source = Point3::new(
        from.coords.x,
        from.coords.y,
        rank_elevation(from.rank, animating, settings),
    );
    let target = Point3::new(
        to.coords.x,
        to.coords.y,
        rank_elevation(to.rank, animating, settings),
    );
    let curvature = reach_height_between(
        connection,
        span,
        settings.min_reach_height,
        settings.max_reach_height,
    );
    let path: Vec<[f64; 3]> = sample_arc(source, target, settings.arc_segments, curvature)
        .into_iter()
        .map(|p| [p.x, p.y, p.z])
        .collect();

    let copies = settings.trail.copies;
    let len = path.len() as f64;
    (0..copies)
        .map(|k| {
            let offset = if copies > 1 {
                k as f64 * len / (copies - 1) as f64
            } else {
                0.0
            };
            Trail {
                path: path.clone(),
                timestamps: (0..path.len())
                    .map(|i| offset + i as f64 * settings.trail.timestamp_step)
                    .collect(),
                color: connection.color,
            }
        })
        .collect()
}

/// Full rebuild of every primitive for the current inputs.
pub fn build_frame(
    state: &SceneState,
    highlight: &HighlightState,
    animating: bool,
    settings: &SceneSettings,
) -> Frame {
    let graph = DependencyGraph::build(&state.cells);
    let span = state.span;
    let upstream = highlight.upstream(graph.connections());

    let arcs = graph
        .connections()
        .iter()
        .map(|c| arc_segment(c, &span, highlight, &upstream, animating, settings))
        .collect();

    let trails = if settings.trail.enabled {
        graph
            .connections()
            .iter()
            .flat_map(|c| trails(c, &span, animating, settings))
            .collect()
    } else {
        Vec::new()
    };

    Frame {
        rows: state.rows.iter().map(grid_line).collect(),
        cols: state.cols.iter().map(grid_line).collect(),
        labels: state.cells.iter().map(|c| cell_label(c, settings)).collect(),
        backgrounds: state
            .cells
            .iter()
            .map(|c| cell_background(c, settings))
            .collect(),
        towers: state
            .cells
            .iter()
            .filter_map(|c| tower(c, &span, highlight, animating, settings))
            .collect(),
        arcs,
        trails,
        trail_length: settings.trail.trail_length,
    }
}

//! Arc geometry between two towers.

use nalgebra::{Point2, Point3};

use crate::graph::{Connection, SpanScalars};

/// Lift applied to every sampled arc point so arcs clear the plates they leave from.
pub const ARC_Z_BIAS: f64 = 1.0;

pub const MIN_REACH_HEIGHT: f64 = 0.4;
pub const MAX_REACH_HEIGHT: f64 = 3.0;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

pub fn planar_distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).norm()
}

/// Height of the arc at progress `t` in [0, 1].
///
/// Rising arcs bulge from the source side, falling arcs from the target side.
/// A zero reach falls back to a straight line between the two heights.
pub fn paraboloid(distance: f64, source_z: f64, target_z: f64, t: f64, curvature: f64) -> f64 {
    let delta_z = target_z - source_z;
    let dh = distance * curvature;
    if dh == 0.0 || !dh.is_finite() {
        return source_z + delta_z * t;
    }

    let unit_z = delta_z / dh;
    let p2 = unit_z * unit_z + 1.0;

    let (z0, r) = if delta_z >= 0.0 {
        (source_z, t)
    } else {
        (target_z, 1.0 - t)
    };
    // r * (p2 - r) is non-negative for r in [0, 1]; clamp rounding noise.
    (r * (p2 - r)).max(0.0).sqrt() * dh + z0
}

/// Samples `segments + 1` points from `source` to `target`.
pub fn sample_arc(
    source: Point3<f64>,
    target: Point3<f64>,
    segments: usize,
    curvature: f64,
) -> Vec<Point3<f64>> {
    let distance = planar_distance(source.xy(), target.xy());
    if segments == 0 {
        return vec![Point3::new(source.x, source.y, source.z + ARC_Z_BIAS)];
    }

    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            Point3::new(
                lerp(source.x, target.x, t),
                lerp(source.y, target.y, t),
                paraboloid(distance, source.z, target.z, t, curvature) + ARC_Z_BIAS,
            )
        })
        .collect()
}

/// Curvature for a connection: the longest span in the dataset gets `min`,
/// coincident endpoints get `max`.
pub fn reach_height_between(connection: &Connection, span: &SpanScalars, min: f64, max: f64) -> f64 {
    let dist = planar_distance(connection.from.coords, connection.to.coords);
    let max_dist = span.max_distance();
    let ratio = if max_dist > 0.0 {
        (dist / max_dist).clamp(0.0, 1.0)
    } else {
        0.0
    };
    min + (1.0 - ratio) * (max - min)
}

pub fn reach_height(connection: &Connection, span: &SpanScalars) -> f64 {
    reach_height_between(connection, span, MIN_REACH_HEIGHT, MAX_REACH_HEIGHT)
}

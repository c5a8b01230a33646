//! Dependency graph built from the flat cell list.

use std::collections::HashMap;

use nalgebra::Point2;

use crate::dataset::Cell;
use crate::theme::{connection_color, Rgb};

/// One end of a connection, resolved to the cell's footprint center.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub rank: u32,
    pub coords: Point2<f64>,
}

impl Endpoint {
    fn of(cell: &Cell) -> Self {
        let [x, y] = cell.center();
        Self {
            name: cell.name.clone(),
            rank: cell.rank,
            coords: Point2::new(x, y),
        }
    }
}

/// Directed edge: the `to` cell's formula references the `from` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
    pub color: Rgb,
}

impl Connection {
    pub fn links(&self, from: &str, to: &str) -> bool {
        self.from.name == from && self.to.name == to
    }
}

/// Dataset-wide maxima used as normalization denominators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpanScalars {
    pub max_width: f64,
    pub max_height: f64,
    pub max_rank: u32,
}

impl SpanScalars {
    /// Diagonal of the largest observed connection span.
    pub fn max_distance(&self) -> f64 {
        self.max_width.hypot(self.max_height)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependencyGraph {
    connections: Vec<Connection>,
    span: SpanScalars,
    dropped_references: usize,
}

impl DependencyGraph {
    /// Connections are emitted in cell order, then `used_by` order. References
    /// to names missing from the dataset are skipped.
    pub fn build(cells: &[Cell]) -> Self {
        let lookup: HashMap<&str, &Cell> = cells.iter().map(|c| (c.name.as_str(), c)).collect();

        let mut connections = Vec::new();
        let mut span = SpanScalars {
            max_rank: cells.iter().map(|c| c.rank).max().unwrap_or(0),
            ..Default::default()
        };
        let mut dropped_references = 0;

        for from_cell in cells {
            for to_name in &from_cell.used_by {
                let Some(to_cell) = lookup.get(to_name.as_str()) else {
                    log::debug!("{} is used by unknown cell {}", from_cell.name, to_name);
                    dropped_references += 1;
                    continue;
                };

                let width = (from_cell.coord[0] - to_cell.coord[0]).abs();
                let height = (from_cell.coord[1] - to_cell.coord[1]).abs();
                span.max_width = span.max_width.max(width);
                span.max_height = span.max_height.max(height);

                connections.push(Connection {
                    from: Endpoint::of(from_cell),
                    to: Endpoint::of(to_cell),
                    color: connection_color(to_cell.category()),
                });
            }
        }

        Self {
            connections,
            span,
            dropped_references,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn span(&self) -> SpanScalars {
        self.span
    }

    pub fn dropped_references(&self) -> usize {
        self.dropped_references
    }
}

/// Connections whose target is `name`.
pub fn incoming<'a>(
    connections: &'a [Connection],
    name: &'a str,
) -> impl Iterator<Item = &'a Connection> + 'a {
    connections.iter().filter(move |c| c.to.name == name)
}

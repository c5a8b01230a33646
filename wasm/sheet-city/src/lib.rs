//! Sheet city: a spreadsheet's dependency structure as a 3D city.
//!
//! Cells become plates and towers stacked by rank; formula references
//! become arcs between towers. Hovering a tower lights up every arc on a
//! path that feeds it.

pub mod app;
pub mod dataset;
pub mod geometry;
pub mod graph;
pub mod highlight;
pub mod projection;
pub mod scene;
pub mod settings;
pub mod theme;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebHandle;

pub use dataset::{Cell, Dataset, DatasetError};
pub use graph::{Connection, DependencyGraph, SpanScalars};
pub use highlight::{find_upstream_paths, HighlightState, UpstreamPaths};
pub use projection::{build_frame, Frame};
pub use scene::{Phase, Scene, SceneEvent, SceneState, Update};
pub use settings::SceneSettings;

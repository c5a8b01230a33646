//! Sheet dataset as produced by the workbook exporter.
//!
//! The file is an array of single-key objects, one per sheet:
//! `[{"sheet0": {"rows": [..], "cols": [..], "cells": [..]}}, ..]`.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse sheet dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch sheet dataset: {0}")]
    Fetch(String),
    #[error("failed to read sheet dataset at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One row or column border.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GridLine {
    pub path: Vec<[f64; 2]>,
}

fn white() -> [u8; 4] {
    [255, 255, 255, 255]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Cell {
    pub name: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub coord: [f64; 2],
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub formula: Option<String>,
    /// Formula shape category. `None` for literal cells.
    #[serde(default)]
    pub formula_type: Option<u32>,
    /// Cells whose formulas reference this one.
    #[serde(default)]
    pub used_by: Vec<String>,
    /// Cells this one's formula references. Carried for wire compatibility;
    /// connections are derived from `used_by`.
    #[serde(default)]
    pub uses: Vec<String>,
    /// Transitive reference count computed by the exporter. Carried, not drawn.
    #[serde(default)]
    pub weight: u32,
    #[serde(default = "white")]
    pub bg_color: [u8; 4],
    #[serde(default = "white")]
    pub text_color: [u8; 4],
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
}

impl Cell {
    pub fn new(name: impl Into<String>, rank: u32, coord: [f64; 2], width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            rank,
            coord,
            width,
            height,
            value: String::new(),
            formula: None,
            formula_type: None,
            used_by: Vec::new(),
            uses: Vec::new(),
            weight: 0,
            bg_color: white(),
            text_color: white(),
            font: None,
            font_size: None,
        }
    }

    pub fn with_used_by<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_by = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_formula_type(mut self, formula_type: u32) -> Self {
        self.formula_type = Some(formula_type);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Footprint center. Height grows downward from the top-left origin.
    pub fn center(&self) -> [f64; 2] {
        [
            self.coord[0] + self.width / 2.0,
            self.coord[1] - self.height / 2.0,
        ]
    }

    /// Literal cells color as category 0.
    pub fn category(&self) -> u32 {
        self.formula_type.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Sheet {
    pub rows: Vec<GridLine>,
    pub cols: Vec<GridLine>,
    pub cells: Vec<Cell>,
    pub total_width: f64,
    pub total_height: f64,
}

/// All sheets flattened into single row/col/cell arrays, in sheet order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Sheet names, in file order.
    pub labels: Vec<String>,
    pub rows: Vec<GridLine>,
    pub cols: Vec<GridLine>,
    pub cells: Vec<Cell>,
    /// `[total_width, total_height]` per sheet, parallel to `labels`. Carried
    /// for wire compatibility; the camera starts from settings.
    pub extents: Vec<[f64; 2]>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let sheets: Vec<BTreeMap<String, Sheet>> = serde_json::from_str(json)?;
        let dataset = Self::from_sheets(sheets.into_iter().flat_map(|entry| entry.into_iter()));
        log::info!(
            "loaded sheet(s) [{}]: {} cells, {} rows, {} cols",
            dataset.labels.join(", "),
            dataset.cells.len(),
            dataset.rows.len(),
            dataset.cols.len()
        );
        Ok(dataset)
    }

    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let contents = fs::read_to_string(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_sheets<I>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (String, Sheet)>,
    {
        let mut dataset = Dataset::default();
        for (label, sheet) in sheets {
            dataset.labels.push(label);
            dataset.extents.push([sheet.total_width, sheet.total_height]);
            dataset.rows.extend(sheet.rows);
            dataset.cols.extend(sheet.cols);
            dataset.cells.extend(sheet.cells);
        }
        dataset
    }

    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }
}

//! Grid metadata ingestion and validation.
//!
//! A collaborator supplies precomputed safety value functions as JSON files
//! with per-axis bounds, spacing, point counts, periodicity flags, and the
//! value array nested to the grid shape. Everything is validated once at
//! construction and immutable afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RakshaError, Result};
use crate::grid::GridValueFunction;

/// Upper bound on grid dimensionality (corner enumeration is 2^D).
pub const MAX_DIMS: usize = 16;

/// Raw on-disk grid layout. `data` is nested arrays of shape `gnum`.
#[derive(Debug, Deserialize)]
struct RawGrid {
    gmin: Vec<f64>,
    gdx: Vec<f64>,
    gnum: Vec<usize>,
    periodic: Vec<bool>,
    data: serde_json::Value,
}

/// Validated N-dimensional scalar field over a rectangular grid.
///
/// Storage is row-major with the last axis fastest, matching the occupancy
/// grid convention (`index = i0 * stride0 + i1 * stride1 + ...`).
#[derive(Debug, Clone)]
pub struct GridData {
    /// Per-axis minimum bound.
    pub gmin: Vec<f64>,
    /// Per-axis spacing, strictly positive.
    pub gdx: Vec<f64>,
    /// Per-axis point count.
    pub gnum: Vec<usize>,
    /// Per-axis periodicity; periodic axes wrap at `gmin + gnum * gdx`.
    pub periodic: Vec<bool>,
    /// Flattened values, `product(gnum)` entries.
    pub data: Vec<f64>,
}

impl GridData {
    /// Build from already-flattened data, validating every invariant.
    pub fn new(
        gmin: Vec<f64>,
        gdx: Vec<f64>,
        gnum: Vec<usize>,
        periodic: Vec<bool>,
        data: Vec<f64>,
    ) -> Result<Self> {
        let d = gmin.len();
        if d == 0 {
            return Err(RakshaError::InvalidGrid("zero-dimensional grid".into()));
        }
        if d > MAX_DIMS {
            return Err(RakshaError::InvalidGrid(format!(
                "{} axes exceeds the {} axis limit",
                d, MAX_DIMS
            )));
        }
        if gdx.len() != d || gnum.len() != d || periodic.len() != d {
            return Err(RakshaError::InvalidGrid(format!(
                "axis metadata lengths disagree: gmin={}, gdx={}, gnum={}, periodic={}",
                d,
                gdx.len(),
                gnum.len(),
                periodic.len()
            )));
        }
        for (i, &dx) in gdx.iter().enumerate() {
            if !(dx > 0.0) || !dx.is_finite() {
                return Err(RakshaError::InvalidGrid(format!(
                    "axis {} spacing must be positive and finite, got {}",
                    i, dx
                )));
            }
        }
        let mut expected = 1usize;
        for (i, &n) in gnum.iter().enumerate() {
            if n == 0 {
                return Err(RakshaError::InvalidGrid(format!("axis {} has zero points", i)));
            }
            expected = expected.checked_mul(n).ok_or_else(|| {
                RakshaError::InvalidGrid("grid point count overflows usize".into())
            })?;
        }
        if data.len() != expected {
            return Err(RakshaError::InvalidGrid(format!(
                "data has {} entries, shape requires {}",
                data.len(),
                expected
            )));
        }
        Ok(Self {
            gmin,
            gdx,
            gnum,
            periodic,
            data,
        })
    }

    /// Number of axes.
    #[inline]
    pub fn dim(&self) -> usize {
        self.gmin.len()
    }

    /// Row-major strides (last axis fastest).
    pub fn strides(&self) -> Vec<usize> {
        let d = self.dim();
        let mut strides = vec![1usize; d];
        for i in (0..d.saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.gnum[i + 1];
        }
        strides
    }

    /// Parse a JSON document with nested `data` arrays of shape `gnum`.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawGrid = serde_json::from_str(text)?;
        let mut flat = Vec::new();
        flatten_nested(&raw.data, &raw.gnum, &mut flat)?;
        Self::new(raw.gmin, raw.gdx, raw.gnum, raw.periodic, flat)
    }

    /// Load and parse a JSON grid file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let raw: RawGrid = serde_json::from_reader(BufReader::new(file))?;
        let mut flat = Vec::new();
        flatten_nested(&raw.data, &raw.gnum, &mut flat)?;
        Self::new(raw.gmin, raw.gdx, raw.gnum, raw.periodic, flat)
    }
}

/// Flatten nested JSON arrays into row-major order, checking the shape
/// against `shape` at every level.
fn flatten_nested(value: &serde_json::Value, shape: &[usize], out: &mut Vec<f64>) -> Result<()> {
    match shape.split_first() {
        None => {
            let v = value.as_f64().ok_or_else(|| {
                RakshaError::InvalidGrid(format!("expected a number, got {}", value))
            })?;
            out.push(v);
            Ok(())
        }
        Some((&n, rest)) => {
            let arr = value.as_array().ok_or_else(|| {
                RakshaError::InvalidGrid(format!("expected an array of {} entries", n))
            })?;
            if arr.len() != n {
                return Err(RakshaError::InvalidGrid(format!(
                    "array has {} entries, shape requires {}",
                    arr.len(),
                    n
                )));
            }
            for item in arr {
                flatten_nested(item, rest, out)?;
            }
            Ok(())
        }
    }
}

/// Named collection of loaded grid value functions.
///
/// Loading happens in an explicit phase before the simulation loop; a lookup
/// for a name that was never loaded is [`RakshaError::GridNotLoaded`], so no
/// query path can reach a half-initialized grid.
#[derive(Debug, Default)]
pub struct GridLibrary {
    grids: HashMap<String, GridValueFunction>,
}

impl GridLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built grid under a name.
    pub fn insert(&mut self, name: impl Into<String>, grid: GridValueFunction) {
        self.grids.insert(name.into(), grid);
    }

    /// Load a JSON grid file and register it under a name.
    pub fn load_file<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<()> {
        let grid = GridValueFunction::new(GridData::from_json_file(path)?)?;
        log::info!("loaded grid '{}' ({} axes)", name, grid.dim());
        self.grids.insert(name.to_string(), grid);
        Ok(())
    }

    /// Look up a loaded grid by name.
    pub fn get(&self, name: &str) -> Result<&GridValueFunction> {
        self.grids
            .get(name)
            .ok_or_else(|| RakshaError::GridNotLoaded(name.to_string()))
    }

    /// Remove a loaded grid, returning it for reuse.
    pub fn take(&mut self, name: &str) -> Result<GridValueFunction> {
        self.grids
            .remove(name)
            .ok_or_else(|| RakshaError::GridNotLoaded(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

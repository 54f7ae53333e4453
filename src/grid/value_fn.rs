//! Interpolated queries over a precomputed grid value function.
//!
//! # Multilinear interpolation
//!
//! For a query state the enclosing cell is found per axis via
//! `floor`/`ceil` of `(state - gmin) / gdx`; periodic axes wrap both
//! indices into `[0, N)`, non-periodic axes clamp (constant extension
//! outside the grid). All `2^D` cell corners are enumerated by bit
//! pattern and weighted by the product, over axes, of the distance to the
//! opposite corner normalized by the spacing:
//!
//! ```text
//! w(corner) = Π_i  (bit_i ? t_i : 1 - t_i),   t_i = frac((s_i - gmin_i) / gdx_i)
//! ```
//!
//! A state exactly on a grid line collapses that axis to the single
//! coincident grid point with full weight, so grid-aligned queries return
//! the stored datum exactly.

use crate::core::check_dim;
use crate::error::Result;
use crate::grid::GridData;

/// Gradient estimation strategy over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMethod {
    /// Centered finite difference, evaluating the interpolant at
    /// `state ± gdx/2` per axis. Continuous everywhere; the default.
    #[default]
    CenteredDifference,
    /// Difference of the interpolant pinned to the enclosing cell's low
    /// and high grid lines per axis. Piecewise constant along the axis
    /// within a cell; a clamped degenerate axis contributes zero.
    CellEdge,
}

/// Interpolated value and gradient queries over an immutable [`GridData`].
#[derive(Debug, Clone)]
pub struct GridValueFunction {
    grid: GridData,
    strides: Vec<usize>,
    method: GradientMethod,
}

impl GridValueFunction {
    /// Wrap validated grid data. The data is immutable from here on.
    pub fn new(grid: GridData) -> Result<Self> {
        let strides = grid.strides();
        Ok(Self {
            grid,
            strides,
            method: GradientMethod::default(),
        })
    }

    /// Select a gradient strategy (builder style).
    pub fn with_gradient_method(mut self, method: GradientMethod) -> Self {
        self.method = method;
        self
    }

    /// Number of axes.
    #[inline]
    pub fn dim(&self) -> usize {
        self.grid.dim()
    }

    /// The active gradient strategy.
    pub fn gradient_method(&self) -> GradientMethod {
        self.method
    }

    /// Backing grid metadata (read-only).
    pub fn grid(&self) -> &GridData {
        &self.grid
    }

    /// Stored datum at exact grid indices. Out-of-range indices clamp to
    /// the boundary, matching the interpolant's constant extension.
    pub fn value_at_index(&self, index: &[usize]) -> Result<f64> {
        if index.len() != self.dim() {
            return Err(crate::error::RakshaError::DimensionMismatch {
                expected: self.dim(),
                actual: index.len(),
            });
        }
        let mut flat = 0usize;
        for (i, &idx) in index.iter().enumerate() {
            flat += idx.min(self.grid.gnum[i] - 1) * self.strides[i];
        }
        Ok(self.grid.data[flat])
    }

    /// Grid-line coordinates along one axis, for external samplers.
    pub fn axis_coords(&self, axis: usize) -> Vec<f64> {
        (0..self.grid.gnum[axis])
            .map(|k| self.grid.gmin[axis] + k as f64 * self.grid.gdx[axis])
            .collect()
    }

    /// Enclosing low/high grid indices for a state.
    ///
    /// With `wrap == false` every axis is clamped into `[0, N)`. With
    /// `wrap == true` periodic axes wrap and non-periodic axes clamp —
    /// the contract used by external grid-sampling callers. [`value`]
    /// computes its own periodic correction rather than relying on the
    /// clamped form.
    ///
    /// [`value`]: GridValueFunction::value
    pub fn indices_for(&self, state: &[f64], wrap: bool) -> Result<(Vec<usize>, Vec<usize>)> {
        check_dim(state, self.dim())?;
        let d = self.dim();
        let mut low = Vec::with_capacity(d);
        let mut high = Vec::with_capacity(d);
        for i in 0..d {
            let pos = (state[i] - self.grid.gmin[i]) / self.grid.gdx[i];
            let n = self.grid.gnum[i] as i64;
            let lo = pos.floor() as i64;
            let hi = pos.ceil() as i64;
            let (lo, hi) = if wrap && self.grid.periodic[i] {
                (lo.rem_euclid(n), hi.rem_euclid(n))
            } else {
                (lo.clamp(0, n - 1), hi.clamp(0, n - 1))
            };
            low.push(lo as usize);
            high.push(hi as usize);
        }
        Ok((low, high))
    }

    /// Interpolated value at an arbitrary state.
    ///
    /// Reduces to bilinear/trilinear interpolation for 2/3 axes and
    /// returns the stored datum exactly on grid points. Outside a
    /// non-periodic axis the field extends constantly.
    pub fn value(&self, state: &[f64]) -> Result<f64> {
        check_dim(state, self.dim())?;
        let d = self.dim();
        let mut low = vec![0usize; d];
        let mut high = vec![0usize; d];
        let mut frac = vec![0.0f64; d];

        for i in 0..d {
            let pos = (state[i] - self.grid.gmin[i]) / self.grid.gdx[i];
            let n = self.grid.gnum[i] as i64;
            let lo = pos.floor();
            let hi = pos.ceil();
            let (li, hi_idx) = if self.grid.periodic[i] {
                ((lo as i64).rem_euclid(n), (hi as i64).rem_euclid(n))
            } else {
                ((lo as i64).clamp(0, n - 1), (hi as i64).clamp(0, n - 1))
            };
            low[i] = li as usize;
            high[i] = hi_idx as usize;
            // A collapsed axis (on a grid line, or clamped outside the
            // grid) puts full weight on the coincident point.
            frac[i] = if li == hi_idx { 0.0 } else { pos - lo };
        }

        let mut acc = 0.0;
        for corner in 0..(1usize << d) {
            let mut w = 1.0;
            let mut flat = 0usize;
            for i in 0..d {
                if corner & (1 << i) != 0 {
                    w *= frac[i];
                    flat += high[i] * self.strides[i];
                } else {
                    w *= 1.0 - frac[i];
                    flat += low[i] * self.strides[i];
                }
            }
            if w != 0.0 {
                acc += w * self.grid.data[flat];
            }
        }
        Ok(acc)
    }

    /// Spatial gradient of [`value`] using the active strategy.
    ///
    /// [`value`]: GridValueFunction::value
    pub fn gradient(&self, state: &[f64]) -> Result<Vec<f64>> {
        match self.method {
            GradientMethod::CenteredDifference => self.gradient_centered(state),
            GradientMethod::CellEdge => self.gradient_cell_edge(state),
        }
    }

    fn gradient_centered(&self, state: &[f64]) -> Result<Vec<f64>> {
        check_dim(state, self.dim())?;
        let d = self.dim();
        let mut grad = vec![0.0; d];
        let mut probe = state.to_vec();
        for i in 0..d {
            let half = self.grid.gdx[i] / 2.0;
            probe[i] = state[i] + half;
            let above = self.value(&probe)?;
            probe[i] = state[i] - half;
            let below = self.value(&probe)?;
            probe[i] = state[i];
            grad[i] = (above - below) / self.grid.gdx[i];
        }
        Ok(grad)
    }

    fn gradient_cell_edge(&self, state: &[f64]) -> Result<Vec<f64>> {
        check_dim(state, self.dim())?;
        let d = self.dim();
        let mut grad = vec![0.0; d];
        let mut probe = state.to_vec();
        for i in 0..d {
            // Pin the axis to the enclosing cell's grid lines (the upper
            // cell when exactly on a line); value() applies the periodic
            // or clamping correction, so a clamped axis differences two
            // identical samples and yields zero.
            let lo = ((state[i] - self.grid.gmin[i]) / self.grid.gdx[i]).floor();
            let x_lo = self.grid.gmin[i] + lo * self.grid.gdx[i];
            probe[i] = x_lo + self.grid.gdx[i];
            let above = self.value(&probe)?;
            probe[i] = x_lo;
            let below = self.value(&probe)?;
            probe[i] = state[i];
            grad[i] = (above - below) / self.grid.gdx[i];
        }
        Ok(grad)
    }
}

//! A positioned obstacle: a safe-set palette plus a collision footprint.

use crate::core::check_dim;
use crate::error::Result;
use crate::sets::{SafeSet, SafeSetPalette};

/// One obstacle in the world.
///
/// The palette holds the avoidance margin estimates; the footprint is a
/// separate, usually tighter set used only for physical contact detection.
/// Every query translates the global state into obstacle-relative
/// coordinates by subtracting the offset first.
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Position offset in full state coordinates (zero in non-positional
    /// components).
    offset: Vec<f64>,
    sets: SafeSetPalette,
    footprint: SafeSet,
}

impl Obstacle {
    /// Build an obstacle. The offset must span the palette's state space;
    /// the footprint evaluates over the leading components of the
    /// obstacle-relative state (the positional prefix).
    pub fn new(offset: Vec<f64>, sets: SafeSetPalette, footprint: SafeSet) -> Result<Self> {
        check_dim(&offset, sets.dim())?;
        Ok(Self {
            offset,
            sets,
            footprint,
        })
    }

    /// Obstacle with a single avoidance estimate (palette of one).
    pub fn with_set(offset: Vec<f64>, set: SafeSet, footprint: SafeSet) -> Result<Self> {
        Self::new(offset, SafeSetPalette::single(set), footprint)
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    pub fn palette(&self) -> &SafeSetPalette {
        &self.sets
    }

    fn relative(&self, state: &[f64]) -> Result<Vec<f64>> {
        check_dim(state, self.offset.len())?;
        Ok(state
            .iter()
            .zip(self.offset.iter())
            .map(|(s, o)| s - o)
            .collect())
    }

    /// Avoidance margin of the selected palette estimate.
    pub fn value(&self, set_id: usize, state: &[f64]) -> Result<f64> {
        let rel = self.relative(state)?;
        self.sets.value(set_id, &rel)
    }

    /// Gradient of the selected palette estimate. Translation is a pure
    /// shift, so the obstacle-relative gradient is the global one.
    pub fn gradient(&self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        let rel = self.relative(state)?;
        self.sets.gradient(set_id, &rel)
    }

    /// Contact margin against the collision footprint (never the
    /// override trigger).
    pub fn collision_value(&self, state: &[f64]) -> Result<f64> {
        let rel = self.relative(state)?;
        self.footprint.value(&rel[..self.footprint.dim().min(rel.len())])
    }
}

//! Indexed palette of interchangeable safety sets.
//!
//! Entries are alternative estimates of the same margin for the same state
//! space (e.g. raw, pixelwise, conservative), selectable at runtime by a
//! stable integer id. They are not distinct obstacles.

use crate::error::{RakshaError, Result};
use crate::sets::SafeSet;

/// Ordered, equal-dimension collection of [`SafeSet`]s.
#[derive(Debug, Clone)]
pub struct SafeSetPalette {
    sets: Vec<SafeSet>,
}

impl SafeSetPalette {
    /// Build a palette; all entries must share one state-space dimension.
    pub fn new(sets: Vec<SafeSet>) -> Result<Self> {
        let first = sets
            .first()
            .ok_or_else(|| RakshaError::Config("empty safe-set palette".into()))?;
        let dim = first.dim();
        for set in &sets {
            if set.dim() != dim {
                return Err(RakshaError::DimensionMismatch {
                    expected: dim,
                    actual: set.dim(),
                });
            }
        }
        Ok(Self { sets })
    }

    /// Palette of one, for obstacles with a single estimate.
    pub fn single(set: SafeSet) -> Self {
        Self { sets: vec![set] }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Shared state-space dimension of every entry.
    pub fn dim(&self) -> usize {
        self.sets[0].dim()
    }

    fn get(&self, set_id: usize) -> Result<&SafeSet> {
        self.sets.get(set_id).ok_or(RakshaError::PaletteIndex {
            index: set_id,
            len: self.sets.len(),
        })
    }

    /// Margin of the selected estimate. Out-of-range ids are an error,
    /// never clamped.
    pub fn value(&self, set_id: usize, state: &[f64]) -> Result<f64> {
        self.get(set_id)?.value(state)
    }

    /// Gradient of the selected estimate.
    pub fn gradient(&self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        self.get(set_id)?.gradient(state)
    }
}

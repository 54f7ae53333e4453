//! World model: obstacles, their aggregate, and partial observability.

mod masked;
mod obstacle;
mod scape;

pub use masked::{MaskedObstaclescape, DEFAULT_DETECTION_PROBABILITY};
pub use obstacle::Obstacle;
pub use scape::{CollisionHit, Obstaclescape, ALWAYS_SAFE};

use crate::error::Result;

/// The seam between the world model and the intervention controller:
/// anything that can report a safety margin and its gradient for a
/// palette id. Methods take `&mut self` because masked implementations
/// refresh their detection flags before delegating.
pub trait SafetyMargin {
    fn safety_value(&mut self, set_id: usize, state: &[f64]) -> Result<f64>;
    fn safety_gradient(&mut self, set_id: usize, state: &[f64]) -> Result<Vec<f64>>;
}

impl SafetyMargin for Obstaclescape {
    fn safety_value(&mut self, set_id: usize, state: &[f64]) -> Result<f64> {
        self.value(set_id, state)
    }

    fn safety_gradient(&mut self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        self.gradient(set_id, state)
    }
}

impl SafetyMargin for MaskedObstaclescape {
    fn safety_value(&mut self, set_id: usize, state: &[f64]) -> Result<f64> {
        self.value(set_id, state)
    }

    fn safety_gradient(&mut self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        self.gradient(set_id, state)
    }
}

impl SafetyMargin for crate::sets::SafeSetPalette {
    fn safety_value(&mut self, set_id: usize, state: &[f64]) -> Result<f64> {
        self.value(set_id, state)
    }

    fn safety_gradient(&mut self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        self.gradient(set_id, state)
    }
}

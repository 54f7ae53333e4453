//! Partial observability: a resampled per-obstacle detection mask.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::world::{CollisionHit, Obstaclescape};

/// Default probability that an obstacle is detected after a resample.
pub const DEFAULT_DETECTION_PROBABILITY: f64 = 0.8;

/// Wraps an [`Obstaclescape`] with an independently sampled detection
/// mask. The mask is redrawn on an external trigger (typically the
/// goal-reached event) and pushed into the wrapped scape's `undetected`
/// flags before every query.
#[derive(Debug)]
pub struct MaskedObstaclescape {
    scape: Obstaclescape,
    /// Per-obstacle detection state; `true` = detected.
    mask: Vec<bool>,
    detection_probability: f64,
    rng: StdRng,
}

impl MaskedObstaclescape {
    /// Wrap a scape. Seed 0 draws the RNG from OS entropy; any other
    /// seed gives a deterministic mask sequence. The initial mask has
    /// every obstacle detected until the first resample.
    pub fn new(scape: Obstaclescape, detection_probability: f64, seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(seed)
        };
        let mask = vec![true; scape.len()];
        Self {
            scape,
            mask,
            detection_probability,
            rng,
        }
    }

    /// Redraw the mask: each obstacle is independently detected with the
    /// configured probability.
    pub fn resample_mask(&mut self) {
        for detected in &mut self.mask {
            *detected = self.rng.random_bool(self.detection_probability);
        }
        log::debug!(
            "detection mask resampled: {} of {} obstacles detected",
            self.mask.iter().filter(|&&d| d).count(),
            self.mask.len()
        );
    }

    /// Overwrite the mask directly, for scripted scenarios and tests.
    pub fn set_mask(&mut self, mask: Vec<bool>) {
        assert_eq!(
            mask.len(),
            self.scape.len(),
            "mask length must match obstacle count"
        );
        self.mask = mask;
    }

    fn push_mask(&mut self) {
        for (i, &detected) in self.mask.iter().enumerate() {
            self.scape.set_undetected(i, !detected);
        }
    }

    /// Current detection mask (`true` = detected).
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// The complement of the mask, as reported in telemetry.
    pub fn undetection_mask(&self) -> Vec<bool> {
        self.mask.iter().map(|&d| !d).collect()
    }

    /// Permanently remove an obstacle (delegated).
    pub fn destroy(&mut self, index: usize) {
        self.scape.destroy(index);
    }

    /// Read access to the wrapped scape.
    pub fn scape(&self) -> &Obstaclescape {
        &self.scape
    }

    /// Union margin with the current mask applied.
    pub fn value(&mut self, set_id: usize, state: &[f64]) -> Result<f64> {
        self.push_mask();
        self.scape.value(set_id, state)
    }

    /// Dominant-obstacle gradient with the current mask applied.
    pub fn gradient(&mut self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        self.push_mask();
        self.scape.gradient(set_id, state)
    }

    /// Contact scan over currently undetected obstacles.
    pub fn nearest_collision(&mut self, state: &[f64]) -> Result<Option<CollisionHit>> {
        self.push_mask();
        self.scape.nearest_collision(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::{Circle, SafeSet};
    use crate::world::Obstacle;

    fn disk_at(x: f64, y: f64) -> Obstacle {
        Obstacle::with_set(
            vec![x, y],
            SafeSet::Circle(Circle::new(1.0)),
            SafeSet::Circle(Circle::new(0.5)),
        )
        .unwrap()
    }

    fn many_disks(n: usize) -> Obstaclescape {
        Obstaclescape::new((0..n).map(|i| disk_at(i as f64 * 3.0, 0.0)).collect())
    }

    #[test]
    fn test_initial_mask_all_detected() {
        let masked = MaskedObstaclescape::new(many_disks(4), 0.8, 7);
        assert_eq!(masked.mask(), &[true; 4]);
    }

    #[test]
    fn test_resample_deterministic_under_seed() {
        let mut a = MaskedObstaclescape::new(many_disks(16), 0.8, 42);
        let mut b = MaskedObstaclescape::new(many_disks(16), 0.8, 42);
        a.resample_mask();
        b.resample_mask();
        assert_eq!(a.mask(), b.mask());
    }

    #[test]
    fn test_probability_extremes() {
        let mut all = MaskedObstaclescape::new(many_disks(8), 1.0, 3);
        all.resample_mask();
        assert!(all.mask().iter().all(|&d| d));

        let mut none = MaskedObstaclescape::new(many_disks(8), 0.0, 3);
        none.resample_mask();
        assert!(none.mask().iter().all(|&d| !d));
    }

    #[test]
    fn test_mask_pushed_before_queries() {
        // With nothing detected, the union is the always-safe sentinel
        // and every obstacle becomes a collision candidate.
        let mut masked = MaskedObstaclescape::new(many_disks(2), 0.0, 5);
        masked.resample_mask();
        let v = masked.value(0, &[0.0, 0.0]).unwrap();
        assert_eq!(v, crate::world::ALWAYS_SAFE);
        let hit = masked.nearest_collision(&[0.0, 0.0]).unwrap().unwrap();
        assert_eq!(hit.obstacle, 0);
    }

    #[test]
    fn test_undetection_mask_is_complement() {
        let mut masked = MaskedObstaclescape::new(many_disks(3), 0.0, 9);
        masked.resample_mask();
        assert_eq!(masked.undetection_mask(), vec![true, true, true]);
    }
}

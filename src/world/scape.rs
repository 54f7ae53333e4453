//! Aggregate of obstacles with union queries and exclusion flags.

use crate::error::Result;
use crate::world::Obstacle;

/// Sentinel margin reported when no obstacle is eligible: effectively
/// "always safe". A documented constant, not a domain-meaningful number.
pub const ALWAYS_SAFE: f64 = 1.0e6;

/// A contact candidate found by [`Obstaclescape::nearest_collision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Index of the obstacle whose footprint attained the minimum.
    pub obstacle: usize,
    /// Footprint margin; contact when non-positive.
    pub value: f64,
}

/// Ordered obstacles plus per-obstacle exclusion flags.
///
/// `destroyed` removes an obstacle permanently (e.g. cleared from the
/// scenario); `undetected` excludes it transiently (out of sensor range).
/// The avoidance union runs over `!destroyed && !undetected`; collision
/// detection runs over `!destroyed && undetected` only — the robot
/// collides with what it cannot see. That asymmetry is an intentional
/// scenario rule, preserved exactly.
#[derive(Debug, Clone)]
pub struct Obstaclescape {
    obstacles: Vec<Obstacle>,
    destroyed: Vec<bool>,
    undetected: Vec<bool>,
}

impl Obstaclescape {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        let n = obstacles.len();
        Self {
            obstacles,
            destroyed: vec![false; n],
            undetected: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn obstacle(&self, index: usize) -> &Obstacle {
        &self.obstacles[index]
    }

    /// Permanently remove an obstacle from every query.
    pub fn destroy(&mut self, index: usize) {
        log::info!("obstacle {} destroyed", index);
        self.destroyed[index] = true;
    }

    pub fn is_destroyed(&self, index: usize) -> bool {
        self.destroyed[index]
    }

    /// Transiently exclude (or re-include) an obstacle from detection.
    pub fn set_undetected(&mut self, index: usize, undetected: bool) {
        self.undetected[index] = undetected;
    }

    pub fn is_undetected(&self, index: usize) -> bool {
        self.undetected[index]
    }

    #[inline]
    fn avoid_eligible(&self, index: usize) -> bool {
        !self.destroyed[index] && !self.undetected[index]
    }

    #[inline]
    fn collision_eligible(&self, index: usize) -> bool {
        !self.destroyed[index] && self.undetected[index]
    }

    /// Index of the dominant obstacle: the eligible one attaining the
    /// minimal margin. Strict comparison keeps the first obstacle in
    /// iteration order on ties; `value`, `gradient`, and the collision
    /// scan all share this rule.
    pub fn dominant(&self, set_id: usize, state: &[f64]) -> Result<Option<usize>> {
        let mut best: Option<(usize, f64)> = None;
        for (i, obs) in self.obstacles.iter().enumerate() {
            if !self.avoid_eligible(i) {
                continue;
            }
            let v = obs.value(set_id, state)?;
            if best.map_or(true, |(_, bv)| v < bv) {
                best = Some((i, v));
            }
        }
        Ok(best.map(|(i, _)| i))
    }

    /// Union margin: minimum over eligible obstacles, [`ALWAYS_SAFE`]
    /// when none is eligible (a local recovery, not an error).
    pub fn value(&self, set_id: usize, state: &[f64]) -> Result<f64> {
        let mut best = ALWAYS_SAFE;
        let mut any = false;
        for (i, obs) in self.obstacles.iter().enumerate() {
            if !self.avoid_eligible(i) {
                continue;
            }
            let v = obs.value(set_id, state)?;
            if !any || v < best {
                best = v;
                any = true;
            }
        }
        Ok(if any { best } else { ALWAYS_SAFE })
    }

    /// Gradient of the dominant obstacle, re-scanned with the same
    /// eligibility filter and dominance rule as [`value`]; the zero
    /// vector when no obstacle is eligible.
    ///
    /// [`value`]: Obstaclescape::value
    pub fn gradient(&self, set_id: usize, state: &[f64]) -> Result<Vec<f64>> {
        match self.dominant(set_id, state)? {
            Some(i) => self.obstacles[i].gradient(set_id, state),
            None => Ok(vec![0.0; state.len()]),
        }
    }

    /// Nearest contact candidate among obstacles the robot cannot
    /// currently sense (`!destroyed && undetected`).
    pub fn nearest_collision(&self, state: &[f64]) -> Result<Option<CollisionHit>> {
        let mut best: Option<CollisionHit> = None;
        for (i, obs) in self.obstacles.iter().enumerate() {
            if !self.collision_eligible(i) {
                continue;
            }
            let v = obs.collision_value(state)?;
            if best.map_or(true, |hit| v < hit.value) {
                best = Some(CollisionHit {
                    obstacle: i,
                    value: v,
                });
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::{Circle, SafeSet};
    use approx::assert_relative_eq;

    fn two_disks() -> Obstaclescape {
        let near = Obstacle::with_set(
            vec![0.0, 0.0],
            SafeSet::Circle(Circle::new(1.0)),
            SafeSet::Circle(Circle::new(0.5)),
        )
        .unwrap();
        let far = Obstacle::with_set(
            vec![5.0, 5.0],
            SafeSet::Circle(Circle::new(1.0)),
            SafeSet::Circle(Circle::new(0.5)),
        )
        .unwrap();
        Obstaclescape::new(vec![near, far])
    }

    #[test]
    fn test_union_tracks_nearer_obstacle() {
        let scape = two_disks();
        let state = [0.1, 0.1];
        let near_value = scape.obstacle(0).value(0, &state).unwrap();
        assert_relative_eq!(scape.value(0, &state).unwrap(), near_value);
        assert_eq!(scape.dominant(0, &state).unwrap(), Some(0));
    }

    #[test]
    fn test_destroy_flips_dominance() {
        let mut scape = two_disks();
        let state = [0.1, 0.1];
        scape.destroy(0);
        assert_eq!(scape.dominant(0, &state).unwrap(), Some(1));
        let far_value = scape.obstacle(1).value(0, &state).unwrap();
        assert_relative_eq!(scape.value(0, &state).unwrap(), far_value);
    }

    #[test]
    fn test_no_eligible_obstacle_is_always_safe() {
        let mut scape = two_disks();
        scape.destroy(0);
        scape.set_undetected(1, true);
        assert_relative_eq!(scape.value(0, &[0.0, 0.0]).unwrap(), ALWAYS_SAFE);
        assert_eq!(scape.gradient(0, &[0.0, 0.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_gradient_matches_dominant_obstacle() {
        let scape = two_disks();
        let state = [0.1, 0.1];
        let dominant = scape.dominant(0, &state).unwrap().unwrap();
        assert_eq!(
            scape.gradient(0, &state).unwrap(),
            scape.obstacle(dominant).gradient(0, &state).unwrap()
        );
    }

    #[test]
    fn test_dominance_tie_keeps_first() {
        // Two identical obstacles at the same offset: equal margins.
        let a = Obstacle::with_set(
            vec![1.0, 0.0],
            SafeSet::Circle(Circle::new(1.0)),
            SafeSet::Circle(Circle::new(0.5)),
        )
        .unwrap();
        let b = a.clone();
        let scape = Obstaclescape::new(vec![a, b]);
        assert_eq!(scape.dominant(0, &[3.0, 0.0]).unwrap(), Some(0));
    }

    #[test]
    fn test_collision_scans_undetected_only() {
        let mut scape = two_disks();
        // Both detected: nothing eligible for contact checks.
        assert!(scape.nearest_collision(&[0.0, 0.0]).unwrap().is_none());
        // Losing detection of the near obstacle makes it a silent hazard.
        scape.set_undetected(0, true);
        let hit = scape.nearest_collision(&[0.0, 0.0]).unwrap().unwrap();
        assert_eq!(hit.obstacle, 0);
        assert!(hit.value < 0.0);
    }

    #[test]
    fn test_destroyed_obstacle_never_collides() {
        let mut scape = two_disks();
        scape.set_undetected(0, true);
        scape.destroy(0);
        assert!(scape.nearest_collision(&[0.0, 0.0]).unwrap().is_none());
    }
}

//! Safety value functions and their composition operators.
//!
//! A [`SafeSet`] answers `value(state)` (positive = safe, non-positive =
//! violating) and `gradient(state)` (spatial gradient of the value, same
//! sign convention). The complete variant set is known and fixed, so it is
//! a closed enum rather than an open hierarchy:
//!
//! - analytic shapes ([`Interval`], [`Circle`], [`DoubleIntegrator`]),
//! - precomputed grids ([`GridValueFunction`]),
//! - [`SafeSet::union`] — pointwise minimum of two sets over the same state,
//! - [`SafeSet::coupled`] — two independent low-dimensional sets over a
//!   concatenated state, combined with `max` (the system is unsafe only if
//!   both subsystems are simultaneously unsafe along their own axes).

mod analytic;
mod palette;

pub use analytic::{Circle, DoubleIntegrator, Interval};
pub use palette::SafeSetPalette;

use crate::core::check_dim;
use crate::error::{RakshaError, Result};
use crate::grid::GridValueFunction;

/// A safety value function over some fixed-dimension state space.
#[derive(Debug, Clone)]
pub enum SafeSet {
    Interval(Interval),
    Circle(Circle),
    DoubleIntegrator(DoubleIntegrator),
    Grid(GridValueFunction),
    Union(Box<SafeSet>, Box<SafeSet>),
    CoupledPair {
        first: Box<SafeSet>,
        /// State components `[0, split)` go to `first`, the rest to `second`.
        split: usize,
        second: Box<SafeSet>,
    },
}

impl SafeSet {
    /// Pointwise minimum of two sets over the same state space.
    pub fn union(a: SafeSet, b: SafeSet) -> Result<SafeSet> {
        if a.dim() != b.dim() {
            return Err(RakshaError::DimensionMismatch {
                expected: a.dim(),
                actual: b.dim(),
            });
        }
        Ok(SafeSet::Union(Box::new(a), Box::new(b)))
    }

    /// Axis-decoupled pairing over the concatenated state.
    pub fn coupled(first: SafeSet, second: SafeSet) -> SafeSet {
        let split = first.dim();
        SafeSet::CoupledPair {
            first: Box::new(first),
            split,
            second: Box::new(second),
        }
    }

    /// Dimension of the state space this set is defined over.
    pub fn dim(&self) -> usize {
        match self {
            SafeSet::Interval(_) => 1,
            SafeSet::Circle(_) | SafeSet::DoubleIntegrator(_) => 2,
            SafeSet::Grid(g) => g.dim(),
            SafeSet::Union(a, _) => a.dim(),
            SafeSet::CoupledPair { split, second, .. } => split + second.dim(),
        }
    }

    /// Signed safety margin at a state.
    pub fn value(&self, state: &[f64]) -> Result<f64> {
        match self {
            SafeSet::Interval(s) => s.value(state),
            SafeSet::Circle(s) => s.value(state),
            SafeSet::DoubleIntegrator(s) => s.value(state),
            SafeSet::Grid(g) => g.value(state),
            SafeSet::Union(a, b) => Ok(a.value(state)?.min(b.value(state)?)),
            SafeSet::CoupledPair {
                first,
                split,
                second,
            } => {
                check_dim(state, self.dim())?;
                let head = first.value(&state[..*split])?;
                let tail = second.value(&state[*split..])?;
                Ok(head.max(tail))
            }
        }
    }

    /// Spatial gradient of [`value`](SafeSet::value).
    ///
    /// At a union kink the gradient of the currently-minimal branch is
    /// returned; both child values are re-evaluated inside this call (the
    /// dominance decision is never cached across calls) and ties resolve
    /// to the second operand. The coupled pair fills only the dominant
    /// (max-attaining) subsystem's components, ties likewise to the
    /// second subsystem.
    pub fn gradient(&self, state: &[f64]) -> Result<Vec<f64>> {
        match self {
            SafeSet::Interval(s) => s.gradient(state),
            SafeSet::Circle(s) => s.gradient(state),
            SafeSet::DoubleIntegrator(s) => s.gradient(state),
            SafeSet::Grid(g) => g.gradient(state),
            SafeSet::Union(a, b) => {
                if a.value(state)? < b.value(state)? {
                    a.gradient(state)
                } else {
                    b.gradient(state)
                }
            }
            SafeSet::CoupledPair {
                first,
                split,
                second,
            } => {
                check_dim(state, self.dim())?;
                let head = first.value(&state[..*split])?;
                let tail = second.value(&state[*split..])?;
                let mut grad = vec![0.0; state.len()];
                if head > tail {
                    grad[..*split].copy_from_slice(&first.gradient(&state[..*split])?);
                } else {
                    grad[*split..].copy_from_slice(&second.gradient(&state[*split..])?);
                }
                Ok(grad)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn disk(radius: f64) -> SafeSet {
        SafeSet::Circle(Circle::new(radius))
    }

    #[test]
    fn test_union_is_pointwise_min() {
        let set = SafeSet::union(disk(1.0), disk(2.0)).unwrap();
        let state = [3.0, 0.0];
        assert_relative_eq!(set.value(&state).unwrap(), 1.0);
    }

    #[test]
    fn test_union_gradient_follows_min_branch() {
        let a = SafeSet::Interval(Interval::new(0.0, 1.0));
        let b = SafeSet::Interval(Interval::new(-10.0, 10.0));
        let set = SafeSet::union(a, b).unwrap();
        // Margin of a at 0.9 is 0.1; of b is 9.1 -> a's branch (-1).
        assert_eq!(set.gradient(&[0.9]).unwrap(), vec![-1.0]);
    }

    #[test]
    fn test_union_tie_breaks_to_second() {
        let a = SafeSet::Interval(Interval::new(0.0, 2.0));
        let b = SafeSet::Interval(Interval::new(-1.0, 1.0));
        let set = SafeSet::union(a, b).unwrap();
        // At x = 0.5 both margins are 0.5; b's active branch is upper (-1),
        // a's is lower (+1). The tie must resolve to b.
        assert_relative_eq!(set.value(&[0.5]).unwrap(), 0.5);
        assert_eq!(set.gradient(&[0.5]).unwrap(), vec![-1.0]);
    }

    #[test]
    fn test_union_rejects_mixed_dims() {
        let err = SafeSet::union(disk(1.0), SafeSet::Interval(Interval::new(0.0, 1.0)));
        assert!(err.is_err());
    }

    #[test]
    fn test_coupled_pair_takes_worse_subsystem() {
        // Position band x in [0, 10], velocity band v in [-1, 1].
        let pos = SafeSet::Interval(Interval::new(0.0, 10.0));
        let vel = SafeSet::Interval(Interval::new(-1.0, 1.0));
        let set = SafeSet::coupled(pos, vel);
        assert_eq!(set.dim(), 2);
        // Position margin 2, velocity margin -1 (violating): max is 2,
        // the overall state still counts as safe.
        assert_relative_eq!(set.value(&[2.0, 2.0]).unwrap(), 2.0);
        // Both violating: max of (-2, -1) = -1, unsafe.
        assert_relative_eq!(set.value(&[-2.0, 2.0]).unwrap(), -1.0);
    }

    #[test]
    fn test_coupled_pair_gradient_zeroes_recessive_side() {
        let pos = SafeSet::Interval(Interval::new(0.0, 10.0));
        let vel = SafeSet::Interval(Interval::new(-1.0, 1.0));
        let set = SafeSet::coupled(pos, vel);
        // Position margin 4 dominates velocity margin 0.5.
        let g = set.gradient(&[4.0, 0.5]).unwrap();
        assert_eq!(g, vec![1.0, 0.0]);
        // Velocity dominates when its margin is the larger one.
        let g = set.gradient(&[0.1, 0.0]).unwrap();
        assert_eq!(g[0], 0.0);
        assert_ne!(g[1], 0.0);
    }

    #[test]
    fn test_coupled_pair_dimension_check() {
        let pos = SafeSet::Interval(Interval::new(0.0, 10.0));
        let vel = SafeSet::Interval(Interval::new(-1.0, 1.0));
        let set = SafeSet::coupled(pos, vel);
        assert!(set.value(&[1.0]).is_err());
    }

    #[test]
    fn test_nested_union_of_grid_and_circle() {
        use crate::grid::GridData;
        let flat = GridValueFunction::new(
            GridData::new(
                vec![-1.0, -1.0],
                vec![1.0, 1.0],
                vec![3, 3],
                vec![false, false],
                vec![0.5; 9],
            )
            .unwrap(),
        )
        .unwrap();
        let set = SafeSet::union(SafeSet::Grid(flat), disk(1.0)).unwrap();
        // Far from the disk the constant grid dominates the min.
        assert_relative_eq!(set.value(&[5.0, 0.0]).unwrap(), 0.5);
    }
}

//! Control-affine dynamics and explicit forward-Euler integration.
//!
//! Every robot kind satisfies the same contract:
//!
//! ```text
//! state' = drift(state) + B(state) · u
//! ```
//!
//! Only the drift term and the control coefficient matrix differ per
//! kind; integration and orientation wraparound are shared.

use crate::core::math::normalize_angle;
use crate::core::{check_dim, Point2};
use crate::error::Result;

/// Control-affine state-update contract shared by all robot kinds.
pub trait ControlAffine {
    fn state_dim(&self) -> usize;

    fn control_dim(&self) -> usize;

    /// Drift term `f(x)`.
    fn drift(&self, state: &[f64]) -> Vec<f64>;

    /// Control coefficient matrix `B(x)`, one column per control axis.
    fn control_matrix(&self, state: &[f64]) -> Vec<Vec<f64>>;

    /// Indices of orientation components, wrapped into `(-π, π]` after
    /// each integration step.
    fn wrapped_angles(&self) -> &[usize] {
        &[]
    }

    /// Planar position of a state; every shipped kind stores position
    /// in the first two components.
    fn position(&self, state: &[f64]) -> Point2 {
        Point2::new(state[0], state[1])
    }
}

/// One explicit forward-Euler step: `state + (f + B·u)·dt`, then wrap
/// the orientation components.
pub fn integrate(
    dynamics: &dyn ControlAffine,
    state: &[f64],
    control: &[f64],
    dt: f64,
) -> Result<Vec<f64>> {
    check_dim(state, dynamics.state_dim())?;
    check_dim(control, dynamics.control_dim())?;
    let drift = dynamics.drift(state);
    let b = dynamics.control_matrix(state);
    let mut next = state.to_vec();
    for (i, x) in next.iter_mut().enumerate() {
        let mut dot = drift[i];
        for (j, col) in b.iter().enumerate() {
            dot += col[i] * control[j];
        }
        *x += dot * dt;
    }
    for &idx in dynamics.wrapped_angles() {
        next[idx] = normalize_angle(next[idx]);
    }
    Ok(next)
}

/// Velocity-controlled planar robot: state `[x, y]`, control `[vx, vy]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityRobot2;

impl ControlAffine for VelocityRobot2 {
    fn state_dim(&self) -> usize {
        2
    }

    fn control_dim(&self) -> usize {
        2
    }

    fn drift(&self, _state: &[f64]) -> Vec<f64> {
        vec![0.0, 0.0]
    }

    fn control_matrix(&self, _state: &[f64]) -> Vec<Vec<f64>> {
        vec![vec![1.0, 0.0], vec![0.0, 1.0]]
    }
}

/// Acceleration-controlled planar robot: state `[x, y, vx, vy]`,
/// control `[ax, ay]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleIntegrator2;

impl ControlAffine for DoubleIntegrator2 {
    fn state_dim(&self) -> usize {
        4
    }

    fn control_dim(&self) -> usize {
        2
    }

    fn drift(&self, state: &[f64]) -> Vec<f64> {
        vec![state[2], state[3], 0.0, 0.0]
    }

    fn control_matrix(&self, _state: &[f64]) -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0, 1.0, 0.0], vec![0.0, 0.0, 0.0, 1.0]]
    }
}

/// Unicycle: state `[x, y, θ]`, control `[v, ω]`. The coefficient
/// matrix is state-dependent and the heading wraps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unicycle;

const UNICYCLE_ANGLES: [usize; 1] = [2];

impl ControlAffine for Unicycle {
    fn state_dim(&self) -> usize {
        3
    }

    fn control_dim(&self) -> usize {
        2
    }

    fn drift(&self, _state: &[f64]) -> Vec<f64> {
        vec![0.0, 0.0, 0.0]
    }

    fn control_matrix(&self, state: &[f64]) -> Vec<Vec<f64>> {
        let theta = state[2];
        vec![vec![theta.cos(), theta.sin(), 0.0], vec![0.0, 0.0, 1.0]]
    }

    fn wrapped_angles(&self) -> &[usize] {
        &UNICYCLE_ANGLES
    }
}

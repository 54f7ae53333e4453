//! The least-restrictive intervention layer.
//!
//! Every control tick the safety margin is compared against the trigger
//! level: while it holds, the nominal tracking control passes through
//! unmodified; once violated, the output switches to the worst-case
//! optimal avoidance input computed from the margin's gradient and the
//! dynamics' control coefficient matrix. There is no hysteresis and no
//! terminal state.

use crate::control::TrackingPolicy;
use crate::core::{dot, Point2};
use crate::dynamics::ControlAffine;
use crate::error::Result;
use crate::world::SafetyMargin;

/// Controller mode, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Nominal tracking control passes through.
    #[default]
    Tracking,
    /// Bang-bang avoidance control from the safety gradient.
    Override,
}

/// Configuration for the intervention layer.
#[derive(Debug, Clone, Copy)]
pub struct InterventionConfig {
    /// Margin below which the override engages. Set once at setup
    /// (typically including the robot's physical half-width); never
    /// recomputed.
    pub trigger_level: f64,

    /// Per-axis bound of the box-constrained control set.
    pub max_control: f64,

    /// Palette estimate queried for margin and gradient.
    pub set_id: usize,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            trigger_level: 0.5,
            max_control: 1.0,
            set_id: 0,
        }
    }
}

/// Two-state supervisor around a nominal tracking policy.
#[derive(Debug)]
pub struct InterventionController {
    config: InterventionConfig,
    mode: ControlMode,
}

impl InterventionController {
    pub fn new(config: InterventionConfig) -> Self {
        Self {
            config,
            mode: ControlMode::Tracking,
        }
    }

    pub fn config(&self) -> &InterventionConfig {
        &self.config
    }

    /// Mode after the most recent update.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Switch the palette estimate at runtime.
    pub fn select_set(&mut self, set_id: usize) {
        self.config.set_id = set_id;
    }

    /// One control tick: evaluate the margin, transition, and produce
    /// the control vector.
    pub fn update(
        &mut self,
        safety: &mut dyn SafetyMargin,
        dynamics: &dyn ControlAffine,
        tracker: &dyn TrackingPolicy,
        state: &[f64],
        goal: &Point2,
    ) -> Result<Vec<f64>> {
        let value = safety.safety_value(self.config.set_id, state)?;
        let next = if value < self.config.trigger_level {
            ControlMode::Override
        } else {
            ControlMode::Tracking
        };
        if next != self.mode {
            match next {
                ControlMode::Override => log::warn!(
                    "safety margin {:.3} below trigger {:.3}, overriding",
                    value,
                    self.config.trigger_level
                ),
                ControlMode::Tracking => log::info!(
                    "safety margin {:.3} recovered, tracking resumes",
                    value
                ),
            }
            self.mode = next;
        }

        match self.mode {
            ControlMode::Tracking => Ok(tracker.control(state, goal)),
            ControlMode::Override => {
                let grad = safety.safety_gradient(self.config.set_id, state)?;
                Ok(self.bang_bang(dynamics, state, &grad))
            }
        }
    }

    /// Bang-bang maximization of `∇V · B u` over the box
    /// `|u_i| ≤ max_control`: each axis takes the extreme matching the
    /// sign of its coefficient column against the gradient, and exactly
    /// zero alignment yields zero output.
    pub fn bang_bang(
        &self,
        dynamics: &dyn ControlAffine,
        state: &[f64],
        gradient: &[f64],
    ) -> Vec<f64> {
        dynamics
            .control_matrix(state)
            .iter()
            .map(|col| {
                let alignment = dot(col, gradient);
                if alignment > 0.0 {
                    self.config.max_control
                } else if alignment < 0.0 {
                    -self.config.max_control
                } else {
                    0.0
                }
            })
            .collect()
    }
}

//! Raksha - Reachability-based safety-override control
//!
//! A robot tracks a goal with a nominal controller while a safety value
//! function (analytic or precomputed on a grid) continuously monitors the
//! margin to obstacles. When the margin drops below a trigger level the
//! nominal control is overridden with the worst-case-optimal bang-bang
//! avoidance input derived from the value function's gradient — the
//! Hamilton-Jacobi least-restrictive intervention pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     sim                             │  ← Tick orchestration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   control                           │  ← Tracking + override
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────────┬──────────────────────┐
//! │            world             │       dynamics       │  ← Obstacles, robots
//! └──────────────────────────────┴──────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     sets                            │  ← Value functions
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────────┬──────────────────────┐
//! │            grid              │        core          │  ← Foundation
//! └──────────────────────────────┴──────────────────────┘
//! ```
//!
//! Per control tick: robot state → union safety margin over the obstacle
//! scape → intervention decision → tracking or bang-bang control →
//! forward-Euler integration (with heading wraparound).
//!
//! Grids are loaded in an explicit phase ([`grid::GridLibrary`]) before
//! the loop starts; partial observability is a resampled per-obstacle
//! detection mask ([`world::MaskedObstaclescape`]); scenario events go to
//! an external [`telemetry::EventSink`].

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Value functions (depends on core)
// ============================================================================
pub mod grid;
pub mod sets;

// ============================================================================
// Layer 3: World and robots (depends on sets, core)
// ============================================================================
pub mod dynamics;
pub mod world;

// ============================================================================
// Layer 4: Control (depends on world, dynamics)
// ============================================================================
pub mod control;

// ============================================================================
// Layer 5: Orchestration and ambient concerns
// ============================================================================
pub mod config;
pub mod sim;
pub mod telemetry;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::{ArenaConfig, RakshaConfig, RobotConfig, SafetyConfig};
pub use control::{
    ControlMode, HeadingTracker, InterventionConfig, InterventionController, PdTracker,
    PointTracker, TrackingPolicy,
};
pub use self::core::{check_dim, dot, Point2};
pub use dynamics::{integrate, ControlAffine, DoubleIntegrator2, Unicycle, VelocityRobot2};
pub use error::{RakshaError, Result};
pub use grid::{GradientMethod, GridData, GridLibrary, GridValueFunction};
pub use sets::{Circle, DoubleIntegrator, Interval, SafeSet, SafeSetPalette};
pub use sim::SimulationContext;
pub use telemetry::{EventSink, LogSink, MemorySink, TelemetryEvent};
pub use world::{
    CollisionHit, MaskedObstaclescape, Obstacle, Obstaclescape, SafetyMargin, ALWAYS_SAFE,
};

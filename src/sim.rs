//! Tick-driven simulation context.
//!
//! Owns the mutable scenario state — clock, robot state, goal, obstacle
//! scape — and exposes one [`tick`](SimulationContext::tick) per control
//! period. Single-threaded by design: a tick is atomic with respect to
//! flag and mask mutation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ArenaConfig, RakshaConfig};
use crate::control::{ControlMode, InterventionConfig, InterventionController, TrackingPolicy};
use crate::core::Point2;
use crate::dynamics::{integrate, ControlAffine};
use crate::error::Result;
use crate::telemetry::{EventSink, LogSink, TelemetryEvent};
use crate::world::{MaskedObstaclescape, Obstaclescape};

/// One robot, one obstacle scape, one intervention controller.
pub struct SimulationContext<S: EventSink = LogSink> {
    robot_id: u32,
    state: Vec<f64>,
    goal: Point2,
    clock_us: u64,
    in_contact: bool,
    goal_tolerance: f64,
    arena: ArenaConfig,
    dynamics: Box<dyn ControlAffine>,
    tracker: Box<dyn TrackingPolicy>,
    controller: InterventionController,
    scape: MaskedObstaclescape,
    sink: S,
    rng: StdRng,
}

impl<S: EventSink> SimulationContext<S> {
    /// Wire up a scenario. The grid/set load phase must already have
    /// completed; nothing here defers.
    pub fn new(
        config: &RakshaConfig,
        dynamics: Box<dyn ControlAffine>,
        tracker: Box<dyn TrackingPolicy>,
        scape: Obstaclescape,
        initial_state: Vec<f64>,
        initial_goal: Point2,
        sink: S,
    ) -> Result<Self> {
        crate::core::check_dim(&initial_state, dynamics.state_dim())?;
        let controller = InterventionController::new(InterventionConfig {
            trigger_level: config.safety.trigger_level,
            max_control: config.robot.max_control,
            set_id: config.safety.set_id,
        });
        let scape = MaskedObstaclescape::new(
            scape,
            config.safety.detection_probability,
            config.safety.seed,
        );
        let rng = if config.safety.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.safety.seed)
        };
        Ok(Self {
            robot_id: config.robot.robot_id,
            state: initial_state,
            goal: initial_goal,
            clock_us: 0,
            in_contact: false,
            goal_tolerance: config.robot.goal_tolerance,
            arena: config.arena.clone(),
            dynamics,
            tracker,
            controller,
            scape,
            sink,
            rng,
        })
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    pub fn goal(&self) -> Point2 {
        self.goal
    }

    pub fn mode(&self) -> ControlMode {
        self.controller.mode()
    }

    pub fn clock_us(&self) -> u64 {
        self.clock_us
    }

    pub fn scape(&self) -> &MaskedObstaclescape {
        &self.scape
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Switch the palette estimate used for safety queries.
    pub fn select_set(&mut self, set_id: usize) {
        self.controller.select_set(set_id);
    }

    /// Overwrite the detection mask, for scripted scenarios.
    pub fn force_mask(&mut self, mask: Vec<bool>) {
        self.scape.set_mask(mask);
    }

    /// One control period: contact scan, intervention decision, forward
    /// integration, then the scripted goal-reached behavior.
    pub fn tick(&mut self, dt: f64) -> Result<Vec<f64>> {
        self.check_contact()?;

        let control = self.controller.update(
            &mut self.scape,
            self.dynamics.as_ref(),
            self.tracker.as_ref(),
            &self.state,
            &self.goal,
        )?;

        self.state = integrate(self.dynamics.as_ref(), &self.state, &control, dt)?;
        self.clock_us += (dt * 1e6) as u64;

        if self.goal_reached() {
            self.advance_goal();
        }

        Ok(control)
    }

    /// Contact is checked against obstacles the robot cannot currently
    /// sense; the event fires on the transition into contact.
    fn check_contact(&mut self) -> Result<()> {
        let hit = self.scape.nearest_collision(&self.state)?;
        match hit {
            Some(hit) if hit.value <= 0.0 => {
                if !self.in_contact {
                    log::warn!(
                        "collision with undetected obstacle {} (margin {:.3})",
                        hit.obstacle,
                        hit.value
                    );
                    self.sink.record(&TelemetryEvent::CollisionDetected {
                        robot_id: self.robot_id,
                        obstacle: hit.obstacle,
                        value: hit.value,
                        timestamp_us: self.clock_us,
                    });
                    self.in_contact = true;
                }
            }
            _ => self.in_contact = false,
        }
        Ok(())
    }

    fn goal_reached(&self) -> bool {
        let pos = self.dynamics.position(&self.state);
        (pos.x - self.goal.x).abs() < self.goal_tolerance
            && (pos.y - self.goal.y).abs() < self.goal_tolerance
    }

    /// Scripted scenario behavior on reaching the goal: a fresh random
    /// goal, a resampled detection mask, and one structured event.
    fn advance_goal(&mut self) {
        self.goal = Point2::new(
            self.rng.random_range(self.arena.min_x..=self.arena.max_x),
            self.rng.random_range(self.arena.min_y..=self.arena.max_y),
        );
        self.scape.resample_mask();
        log::info!(
            "goal reached, next goal ({:.2}, {:.2})",
            self.goal.x,
            self.goal.y
        );
        self.sink.record(&TelemetryEvent::GoalChanged {
            robot_id: self.robot_id,
            goal: self.goal,
            undetection_mask: self.scape.undetection_mask(),
            timestamp_us: self.clock_us,
        });
    }
}

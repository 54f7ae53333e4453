//! Configuration loading for Raksha

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct RakshaConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Robot and tracking parameters
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Identifier attached to telemetry events
    #[serde(default = "default_robot_id")]
    pub robot_id: u32,

    /// Per-axis control bound (default: 1.0)
    #[serde(default = "default_max_control")]
    pub max_control: f64,

    /// Goal tolerance per position axis in meters (default: 0.5)
    #[serde(default = "default_goal_tolerance")]
    pub goal_tolerance: f64,
}

/// Safety intervention parameters
#[derive(Clone, Debug, Deserialize)]
pub struct SafetyConfig {
    /// Margin that triggers the override; includes the robot half-width
    /// (default: 0.5)
    #[serde(default = "default_trigger_level")]
    pub trigger_level: f64,

    /// Palette estimate used for margin queries (default: 0)
    #[serde(default)]
    pub set_id: usize,

    /// Per-obstacle detection probability on a mask resample
    /// (default: 0.8)
    #[serde(default = "default_detection_probability")]
    pub detection_probability: f64,

    /// RNG seed for mask and goal draws; 0 seeds from OS entropy
    #[serde(default)]
    pub seed: u64,
}

/// Bounds for randomized goals
#[derive(Clone, Debug, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_arena_min")]
    pub min_x: f64,
    #[serde(default = "default_arena_min")]
    pub min_y: f64,
    #[serde(default = "default_arena_max")]
    pub max_x: f64,
    #[serde(default = "default_arena_max")]
    pub max_y: f64,
}

// Default value functions
fn default_robot_id() -> u32 {
    0
}
fn default_max_control() -> f64 {
    1.0
}
fn default_goal_tolerance() -> f64 {
    0.5
}
fn default_trigger_level() -> f64 {
    0.5
}
fn default_detection_probability() -> f64 {
    crate::world::DEFAULT_DETECTION_PROBABILITY
}
fn default_arena_min() -> f64 {
    -10.0
}
fn default_arena_max() -> f64 {
    10.0
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            robot_id: default_robot_id(),
            max_control: default_max_control(),
            goal_tolerance: default_goal_tolerance(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            trigger_level: default_trigger_level(),
            set_id: 0,
            detection_probability: default_detection_probability(),
            seed: 0,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            min_x: default_arena_min(),
            min_y: default_arena_min(),
            max_x: default_arena_max(),
            max_y: default_arena_max(),
        }
    }
}

impl Default for RakshaConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            safety: SafetyConfig::default(),
            arena: ArenaConfig::default(),
        }
    }
}

impl RakshaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RakshaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

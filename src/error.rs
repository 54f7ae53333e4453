//! Error types for Raksha

use thiserror::Error;

/// Raksha error type
#[derive(Error, Debug)]
pub enum RakshaError {
    /// Palette dispatch with an invalid set id. Surfaced, never clamped.
    #[error("safe-set palette index {index} out of range ({len} sets)")]
    PaletteIndex { index: usize, len: usize },

    /// Query against a named grid that has not been loaded yet.
    ///
    /// Grids are loaded in an explicit phase before the control loop starts;
    /// callers seeing this must defer the first tick until loading completes.
    #[error("grid '{0}' not loaded")]
    GridNotLoaded(String),

    /// State vector length disagrees with the grid/set dimensionality.
    /// Indicates a wiring bug; fail fast rather than silently truncate.
    #[error("state dimension {actual} does not match expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Grid metadata failed construction-time validation.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RakshaError {
    fn from(e: serde_json::Error) -> Self {
        RakshaError::InvalidGrid(e.to_string())
    }
}

impl From<toml::de::Error> for RakshaError {
    fn from(e: toml::de::Error) -> Self {
        RakshaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RakshaError>;

//! Structured scenario events for the telemetry collaborator.
//!
//! The core only emits events; transport and persistence live outside.

use serde::Serialize;

use crate::core::Point2;

/// A discrete scenario event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// The tracked goal changed (and the detection mask with it).
    GoalChanged {
        robot_id: u32,
        goal: Point2,
        undetection_mask: Vec<bool>,
        timestamp_us: u64,
    },
    /// The detection mask was resampled without a goal change.
    MaskResampled {
        robot_id: u32,
        undetection_mask: Vec<bool>,
        timestamp_us: u64,
    },
    /// The robot entered contact with an obstacle's footprint.
    CollisionDetected {
        robot_id: u32,
        obstacle: usize,
        value: f64,
        timestamp_us: u64,
    },
}

/// Event consumer. Implementations must not block; the tick loop calls
/// them synchronously.
pub trait EventSink {
    fn record(&mut self, event: &TelemetryEvent);
}

/// Buffers events in memory, for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<TelemetryEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &TelemetryEvent) {
        self.events.push(event.clone());
    }
}

/// Serializes each event as one JSON line through the logger.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: &TelemetryEvent) {
        match serde_json::to_string(event) {
            Ok(line) => log::info!(target: "raksha::telemetry", "{}", line),
            Err(e) => log::error!("failed to serialize telemetry event: {}", e),
        }
    }
}

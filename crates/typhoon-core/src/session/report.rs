use serde::{Deserialize, Serialize};

use crate::energy::Classification;
use crate::haptic::RumbleCommand;

/// Read-only view for the display collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    /// Raw magnitude of the last applied sample.
    pub magnitude: f64,
    /// Normalized intensity of the last applied sample.
    pub intensity: f64,
    pub amplitude: f64,
    pub energy: f64,
    pub rolling_average: f64,
    pub tier: Classification,
}

/// End-of-session result. Valid at any tick boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Mean intensity over the trailing window only.
    pub final_mean_intensity: f64,
    pub final_tier: Classification,
    pub ticks: u64,
    pub skipped: u64,
    pub elapsed_ms: u64,
    pub window_ms: u64,
    /// True when the session ended before its configured duration.
    pub interrupted: bool,
}

/// Everything one applied tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub command: RumbleCommand,
    pub snapshot: DisplaySnapshot,
    pub events: Vec<crate::events::Event>,
}

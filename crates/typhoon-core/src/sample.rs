//! Sensor-side input types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One angular-velocity reading, already reduced to a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time since session start.
    pub timestamp: Duration,
    pub magnitude: f64,
}

impl Sample {
    pub fn new(timestamp: Duration, magnitude: f64) -> Self {
        Self {
            timestamp,
            magnitude,
        }
    }
}

/// Raw three-axis gyroscope report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GyroReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GyroReading {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the three axes.
    ///
    /// `sensor.threshold` and `sensor.saturation` are calibrated against this
    /// norm, not against any single axis.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn at(&self, timestamp: Duration) -> Sample {
        Sample::new(timestamp, self.magnitude())
    }
}

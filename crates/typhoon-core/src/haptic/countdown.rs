//! Pre-session countdown: "3", "2", "1", "Start!" with rising pulses.

use serde::{Deserialize, Serialize};

use super::command::RumbleCommand;
use crate::storage::CountdownConfig;

/// Lowest low-band frequency the motor accepts.
const MIN_LOW_HZ: f64 = 41.0;
/// Spacing between the starts of consecutive "3", "2", "1" steps.
const STEP_INTERVAL_MS: u64 = 1000;
/// Spacing between "Start!" and the first session tick.
const START_INTERVAL_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownStep {
    pub label: String,
    pub low_hz: f64,
    pub high_hz: f64,
    pub amplitude: f64,
    /// How long the pulse plays before the motor is stopped.
    pub pulse_ms: u64,
    /// Silence after the pulse before the next step.
    pub pause_ms: u64,
}

impl CountdownStep {
    pub fn command(&self) -> RumbleCommand {
        RumbleCommand::Play {
            amplitude: self.amplitude,
            low_hz: self.low_hz,
            high_hz: self.high_hz,
        }
    }
}

/// Build the four countdown steps from a validated config.
pub fn countdown_plan(config: &CountdownConfig) -> Vec<CountdownStep> {
    let pulse_ms = secs_to_ms(config.pulse_duration_s);
    let start_ms = secs_to_ms(config.start_pulse_duration_s);

    ["3", "2", "1", "Start!"]
        .into_iter()
        .enumerate()
        .map(|(k, label)| {
            let high_hz = config.base_freq_hz + k as f64 * config.freq_step_hz;
            let amplitude = (config.base_amplitude + k as f64 * config.amplitude_step).clamp(0.0, 1.0);
            let is_start = k == 3;
            let pulse = if is_start { start_ms } else { pulse_ms };
            let interval = if is_start {
                START_INTERVAL_MS
            } else {
                STEP_INTERVAL_MS
            };
            CountdownStep {
                label: label.to_string(),
                low_hz: (high_hz * 0.6).max(MIN_LOW_HZ),
                high_hz,
                amplitude,
                pulse_ms: pulse,
                pause_ms: interval.saturating_sub(pulse),
            }
        })
        .collect()
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}

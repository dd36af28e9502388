//! Smoothed, mean-reverting energy level over a trailing window.
//!
//! ## Update rule
//!
//! ```text
//! avg = mean(intensity in [now - window, now])
//! energy <= avg : energy += smoothing * (input - energy)
//! energy >  avg : energy -= decay * (energy - avg)
//! ```
//!
//! The energy is clamped to [0, 1] after every update.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use crate::storage::EnergyConfig;

/// Which half of the update rule ran on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBranch {
    /// Energy moved toward the instantaneous input.
    Smoothing,
    /// Energy sank toward the rolling average.
    Decaying,
}

/// Outcome of one accumulator tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyUpdate {
    pub energy: f64,
    pub rolling_average: f64,
    pub branch: EnergyBranch,
}

#[derive(Debug, Clone)]
pub struct EnergyAccumulator {
    energy: f64,
    history: VecDeque<(Duration, f64)>,
    window: Duration,
    smoothing_factor: f64,
    decay_rate: f64,
}

impl EnergyAccumulator {
    /// Build from a validated [`EnergyConfig`].
    pub fn new(config: &EnergyConfig) -> Self {
        Self {
            energy: 0.0,
            history: VecDeque::new(),
            window: config.window(),
            smoothing_factor: config.smoothing_factor,
            decay_rate: config.decay_rate,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &(Duration, f64)> {
        self.history.iter()
    }

    /// Mean intensity over the retained window; 0 when nothing is retained.
    pub fn rolling_average(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let total: f64 = self.history.iter().map(|(_, intensity)| intensity).sum();
        total / self.history.len() as f64
    }

    /// The session result: the same trailing window as the live average, so a
    /// quiet tail only counts for its share of the window.
    pub fn final_mean_intensity(&self) -> f64 {
        self.rolling_average()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record `intensity` at `now` and advance the energy level.
    pub fn update(&mut self, now: Duration, intensity: f64) -> EnergyUpdate {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };

        self.history.push_back((now, intensity));
        self.evict(now);

        let rolling_average = self.rolling_average();
        let branch = if self.history.is_empty() || self.energy <= rolling_average {
            self.energy += self.smoothing_factor * (intensity - self.energy);
            EnergyBranch::Smoothing
        } else {
            self.energy -= self.decay_rate * (self.energy - rolling_average);
            EnergyBranch::Decaying
        };
        self.energy = self.energy.clamp(0.0, 1.0);

        EnergyUpdate {
            energy: self.energy,
            rolling_average,
            branch,
        }
    }

    pub fn reset(&mut self) {
        self.energy = 0.0;
        self.history.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn evict(&mut self, now: Duration) {
        let cutoff = now.saturating_sub(self.window);
        while self
            .history
            .front()
            .is_some_and(|(timestamp, _)| *timestamp < cutoff)
        {
            self.history.pop_front();
        }
    }
}

//! Synthetic gyro motion for running a session without a controller.
//!
//! The generator alternates quiet stretches of sub-threshold jitter with
//! bursts of rotation that swell and fade over a few hundred milliseconds.
//! With a fixed seed the stream is fully reproducible.

use std::f64::consts::PI;
use std::time::Duration;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::sample::{GyroReading, Sample};
use crate::storage::Config;

/// Shape of the generated motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Chance per quiet tick that a burst begins (0.0-1.0)
    pub burst_probability: f64,
    /// Shortest burst, in ticks
    pub min_burst_ticks: u32,
    /// Longest burst, in ticks
    pub max_burst_ticks: u32,
    /// Strongest burst peak as a multiple of the saturation magnitude
    pub max_peak_ratio: f64,
    /// Idle jitter as a fraction of the activation threshold
    pub idle_jitter_ratio: f64,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            burst_probability: 0.08,
            min_burst_ticks: 3,
            max_burst_ticks: 12,
            max_peak_ratio: 1.2,
            idle_jitter_ratio: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Burst {
    peak: f64,
    length: u32,
    position: u32,
}

/// Endless motion cut off at a fixed duration; yields one [`Sample`] per
/// sensor period, including the sample at the duration itself.
#[derive(Debug, Clone)]
pub struct SyntheticMotion {
    rng: Mcg128Xsl64,
    profile: MotionProfile,
    period: Duration,
    duration: Duration,
    threshold: f64,
    saturation: f64,
    index: u32,
    burst: Option<Burst>,
}

impl SyntheticMotion {
    /// Calibrate against `config.sensor` and run for `config.session`.
    pub fn new(config: &Config, profile: MotionProfile) -> Self {
        let rng = match profile.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            rng,
            period: config.sensor.sample_period(),
            duration: config.session.duration(),
            threshold: config.sensor.threshold,
            saturation: config.sensor.saturation,
            index: 0,
            burst: None,
            profile,
        }
    }

    /// Override the cut-off.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    fn next_magnitude(&mut self) -> f64 {
        if self.burst.is_none() && self.rng.gen_bool(self.profile.burst_probability.clamp(0.0, 1.0))
        {
            let min = self.profile.min_burst_ticks.max(1);
            let max = self.profile.max_burst_ticks.max(min);
            let top = (self.saturation * self.profile.max_peak_ratio).max(self.threshold);
            self.burst = Some(Burst {
                peak: self.rng.gen_range(self.threshold..=top),
                length: self.rng.gen_range(min..=max),
                position: 0,
            });
        }

        let jitter = self.threshold * self.profile.idle_jitter_ratio.max(0.0) * self.rng.gen::<f64>();

        match self.burst.as_mut() {
            Some(burst) => {
                // Half a sine wave across the burst.
                let phase = f64::from(burst.position + 1) / f64::from(burst.length + 1);
                let magnitude = burst.peak * (PI * phase).sin() + jitter;
                burst.position += 1;
                if burst.position >= burst.length {
                    self.burst = None;
                }
                magnitude.max(0.0)
            }
            None => jitter,
        }
    }

    /// Spread `magnitude` over a random direction.
    fn next_reading(&mut self, magnitude: f64) -> GyroReading {
        let direction = [
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0_f64),
        ];
        let norm = direction.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm < f64::EPSILON {
            return GyroReading::new(magnitude, 0.0, 0.0);
        }
        let scale = magnitude / norm;
        GyroReading::new(direction[0] * scale, direction[1] * scale, direction[2] * scale)
    }
}

impl Iterator for SyntheticMotion {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let timestamp = self.period.checked_mul(self.index)?;
        if timestamp > self.duration {
            return None;
        }
        self.index = self.index.checked_add(1)?;
        let magnitude = self.next_magnitude();
        Some(self.next_reading(magnitude).at(timestamp))
    }
}

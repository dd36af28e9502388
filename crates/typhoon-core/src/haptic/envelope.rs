//! Attack/linger envelope for the rumble motor.
//!
//! The envelope is a two-regime state machine advanced once per tick. It does
//! not keep time on its own; the caller passes the elapsed time of each tick.
//!
//! ## Regimes
//!
//! ```text
//! input >= linger fade  -> Driven: amplitude follows input, strong input re-arms the linger
//! input <  linger fade  -> Lingering: amplitude follows the linear fade down to 0
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::command::RumbleCommand;
use crate::storage::{LingerConfig, RumbleConfig};

/// Shape of the linger duration as a function of peak amplitude.
///
/// All curves map 0 to 0 and 1 to 1 and are non-decreasing in between, so a
/// louder burst never lingers for less time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LingerCurve {
    #[default]
    Linear,
    /// Long tails even for moderate bursts.
    Sqrt,
    /// Only strong bursts linger noticeably.
    Quadratic,
}

impl LingerCurve {
    pub fn apply(&self, amplitude: f64) -> f64 {
        let a = amplitude.clamp(0.0, 1.0);
        match self {
            LingerCurve::Linear => a,
            LingerCurve::Sqrt => a.sqrt(),
            LingerCurve::Quadratic => a * a,
        }
    }
}

/// Mutable envelope state. Zeroed at session start and on forced stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HapticState {
    pub current_amplitude: f64,
    pub linger_remaining: Duration,
    pub linger_peak: f64,
    pub linger_total: Duration,
}

impl HapticState {
    pub fn is_lingering(&self) -> bool {
        !self.linger_remaining.is_zero()
    }

    /// Amplitude the linger produces right now: `peak` at full remaining
    /// time, falling linearly to 0.
    pub fn linger_amplitude(&self) -> f64 {
        if self.linger_total.is_zero() || !self.is_lingering() {
            return 0.0;
        }
        let fraction = self.linger_remaining.as_secs_f64() / self.linger_total.as_secs_f64();
        (self.linger_peak * fraction).max(0.0)
    }
}

/// Which branch handled a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Output followed the input.
    Driven,
    /// Output followed the input and a new linger was armed from it.
    Armed,
    /// Output followed the fading linger.
    Lingering,
}

#[derive(Debug, Clone)]
pub struct HapticEnvelope {
    state: HapticState,
    max_linger: Duration,
    trigger_floor: f64,
    curve: LingerCurve,
    low_hz: f64,
    high_hz: f64,
    interpolate_frequency: bool,
}

impl HapticEnvelope {
    /// Build from validated linger and rumble settings.
    pub fn new(linger: &LingerConfig, rumble: &RumbleConfig) -> Self {
        Self {
            state: HapticState::default(),
            max_linger: linger.max_duration(),
            trigger_floor: linger.trigger_floor,
            curve: linger.curve,
            low_hz: rumble.low_freq_hz,
            high_hz: rumble.high_freq_hz,
            interpolate_frequency: rumble.interpolate_frequency,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &HapticState {
        &self.state
    }

    pub fn amplitude(&self) -> f64 {
        self.state.current_amplitude
    }

    /// Linger length a burst of `peak` would arm, capped at the configured max.
    pub fn linger_duration_for(&self, peak: f64) -> Duration {
        let scaled = self.max_linger.as_secs_f64() * self.curve.apply(peak);
        Duration::try_from_secs_f64(scaled)
            .unwrap_or_default()
            .min(self.max_linger)
    }

    /// The actuation command for the current state.
    pub fn command(&self) -> RumbleCommand {
        let amplitude = self.state.current_amplitude;
        if amplitude <= 0.0 && !self.state.is_lingering() {
            return RumbleCommand::Stop;
        }
        let high_hz = if self.interpolate_frequency {
            self.low_hz + (self.high_hz - self.low_hz) * amplitude
        } else {
            self.high_hz
        };
        RumbleCommand::Play {
            amplitude,
            low_hz: self.low_hz,
            high_hz,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance by one tick of length `elapsed` with normalized `intensity`.
    pub fn tick(&mut self, intensity: f64, elapsed: Duration) -> Regime {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };

        if intensity >= self.state.linger_amplitude() {
            self.state.current_amplitude = intensity;
            if intensity > self.trigger_floor {
                let total = self.linger_duration_for(intensity);
                self.state.linger_peak = intensity;
                self.state.linger_total = total;
                self.state.linger_remaining = total;
                Regime::Armed
            } else {
                self.drain(elapsed);
                Regime::Driven
            }
        } else {
            self.drain(elapsed);
            self.state.current_amplitude = self.state.linger_amplitude().max(intensity);
            Regime::Lingering
        }
    }

    /// Drop to silence immediately, discarding any linger.
    pub fn force_stop(&mut self) -> RumbleCommand {
        self.state = HapticState::default();
        RumbleCommand::Stop
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn drain(&mut self, elapsed: Duration) {
        self.state.linger_remaining = self.state.linger_remaining.saturating_sub(elapsed);
        if self.state.linger_remaining.is_zero() {
            self.state.linger_peak = 0.0;
            self.state.linger_total = Duration::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    fn envelope() -> HapticEnvelope {
        HapticEnvelope::new(&LingerConfig::default(), &RumbleConfig::default())
    }

    #[test]
    fn starts_silent() {
        let env = envelope();
        assert_eq!(env.amplitude(), 0.0);
        assert_eq!(env.command(), RumbleCommand::Stop);
    }

    #[test]
    fn spike_arms_linger_scaled_by_peak() {
        let mut env = envelope();
        assert_eq!(env.tick(0.5, TICK), Regime::Armed);
        assert_eq!(env.state().linger_peak, 0.5);
        assert_eq!(env.state().linger_total, Duration::from_millis(750));
        assert_eq!(env.state().linger_remaining, Duration::from_millis(750));
        assert_eq!(env.amplitude(), 0.5);
    }

    #[test]
    fn lower_input_follows_fade() {
        let mut env = envelope();
        env.tick(1.0, TICK);
        assert_eq!(env.tick(0.0, TICK), Regime::Lingering);
        let expected = 1.0 * 1450.0 / 1500.0;
        assert!((env.amplitude() - expected).abs() < 1e-9);
    }

    #[test]
    fn stronger_input_overrides_fade() {
        let mut env = envelope();
        env.tick(0.4, TICK);
        env.tick(0.0, TICK);
        assert_eq!(env.tick(0.9, TICK), Regime::Armed);
        assert_eq!(env.amplitude(), 0.9);
        assert_eq!(env.state().linger_peak, 0.9);
    }

    #[test]
    fn fade_ends_with_stop() {
        let mut env = envelope();
        env.tick(0.1, TICK); // lingers 150ms
        env.tick(0.0, TICK);
        env.tick(0.0, TICK);
        assert!(env.amplitude() > 0.0);
        env.tick(0.0, TICK);
        assert_eq!(env.amplitude(), 0.0);
        assert!(!env.state().is_lingering());
        assert_eq!(env.command(), RumbleCommand::Stop);
    }

    #[test]
    fn floor_blocks_weak_bursts_from_arming() {
        let linger = LingerConfig {
            trigger_floor: 0.3,
            ..LingerConfig::default()
        };
        let mut env = HapticEnvelope::new(&linger, &RumbleConfig::default());
        assert_eq!(env.tick(0.2, TICK), Regime::Driven);
        assert!(!env.state().is_lingering());
        env.tick(0.0, TICK);
        assert_eq!(env.command(), RumbleCommand::Stop);
    }

    #[test]
    fn linger_duration_is_capped() {
        let linger = LingerConfig {
            curve: LingerCurve::Sqrt,
            ..LingerConfig::default()
        };
        let env = HapticEnvelope::new(&linger, &RumbleConfig::default());
        assert_eq!(env.linger_duration_for(1.0), Duration::from_millis(1500));
        assert_eq!(env.linger_duration_for(4.0), Duration::from_millis(1500));
        assert!(env.linger_duration_for(0.25) > Duration::from_millis(375));
    }

    #[test]
    fn command_carries_fixed_frequencies() {
        let mut env = envelope();
        env.tick(0.25, TICK);
        assert_eq!(
            env.command(),
            RumbleCommand::Play {
                amplitude: 0.25,
                low_hz: 300.0,
                high_hz: 800.0
            }
        );
    }

    #[test]
    fn interpolated_frequency_tracks_amplitude() {
        let rumble = RumbleConfig {
            interpolate_frequency: true,
            ..RumbleConfig::default()
        };
        let mut env = HapticEnvelope::new(&LingerConfig::default(), &rumble);
        env.tick(0.5, TICK);
        match env.command() {
            RumbleCommand::Play { high_hz, low_hz, .. } => {
                assert_eq!(low_hz, 300.0);
                assert_eq!(high_hz, 550.0);
            }
            RumbleCommand::Stop => panic!("expected Play"),
        }
    }

    #[test]
    fn force_stop_clears_linger() {
        let mut env = envelope();
        env.tick(1.0, TICK);
        assert_eq!(env.force_stop(), RumbleCommand::Stop);
        assert_eq!(*env.state(), HapticState::default());
    }

    #[test]
    fn curves_are_anchored() {
        for curve in [LingerCurve::Linear, LingerCurve::Sqrt, LingerCurve::Quadratic] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
        }
    }
}

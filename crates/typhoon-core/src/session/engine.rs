//! Session driver.
//!
//! The session owns every component and advances them once per tick in a
//! fixed order: intensity, envelope, energy, tier. It does not keep time on
//! its own; each [`Sample`] carries its timestamp since session start.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::new(config)?;
//! for sample in source {
//!     match session.tick(sample) {
//!         Ok(report) => sink.send(&report.command)?,
//!         Err(skipped) => eprintln!("{skipped}"),
//!     }
//! }
//! let summary = session.finish();
//! ```

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::device::RumbleSink;
use super::report::{DisplaySnapshot, SessionSummary, TickReport};
use crate::energy::{Classification, EnergyAccumulator, TierTable};
use crate::error::{ConfigError, InputError};
use crate::events::Event;
use crate::haptic::{HapticEnvelope, Regime, RumbleCommand};
use crate::intensity::IntensityMapper;
use crate::sample::Sample;
use crate::storage::Config;

/// Energy and mean intensity are already normalized, so both are classified
/// against a ceiling of 1.
const NORMALIZED_CEILING: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    config: Config,
    mapper: IntensityMapper,
    envelope: HapticEnvelope,
    energy: EnergyAccumulator,
    tiers: TierTable,
    /// Timestamp of the last applied sample.
    last_timestamp: Option<Duration>,
    last_magnitude: f64,
    last_intensity: f64,
    last_regime: Option<Regime>,
    tier: Classification,
    ticks: u64,
    skipped: u64,
    /// Set when the sample stream reached the configured duration.
    completed: bool,
}

impl Session {
    /// Validate `config` and build a silent session at t = 0.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mapper = IntensityMapper::from_config(&config.sensor)?;
        let tiers = config.tier_table()?;
        let tier = tiers.classify(0.0, NORMALIZED_CEILING);
        Ok(Self {
            id: Uuid::new_v4(),
            envelope: HapticEnvelope::new(&config.linger, &config.rumble),
            energy: EnergyAccumulator::new(&config.energy),
            mapper,
            tiers,
            last_timestamp: None,
            last_magnitude: 0.0,
            last_intensity: 0.0,
            last_regime: None,
            tier,
            ticks: 0,
            skipped: 0,
            completed: false,
            config,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn envelope(&self) -> &HapticEnvelope {
        &self.envelope
    }

    pub fn energy(&self) -> &EnergyAccumulator {
        &self.energy
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Time of the last applied sample.
    pub fn elapsed(&self) -> Duration {
        self.last_timestamp.unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.completed || self.elapsed() >= self.config.session.duration()
    }

    pub fn started_event(&self) -> Event {
        Event::SessionStarted {
            session_id: self.id,
            duration_ms: millis(self.config.session.duration()),
            window_ms: millis(self.energy.window()),
            at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let elapsed = self.elapsed();
        DisplaySnapshot {
            elapsed_ms: millis(elapsed),
            remaining_ms: millis(self.config.session.duration().saturating_sub(elapsed)),
            magnitude: self.last_magnitude,
            intensity: self.last_intensity,
            amplitude: self.envelope.amplitude(),
            energy: self.energy.energy(),
            rolling_average: self.energy.rolling_average(),
            tier: self.tier.clone(),
        }
    }

    /// Result computed from whatever history the window holds right now.
    pub fn summary(&self) -> SessionSummary {
        let final_mean_intensity = self.energy.final_mean_intensity();
        SessionSummary {
            final_mean_intensity,
            final_tier: self.tiers.classify(final_mean_intensity, NORMALIZED_CEILING),
            ticks: self.ticks,
            skipped: self.skipped,
            elapsed_ms: millis(self.elapsed()),
            window_ms: millis(self.energy.window()),
            interrupted: !self.is_complete(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one sample.
    ///
    /// # Errors
    ///
    /// Degenerate samples are rejected with an [`InputError`] and leave every
    /// component untouched.
    pub fn tick(&mut self, sample: Sample) -> Result<TickReport, InputError> {
        if let Err(err) = self.check(&sample) {
            self.skipped += 1;
            warn!(error = %err, "skipping sample");
            return Err(err);
        }

        let dt = sample
            .timestamp
            .saturating_sub(self.last_timestamp.unwrap_or_default());
        let intensity = self.mapper.map(sample.magnitude);

        let regime = self.envelope.tick(intensity, dt);
        let update = self.energy.update(sample.timestamp, intensity);
        let tier = self.tiers.classify(update.energy, NORMALIZED_CEILING);

        self.last_timestamp = Some(sample.timestamp);
        self.last_magnitude = sample.magnitude;
        self.last_intensity = intensity;
        self.ticks += 1;

        let elapsed_ms = millis(sample.timestamp);
        let mut events = Vec::new();

        // One event per burst, not one per re-armed tick.
        if regime == Regime::Armed && self.last_regime != Some(Regime::Armed) {
            let state = self.envelope.state();
            debug!(
                peak = state.linger_peak,
                linger_ms = millis(state.linger_total),
                elapsed_ms,
                "linger armed"
            );
            events.push(Event::LingerArmed {
                peak: state.linger_peak,
                linger_ms: millis(state.linger_total),
                elapsed_ms,
                at: Utc::now(),
            });
        }
        self.last_regime = Some(regime);

        if tier.level != self.tier.level {
            debug!(from = %self.tier, to = %tier, elapsed_ms, "tier changed");
            events.push(Event::TierChanged {
                from: self.tier.clone(),
                to: tier.clone(),
                elapsed_ms,
                at: Utc::now(),
            });
            self.tier = tier;
        }

        Ok(TickReport {
            command: self.envelope.command(),
            snapshot: self.snapshot(),
            events,
        })
    }

    /// Silence the motor and close the session at the current tick boundary.
    pub fn finish(&mut self) -> SessionSummary {
        self.envelope.force_stop();
        self.last_regime = None;
        self.summary()
    }

    /// Drive `source` until it is exhausted or reaches the session duration.
    ///
    /// Every applied tick's command goes to `sink`, followed by a final stop.
    /// Sink failures are logged and never end the session. `observe` sees
    /// every event in order, starting with `SessionStarted` and ending with
    /// `SessionEnded`.
    pub fn run<I, S, F>(&mut self, source: I, sink: &mut S, mut observe: F) -> SessionSummary
    where
        I: IntoIterator<Item = Sample>,
        S: RumbleSink + ?Sized,
        F: FnMut(&Event),
    {
        observe(&self.started_event());
        let duration = self.config.session.duration();

        for sample in source {
            if sample.timestamp >= duration {
                self.completed = true;
                break;
            }
            match self.tick(sample) {
                Ok(report) => {
                    deliver(sink, &report.command);
                    for event in &report.events {
                        observe(event);
                    }
                    observe(&Event::Snapshot {
                        snapshot: report.snapshot,
                        command: report.command,
                        at: Utc::now(),
                    });
                }
                Err(err) => observe(&Event::SampleSkipped {
                    reason: err.to_string(),
                    at: Utc::now(),
                }),
            }
        }

        let summary = self.finish();
        deliver(sink, &RumbleCommand::Stop);
        observe(&Event::SessionEnded {
            session_id: self.id,
            summary: summary.clone(),
            at: Utc::now(),
        });
        summary
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn check(&self, sample: &Sample) -> Result<(), InputError> {
        if !sample.magnitude.is_finite() || sample.magnitude < 0.0 {
            return Err(InputError::InvalidMagnitude {
                magnitude: sample.magnitude,
                timestamp: sample.timestamp,
            });
        }
        if let Some(previous) = self.last_timestamp {
            if sample.timestamp < previous {
                return Err(InputError::NonMonotonicTimestamp {
                    timestamp: sample.timestamp,
                    previous,
                });
            }
        }
        Ok(())
    }
}

fn deliver<S: RumbleSink + ?Sized>(sink: &mut S, command: &RumbleCommand) {
    if let Err(err) = sink.send(command) {
        warn!(sink = sink.name(), error = %err, "rumble command not delivered");
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

//! # Typhoon Core Library
//!
//! This library provides the control loop for Typhoon, a motion game played
//! by spinning a game controller. Every sensor tick it turns a gyroscope
//! magnitude into a rumble command and an energy level, and at the end of a
//! session it classifies the result into a storm tier. All operations are
//! available through the standalone CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Intensity**: magnitude to [0, 1] between an activation threshold and a
//!   saturation point
//! - **Haptic**: attack/linger envelope, rumble commands and their 8-byte wire
//!   encoding, countdown pulses
//! - **Energy**: smoothed, mean-reverting energy bar over a trailing window
//!   and the tier table that classifies it
//! - **Session**: a single-owner driver fed by tick generators, with device
//!   bindings behind the [`RumbleSink`] trait
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Session`]: Per-tick driver and summary
//! - [`HapticEnvelope`]: Rumble state machine
//! - [`EnergyAccumulator`]: Energy bar
//! - [`TierTable`]: Storm classification
//! - [`Config`]: Application configuration management

pub mod energy;
pub mod error;
pub mod events;
pub mod haptic;
pub mod intensity;
pub mod sample;
pub mod session;
pub mod simulation;
pub mod storage;

pub use energy::{Classification, EnergyAccumulator, Tier, TierTable};
pub use error::{ConfigError, CoreError, DeviceError, InputError};
pub use events::Event;
pub use haptic::{HapticEnvelope, LingerCurve, RumbleCommand, RumblePacket};
pub use intensity::{normalize, IntensityMapper};
pub use sample::{GyroReading, Sample};
pub use session::{
    DisplaySnapshot, NullSink, PacketWriter, RecordingSink, ReplaySamples, RumbleSink,
    ScriptedSamples, Session, SessionSummary, TickReport,
};
pub use simulation::{MotionProfile, SyntheticMotion};
pub use storage::Config;

//! TOML-based session configuration.
//!
//! Holds every tuning constant of the control loop:
//! - Sensor calibration (activation threshold, saturation, sample period)
//! - Linger envelope and rumble frequencies
//! - Session length and energy smoothing
//! - Countdown pulses and the tier table
//!
//! Configuration is stored at `~/.config/typhoon/config.toml`. A loaded
//! config is validated once and then treated as immutable for a session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::energy::{Tier, TierTable};
use crate::error::ConfigError;
use crate::haptic::LingerCurve;

/// Gyroscope calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Magnitude at or below which the controller is considered still.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Magnitude that maps to full intensity.
    #[serde(default = "default_saturation")]
    pub saturation: f64,
    /// Nominal reporting period of the sensor, in seconds.
    #[serde(default = "default_sample_period")]
    pub sample_period_s: f64,
}

/// Rumble fade-out after a burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LingerConfig {
    /// Longest tail a full-intensity burst can leave, in seconds.
    #[serde(default = "default_max_linger")]
    pub max_duration_s: f64,
    /// Driven amplitude must exceed this to arm a new linger.
    #[serde(default)]
    pub trigger_floor: f64,
    #[serde(default)]
    pub curve: LingerCurve,
}

/// Actuation frequencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RumbleConfig {
    #[serde(default = "default_low_freq")]
    pub low_freq_hz: f64,
    #[serde(default = "default_high_freq")]
    pub high_freq_hz: f64,
    /// Sweep the high band from `low_freq_hz` to `high_freq_hz` with amplitude.
    #[serde(default)]
    pub interpolate_frequency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_duration")]
    pub duration_s: f64,
}

/// Energy bar smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Trailing window for the rolling average and the final mean, in seconds.
    #[serde(default = "default_window")]
    pub window_s: f64,
    /// Fraction of the gap to the current input closed per tick. Range (0, 1).
    #[serde(default = "default_smoothing")]
    pub smoothing_factor: f64,
    /// Fraction of the excess over the rolling average shed per tick. Range (0, 1].
    #[serde(default = "default_decay")]
    pub decay_rate: f64,
}

/// Pre-session "3, 2, 1, Start!" pulses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_countdown_base_freq")]
    pub base_freq_hz: f64,
    #[serde(default = "default_countdown_freq_step")]
    pub freq_step_hz: f64,
    #[serde(default = "default_countdown_base_amplitude")]
    pub base_amplitude: f64,
    #[serde(default = "default_countdown_amplitude_step")]
    pub amplitude_step: f64,
    #[serde(default = "default_countdown_pulse")]
    pub pulse_duration_s: f64,
    #[serde(default = "default_countdown_start_pulse")]
    pub start_pulse_duration_s: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/typhoon/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub linger: LingerConfig,
    #[serde(default)]
    pub rumble: RumbleConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub energy: EnergyConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    /// Ascending tier table; lower bounds are fractions of saturation.
    #[serde(default = "crate::energy::default_tiers")]
    pub tiers: Vec<Tier>,
}

// Default functions
fn default_threshold() -> f64 {
    6000.0
}
fn default_saturation() -> f64 {
    25000.0
}
fn default_sample_period() -> f64 {
    0.05
}
fn default_max_linger() -> f64 {
    1.5
}
fn default_low_freq() -> f64 {
    300.0
}
fn default_high_freq() -> f64 {
    800.0
}
fn default_session_duration() -> f64 {
    10.0
}
fn default_window() -> f64 {
    10.0
}
fn default_smoothing() -> f64 {
    0.15
}
fn default_decay() -> f64 {
    // 0.6 per second at the default 20 Hz sample rate
    0.03
}
fn default_countdown_base_freq() -> f64 {
    90.0
}
fn default_countdown_freq_step() -> f64 {
    30.0
}
fn default_countdown_base_amplitude() -> f64 {
    0.3
}
fn default_countdown_amplitude_step() -> f64 {
    0.1
}
fn default_countdown_pulse() -> f64 {
    0.15
}
fn default_countdown_start_pulse() -> f64 {
    0.2
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            saturation: default_saturation(),
            sample_period_s: default_sample_period(),
        }
    }
}

impl Default for LingerConfig {
    fn default() -> Self {
        Self {
            max_duration_s: default_max_linger(),
            trigger_floor: 0.0,
            curve: LingerCurve::default(),
        }
    }
}

impl Default for RumbleConfig {
    fn default() -> Self {
        Self {
            low_freq_hz: default_low_freq(),
            high_freq_hz: default_high_freq(),
            interpolate_frequency: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_s: default_session_duration(),
        }
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            window_s: default_window(),
            smoothing_factor: default_smoothing(),
            decay_rate: default_decay(),
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            base_freq_hz: default_countdown_base_freq(),
            freq_step_hz: default_countdown_freq_step(),
            base_amplitude: default_countdown_base_amplitude(),
            amplitude_step: default_countdown_amplitude_step(),
            pulse_duration_s: default_countdown_pulse(),
            start_pulse_duration_s: default_countdown_start_pulse(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            linger: LingerConfig::default(),
            rumble: RumbleConfig::default(),
            session: SessionConfig::default(),
            energy: EnergyConfig::default(),
            countdown: CountdownConfig::default(),
            tiers: crate::energy::default_tiers(),
        }
    }
}

/// Seconds to `Duration`; only meaningful once the value has been validated.
pub(crate) fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

fn require_finite(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{value} is not a finite number")))
    }
}

fn require_duration(key: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(key, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(key, "duration cannot be negative"));
    }
    Duration::try_from_secs_f64(value)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(key, format!("{value} seconds: {e}")))
}

fn require_positive_duration(key: &str, value: f64) -> Result<(), ConfigError> {
    require_duration(key, value)?;
    if secs(value).is_zero() {
        return Err(ConfigError::invalid(
            key,
            format!("{value} seconds rounds to zero; duration must be at least 1ns"),
        ));
    }
    Ok(())
}

fn require_unit(key: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(key, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(key, format!("{value} is outside [0, 1]")));
    }
    Ok(())
}

impl SensorConfig {
    pub fn sample_period(&self) -> Duration {
        secs(self.sample_period_s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_finite("sensor.threshold", self.threshold)?;
        require_finite("sensor.saturation", self.saturation)?;
        if self.threshold < 0.0 {
            return Err(ConfigError::invalid(
                "sensor.threshold",
                "threshold cannot be negative",
            ));
        }
        if self.saturation <= self.threshold {
            return Err(ConfigError::invalid(
                "sensor.saturation",
                format!(
                    "saturation ({}) must be greater than threshold ({})",
                    self.saturation, self.threshold
                ),
            ));
        }
        require_positive_duration("sensor.sample_period_s", self.sample_period_s)
    }
}

impl LingerConfig {
    pub fn max_duration(&self) -> Duration {
        secs(self.max_duration_s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_duration("linger.max_duration_s", self.max_duration_s)?;
        require_finite("linger.trigger_floor", self.trigger_floor)?;
        if !(0.0..1.0).contains(&self.trigger_floor) {
            return Err(ConfigError::invalid(
                "linger.trigger_floor",
                format!("{} is outside [0, 1)", self.trigger_floor),
            ));
        }
        Ok(())
    }
}

impl RumbleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_finite("rumble.low_freq_hz", self.low_freq_hz)?;
        require_finite("rumble.high_freq_hz", self.high_freq_hz)?;
        if self.low_freq_hz <= 0.0 {
            return Err(ConfigError::invalid(
                "rumble.low_freq_hz",
                "frequency must be positive",
            ));
        }
        if self.high_freq_hz < self.low_freq_hz {
            return Err(ConfigError::invalid(
                "rumble.high_freq_hz",
                format!(
                    "high frequency ({}) is below low frequency ({})",
                    self.high_freq_hz, self.low_freq_hz
                ),
            ));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn duration(&self) -> Duration {
        secs(self.duration_s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive_duration("session.duration_s", self.duration_s)
    }
}

impl EnergyConfig {
    pub fn window(&self) -> Duration {
        secs(self.window_s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_positive_duration("energy.window_s", self.window_s)?;
        require_finite("energy.smoothing_factor", self.smoothing_factor)?;
        require_finite("energy.decay_rate", self.decay_rate)?;
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return Err(ConfigError::invalid(
                "energy.smoothing_factor",
                format!("{} is outside (0, 1)", self.smoothing_factor),
            ));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(ConfigError::invalid(
                "energy.decay_rate",
                format!("{} is outside (0, 1]", self.decay_rate),
            ));
        }
        Ok(())
    }
}

impl CountdownConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_finite("countdown.base_freq_hz", self.base_freq_hz)?;
        require_finite("countdown.freq_step_hz", self.freq_step_hz)?;
        require_unit("countdown.base_amplitude", self.base_amplitude)?;
        require_finite("countdown.amplitude_step", self.amplitude_step)?;
        require_duration("countdown.pulse_duration_s", self.pulse_duration_s)?;
        require_duration(
            "countdown.start_pulse_duration_s",
            self.start_pulse_duration_s,
        )
    }
}

impl Config {
    /// Check every constant relationship the control loop relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sensor.validate()?;
        self.linger.validate()?;
        self.rumble.validate()?;
        self.session.validate()?;
        self.energy.validate()?;
        self.countdown.validate()?;
        TierTable::new(self.tiers.clone())?;
        Ok(())
    }

    /// Validated tier table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty, unsorted or overlapping.
    pub fn tier_table(&self) -> Result<TierTable, ConfigError> {
        TierTable::new(self.tiers.clone())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let parse_err = |message: String| ConfigError::invalid(key, message);
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| parse_err(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<f64>()
                            .map_err(|_| parse_err(format!("cannot parse '{value}' as number")))?;
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| parse_err(format!("'{value}' is not a finite number")))?
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| parse_err(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Default location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/typhoon"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The change is applied only if the resulting config still validates.
    /// Nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new value breaks validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[sensor]\nthreshold = 50.0\n").unwrap();
        assert_eq!(parsed.sensor.threshold, 50.0);
        assert_eq!(parsed.sensor.saturation, 25000.0);
        assert_eq!(parsed.tiers.len(), 7);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("rumble.interpolate_frequency").as_deref(), Some("false"));
        assert_eq!(cfg.get("linger.curve").as_deref(), Some("linear"));
        assert!(cfg.get("sensor.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("sensor.threshold", "4500").unwrap();
        assert_eq!(cfg.sensor.threshold, 4500.0);
    }

    #[test]
    fn set_updates_nested_bool_and_enum() {
        let mut cfg = Config::default();
        cfg.set("rumble.interpolate_frequency", "true").unwrap();
        cfg.set("linger.curve", "sqrt").unwrap();
        assert!(cfg.rumble.interpolate_frequency);
        assert_eq!(cfg.linger.curve, LingerCurve::Sqrt);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let result = cfg.set("sensor.nonexistent_key", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("rumble.interpolate_frequency", "not_a_bool").is_err());
        assert!(cfg.set("sensor.threshold", "lots").is_err());
    }

    #[test]
    fn set_rejects_values_that_break_validation() {
        let mut cfg = Config::default();
        let result = cfg.set("sensor.saturation", "10");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.sensor.saturation, 25000.0);
    }

    #[test]
    fn validate_rejects_saturation_not_above_threshold() {
        let mut cfg = Config::default();
        cfg.sensor.saturation = cfg.sensor.threshold;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("sensor.saturation"));
    }

    #[test]
    fn validate_rejects_factors_out_of_range() {
        let mut cfg = Config::default();
        cfg.energy.smoothing_factor = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.energy.smoothing_factor = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.energy.decay_rate = 1.0;
        assert!(cfg.validate().is_ok());
        cfg.energy.decay_rate = 1.01;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_durations() {
        let mut cfg = Config::default();
        cfg.linger.max_duration_s = -0.5;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.energy.window_s = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.session.duration_s = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_durations_that_do_not_convert() {
        let mut cfg = Config::default();
        cfg.session.duration_s = 1e30;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("session.duration_s"));

        let mut cfg = Config::default();
        cfg.energy.window_s = 1e-12;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("energy.window_s"));

        let mut cfg = Config::default();
        cfg.linger.max_duration_s = 1e30;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.set("energy.window_s", "1e30").unwrap_err();
        assert_eq!(cfg.energy.window(), Duration::from_secs(10));
    }

    #[test]
    fn validated_durations_are_never_zero() {
        let mut cfg = Config::default();
        cfg.session.duration_s = 1e-9;
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session.duration(), Duration::from_nanos(1));
    }

    #[test]
    fn validate_rejects_reversed_frequencies() {
        let mut cfg = Config::default();
        cfg.rumble.low_freq_hz = 900.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rumble.high_freq_hz"));
    }

    #[test]
    fn validate_rejects_unsorted_tiers() {
        let mut cfg = Config::default();
        cfg.tiers.swap(2, 3);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn durations_convert_from_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.sensor.sample_period(), Duration::from_millis(50));
        assert_eq!(cfg.session.duration(), Duration::from_secs(10));
        assert_eq!(cfg.linger.max_duration(), Duration::from_millis(1500));
    }
}

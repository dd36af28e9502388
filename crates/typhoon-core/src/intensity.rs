//! Magnitude to normalized intensity.
//!
//! ```text
//! magnitude <= threshold : 0
//! otherwise              : clamp((magnitude - threshold) / (saturation - threshold), 0, 1)
//! ```

use crate::error::ConfigError;
use crate::storage::SensorConfig;

/// Rescale `magnitude` into [0, 1] between `threshold` and `saturation`.
///
/// Callers must guarantee `saturation > threshold`; [`IntensityMapper`]
/// enforces it at construction.
pub fn normalize(magnitude: f64, threshold: f64, saturation: f64) -> f64 {
    if !(magnitude > threshold) {
        return 0.0;
    }
    ((magnitude - threshold) / (saturation - threshold)).clamp(0.0, 1.0)
}

/// [`normalize`] with its calibration bound once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityMapper {
    threshold: f64,
    saturation: f64,
}

impl IntensityMapper {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] unless both bounds are finite and
    /// `saturation > threshold`.
    pub fn new(threshold: f64, saturation: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || !saturation.is_finite() {
            return Err(ConfigError::invalid(
                "sensor",
                "threshold and saturation must be finite",
            ));
        }
        if saturation <= threshold {
            return Err(ConfigError::invalid(
                "sensor.saturation",
                format!("saturation ({saturation}) must be greater than threshold ({threshold})"),
            ));
        }
        Ok(Self {
            threshold,
            saturation,
        })
    }

    pub fn from_config(config: &SensorConfig) -> Result<Self, ConfigError> {
        Self::new(config.threshold, config.saturation)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn map(&self, magnitude: f64) -> f64 {
        normalize(magnitude, self.threshold, self.saturation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_is_zero() {
        assert_eq!(normalize(0.0, 50.0, 1000.0), 0.0);
        assert_eq!(normalize(50.0, 50.0, 1000.0), 0.0);
    }

    #[test]
    fn at_or_above_saturation_is_one() {
        assert_eq!(normalize(1000.0, 50.0, 1000.0), 1.0);
        assert_eq!(normalize(1e9, 50.0, 1000.0), 1.0);
    }

    #[test]
    fn linear_between_bounds() {
        assert!((normalize(525.0, 50.0, 1000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn nan_maps_to_zero() {
        assert_eq!(normalize(f64::NAN, 50.0, 1000.0), 0.0);
    }

    #[test]
    fn mapper_rejects_inverted_bounds() {
        assert!(IntensityMapper::new(1000.0, 1000.0).is_err());
        assert!(IntensityMapper::new(1000.0, 50.0).is_err());
        assert!(IntensityMapper::new(f64::NAN, 50.0).is_err());
        let mapper = IntensityMapper::new(6000.0, 25000.0).unwrap();
        assert_eq!(mapper.map(25000.0), 1.0);
    }
}

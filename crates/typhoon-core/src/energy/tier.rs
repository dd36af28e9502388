//! Storm tiers and the classifier shared by live energy and the final result.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Wind speed (km/h) that corresponds to a full-scale reading.
const FULL_SCALE_KMH: f64 = 185.0;

/// A named classification bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub label: String,
    /// Inclusive lower bound as a fraction of the full scale.
    pub lower_bound: f64,
}

impl Tier {
    pub fn new(label: impl Into<String>, lower_bound: f64) -> Self {
        Self {
            label: label.into(),
            lower_bound,
        }
    }
}

/// The built-in table: Hong Kong Observatory tropical cyclone classes,
/// scaled so that a Super Typhoon starts at full scale.
pub fn default_tiers() -> Vec<Tier> {
    [
        ("Calm", 0.0),
        ("Tropical Depression", 41.0),
        ("Tropical Storm", 63.0),
        ("Severe Tropical Storm", 88.0),
        ("Typhoon", 118.0),
        ("Severe Typhoon", 150.0),
        ("Super Typhoon", FULL_SCALE_KMH),
    ]
    .into_iter()
    .map(|(label, kmh)| Tier::new(label, kmh / FULL_SCALE_KMH))
    .collect()
}

/// Result of classifying a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Index into the tier table; 0 is the lowest tier.
    pub level: usize,
    pub max_level: usize,
    pub label: String,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}/{}: {}", self.level, self.max_level, self.label)
    }
}

/// An ascending, non-overlapping tier table.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Build a table, rejecting anything the classifier cannot serve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the table is empty, does not
    /// start at 0, has bounds outside [0, 1], or is not strictly ascending.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, ConfigError> {
        let first = tiers
            .first()
            .ok_or_else(|| ConfigError::invalid("tiers", "tier table is empty"))?;
        if first.lower_bound != 0.0 {
            return Err(ConfigError::invalid(
                "tiers[0].lower_bound",
                "the lowest tier must start at 0",
            ));
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.label.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("tiers[{i}].label"),
                    "label cannot be empty",
                ));
            }
            if !(0.0..=1.0).contains(&tier.lower_bound) {
                return Err(ConfigError::invalid(
                    format!("tiers[{i}].lower_bound"),
                    format!("{} is outside [0, 1]", tier.lower_bound),
                ));
            }
        }

        if let Some(i) = tiers
            .windows(2)
            .position(|pair| pair[1].lower_bound <= pair[0].lower_bound)
        {
            return Err(ConfigError::invalid(
                format!("tiers[{}].lower_bound", i + 1),
                "tier bounds must be strictly ascending",
            ));
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Level of the highest tier whose lower bound is at or below
    /// `value / ceiling`, after clamping that fraction to [0, 1].
    ///
    /// Total over all inputs: NaN and a non-positive ceiling classify as 0.
    pub fn level(&self, value: f64, ceiling: f64) -> usize {
        let fraction = if ceiling > 0.0 {
            let raw = value / ceiling;
            if raw.is_nan() {
                0.0
            } else {
                raw.clamp(0.0, 1.0)
            }
        } else {
            0.0
        };

        self.tiers
            .iter()
            .rposition(|tier| tier.lower_bound <= fraction)
            .unwrap_or(0)
    }

    /// Classify `value` against `ceiling`.
    pub fn classify(&self, value: f64, ceiling: f64) -> Classification {
        let level = self.level(value, ceiling);
        Classification {
            level,
            max_level: self.tiers.len().saturating_sub(1),
            label: self.tiers[level].label.clone(),
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = TierTable::new(default_tiers()).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table.tiers()[6].lower_bound, 1.0);
    }

    #[test]
    fn zero_is_calm() {
        let table = TierTable::default();
        let c = table.classify(0.0, 1.0);
        assert_eq!(c.level, 0);
        assert_eq!(c.label, "Calm");
    }

    #[test]
    fn bounds_are_inclusive() {
        let table = TierTable::default();
        assert_eq!(table.level(63.0 / 185.0, 1.0), 2);
        assert_eq!(table.level(63.0 / 185.0 - 1e-9, 1.0), 1);
        assert_eq!(table.level(1.0, 1.0), 6);
    }

    #[test]
    fn fraction_is_taken_against_ceiling() {
        let table = TierTable::default();
        assert_eq!(table.level(25000.0, 25000.0), 6);
        assert_eq!(table.level(12500.0, 25000.0), 3);
        assert_eq!(table.level(99999.0, 25000.0), 6);
    }

    #[test]
    fn degenerate_inputs_classify_as_lowest() {
        let table = TierTable::default();
        assert_eq!(table.level(f64::NAN, 1.0), 0);
        assert_eq!(table.level(-3.0, 1.0), 0);
        assert_eq!(table.level(0.5, 0.0), 0);
    }

    #[test]
    fn display_formats_level() {
        let table = TierTable::default();
        assert_eq!(table.classify(0.7, 1.0).to_string(), "Level 4/6: Typhoon");
    }

    #[test]
    fn rejects_malformed_tables() {
        assert!(TierTable::new(vec![]).is_err());
        assert!(TierTable::new(vec![Tier::new("A", 0.1)]).is_err());
        assert!(TierTable::new(vec![Tier::new("A", 0.0), Tier::new("B", 0.0)]).is_err());
        assert!(TierTable::new(vec![Tier::new("A", 0.0), Tier::new("B", 1.5)]).is_err());
        assert!(TierTable::new(vec![Tier::new("A", 0.0), Tier::new(" ", 0.5)]).is_err());
        assert!(TierTable::new(vec![Tier::new("A", 0.0), Tier::new("B", 0.5)]).is_ok());
    }
}

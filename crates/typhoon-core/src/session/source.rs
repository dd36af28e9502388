//! Tick generators.
//!
//! A session is driven by any `Iterator<Item = Sample>`. Iterators are lazy,
//! finite and consumed by the run, so a source cannot be replayed twice.

use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::sample::{GyroReading, Sample};

/// Fixed magnitudes emitted at a fixed period, starting at t = 0.
#[derive(Debug, Clone)]
pub struct ScriptedSamples {
    magnitudes: std::vec::IntoIter<f64>,
    period: Duration,
    index: u32,
}

impl ScriptedSamples {
    pub fn new(magnitudes: impl IntoIterator<Item = f64>, period: Duration) -> Self {
        Self {
            magnitudes: magnitudes.into_iter().collect::<Vec<_>>().into_iter(),
            period,
            index: 0,
        }
    }
}

impl Iterator for ScriptedSamples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let magnitude = self.magnitudes.next()?;
        let timestamp = self.period.saturating_mul(self.index);
        self.index = self.index.saturating_add(1);
        Some(Sample::new(timestamp, magnitude))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.magnitudes.size_hint()
    }
}

/// Samples read back from a recording.
///
/// One sample per line, comma separated, timestamps in seconds:
///
/// ```text
/// # t, gx, gy, gz
/// 0.00, 120.0, -40.5, 3.0
/// 0.05, 8000.0, 2500.0, -900.0
/// ```
///
/// Two-column lines (`t, magnitude`) are taken as pre-reduced magnitudes.
/// Blank lines and `#` comments are ignored, as is a first row whose leading
/// field is not a number (a column header). Ordering and sign of the values
/// are left for the session to judge.
#[derive(Debug, Clone)]
pub struct ReplaySamples {
    samples: std::vec::IntoIter<Sample>,
}

impl ReplaySamples {
    /// # Errors
    ///
    /// Returns [`CoreError::Replay`] naming the first malformed line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut samples = Vec::new();
        let mut seen_row = false;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let is_first_row = !seen_row;
            seen_row = true;

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            // A header names its columns; a row with a numeric timestamp is data.
            if is_first_row && fields[0].parse::<f64>().is_err() {
                continue;
            }
            let numbers = fields
                .iter()
                .map(|f| f.parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .map_err(|e| replay_error(idx, format!("{e}: '{line}'")))?;

            let timestamp = Duration::try_from_secs_f64(numbers[0])
                .map_err(|_| replay_error(idx, format!("invalid timestamp {}", numbers[0])))?;
            let magnitude = match numbers.as_slice() {
                [_, magnitude] => *magnitude,
                [_, x, y, z] => GyroReading::new(*x, *y, *z).magnitude(),
                _ => {
                    return Err(replay_error(
                        idx,
                        format!("expected 2 or 4 fields, found {}", numbers.len()),
                    ))
                }
            };
            samples.push(Sample::new(timestamp, magnitude));
        }

        Ok(Self {
            samples: samples.into_iter(),
        })
    }

    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a replay error if
    /// it cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

impl Iterator for ReplaySamples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.samples.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

impl ExactSizeIterator for ReplaySamples {}

fn replay_error(idx: usize, message: String) -> CoreError {
    CoreError::Replay {
        line: idx + 1,
        message,
    }
}

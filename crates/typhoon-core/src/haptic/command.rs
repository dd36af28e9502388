use serde::{Deserialize, Serialize};

/// What the actuation device should do until the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RumbleCommand {
    /// Halt the motors. Not the same as playing at zero amplitude.
    Stop,
    Play {
        amplitude: f64,
        low_hz: f64,
        high_hz: f64,
    },
}

impl RumbleCommand {
    pub fn amplitude(&self) -> f64 {
        match self {
            RumbleCommand::Stop => 0.0,
            RumbleCommand::Play { amplitude, .. } => *amplitude,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, RumbleCommand::Stop)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::energy::Classification;
use crate::haptic::RumbleCommand;
use crate::session::{DisplaySnapshot, SessionSummary};

/// Every notable change in a session produces an Event.
/// Display and reporting collaborators consume them; the core never renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        duration_ms: u64,
        window_ms: u64,
        at: DateTime<Utc>,
    },
    /// A burst armed a new rumble tail.
    LingerArmed {
        peak: f64,
        linger_ms: u64,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// The live energy crossed into a different tier.
    TierChanged {
        from: Classification,
        to: Classification,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// A degenerate sample was dropped.
    SampleSkipped {
        reason: String,
        at: DateTime<Utc>,
    },
    /// Per-tick display state.
    Snapshot {
        snapshot: DisplaySnapshot,
        command: RumbleCommand,
        at: DateTime<Utc>,
    },
    SessionEnded {
        session_id: Uuid,
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
}

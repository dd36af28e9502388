//! Session driver, tick generators and the actuation boundary.

mod device;
mod engine;
mod report;
mod source;

pub use device::{NullSink, PacketWriter, RecordingSink, RumbleSink};
pub use engine::Session;
pub use report::{DisplaySnapshot, SessionSummary, TickReport};
pub use source::{ReplaySamples, ScriptedSamples};

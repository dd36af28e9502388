//! Actuation boundary.
//!
//! The core never owns a device handle. A device binding implements
//! [`RumbleSink`] and receives one command per tick plus a final stop.

use std::io::Write;

use crate::error::DeviceError;
use crate::haptic::{RumbleCommand, RumblePacket};

/// Every actuation target implements this trait.
pub trait RumbleSink {
    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "rumble"
    }

    /// Deliver a command. Failures are reported, never retried by the core.
    fn send(&mut self, command: &RumbleCommand) -> Result<(), DeviceError>;
}

/// Discards every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RumbleSink for NullSink {
    fn name(&self) -> &str {
        "null"
    }

    fn send(&mut self, _command: &RumbleCommand) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// Keeps every command in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub commands: Vec<RumbleCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&RumbleCommand> {
        self.commands.last()
    }
}

impl RumbleSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&mut self, command: &RumbleCommand) -> Result<(), DeviceError> {
        self.commands.push(*command);
        Ok(())
    }
}

/// Encodes each command as an 8-byte rumble payload and writes it as one hex
/// line, for piping into a device bridge.
#[derive(Debug)]
pub struct PacketWriter<W: Write> {
    out: W,
}

impl<W: Write> PacketWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RumbleSink for PacketWriter<W> {
    fn name(&self) -> &str {
        "packet-writer"
    }

    fn send(&mut self, command: &RumbleCommand) -> Result<(), DeviceError> {
        let packet = RumblePacket::encode(command);
        writeln!(self.out, "{packet}")?;
        Ok(())
    }
}

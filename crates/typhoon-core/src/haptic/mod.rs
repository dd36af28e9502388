mod command;
mod countdown;
mod envelope;
mod packet;

pub use command::RumbleCommand;
pub use countdown::{countdown_plan, CountdownStep};
pub use envelope::{HapticEnvelope, HapticState, LingerCurve, Regime};
pub use packet::RumblePacket;

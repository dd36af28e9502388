use std::path::Path;

use clap::Args;
use typhoon_core::{RumbleCommand, RumblePacket};

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Amplitude 0.0-1.0; 0 encodes the off packet
    #[arg(long, default_value_t = 0.0)]
    pub amplitude: f64,
    /// Low-band frequency in Hz (defaults to rumble.low_freq_hz)
    #[arg(long)]
    pub low_hz: Option<f64>,
    /// High-band frequency in Hz (defaults to rumble.high_freq_hz)
    #[arg(long)]
    pub high_hz: Option<f64>,
}

pub fn run(config_path: Option<&Path>, args: EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let command = if args.amplitude > 0.0 {
        RumbleCommand::Play {
            amplitude: args.amplitude,
            low_hz: args.low_hz.unwrap_or(config.rumble.low_freq_hz),
            high_hz: args.high_hz.unwrap_or(config.rumble.high_freq_hz),
        }
    } else {
        RumbleCommand::Stop
    };
    println!("{}", RumblePacket::encode(&command));
    Ok(())
}

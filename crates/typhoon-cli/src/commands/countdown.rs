use std::path::Path;

use clap::Args;
use typhoon_core::haptic::countdown_plan;
use typhoon_core::RumblePacket;

#[derive(Args, Debug)]
pub struct CountdownArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(config_path: Option<&Path>, args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    config.validate()?;
    let plan = countdown_plan(&config.countdown);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for step in &plan {
        println!(
            "{:<7} {:>6.1}/{:<6.1} Hz  amp {:.2}  pulse {:>4} ms  pause {:>4} ms  {}",
            step.label,
            step.low_hz,
            step.high_hz,
            step.amplitude,
            step.pulse_ms,
            step.pause_ms,
            RumblePacket::encode(&step.command())
        );
    }
    Ok(())
}

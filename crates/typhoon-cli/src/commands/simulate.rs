use std::path::Path;

use clap::Args;
use typhoon_core::{MotionProfile, Session, SyntheticMotion};

use super::SessionOutput;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Random seed for reproducible motion (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Session length in seconds (overrides session.duration_s)
    #[arg(long, value_name = "SECS")]
    pub duration: Option<f64>,
    /// Chance per quiet tick that a burst of rotation begins (0.0-1.0)
    #[arg(long, default_value_t = 0.08)]
    pub burst_probability: f64,
    #[command(flatten)]
    pub output: SessionOutput,
}

pub fn run(config_path: Option<&Path>, args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;
    if let Some(duration) = args.duration {
        config.session.duration_s = duration;
    }
    if !(0.0..=1.0).contains(&args.burst_probability) {
        return Err(format!(
            "burst probability {} is outside [0, 1]",
            args.burst_probability
        )
        .into());
    }

    let profile = MotionProfile {
        burst_probability: args.burst_probability,
        seed: args.seed,
        ..MotionProfile::default()
    };
    let motion = SyntheticMotion::new(&config, profile);
    let session = Session::new(config)?;
    super::drive(session, motion, &args.output)?;
    Ok(())
}

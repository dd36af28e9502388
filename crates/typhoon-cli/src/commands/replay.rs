use std::path::{Path, PathBuf};

use clap::Args;
use typhoon_core::{ReplaySamples, Session};

use super::SessionOutput;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Recording with one `t,gx,gy,gz` or `t,magnitude` line per sample
    pub file: PathBuf,
    #[command(flatten)]
    pub output: SessionOutput,
}

pub fn run(config_path: Option<&Path>, args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let samples = ReplaySamples::from_path(&args.file)?;
    let session = Session::new(config)?;
    super::drive(session, samples, &args.output)?;
    Ok(())
}

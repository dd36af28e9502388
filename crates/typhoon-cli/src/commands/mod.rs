pub mod completions;
pub mod config;
pub mod countdown;
pub mod encode;
pub mod replay;
pub mod simulate;
pub mod tiers;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use typhoon_core::{
    Config, ConfigError, DisplaySnapshot, Event, NullSink, PacketWriter, RumbleSink, Sample, Session,
    SessionSummary,
};

/// Resolve the config file: the `--config` override or the default location.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::path(),
    }
}

pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    Config::load_from(&config_path(explicit)?)
}

/// Output flags shared by every command that runs a session.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionOutput {
    /// Print every event as one JSON object per line
    #[arg(long, conflicts_with = "packets")]
    pub json: bool,
    /// Write each tick's 8-byte rumble packet as hex instead of events
    #[arg(long)]
    pub packets: bool,
    /// Print a status line with an energy bar on every tick
    #[arg(long, conflicts_with_all = ["json", "packets"])]
    pub live: bool,
    /// Stop the session after this many seconds
    #[arg(long, value_name = "SECS")]
    pub interrupt_after: Option<f64>,
}

/// Run `session` over `source` and print its events as requested.
pub fn drive<I>(
    mut session: Session,
    source: I,
    output: &SessionOutput,
) -> Result<SessionSummary, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = Sample>,
{
    let cutoff = match output.interrupt_after {
        Some(secs) => Some(Duration::try_from_secs_f64(secs).map_err(|e| {
            ConfigError::InvalidValue {
                key: "--interrupt-after".into(),
                message: e.to_string(),
            }
        })?),
        None => None,
    };
    let source = source
        .into_iter()
        .take_while(|sample| cutoff.map_or(true, |limit| sample.timestamp < limit));

    let mut sink: Box<dyn RumbleSink> = if output.packets {
        Box::new(PacketWriter::new(std::io::stdout()))
    } else {
        Box::new(NullSink)
    };

    let json = output.json;
    let packets = output.packets;
    let live = output.live;
    let mut write_error = None;
    let summary = session.run(source, sink.as_mut(), |event| {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => write_error = Some(e),
            }
        } else if packets {
            if let Event::SessionEnded { summary, .. } = event {
                eprint!("{}", format_summary(summary));
            }
        } else {
            print_event(event, live);
        }
    });

    if let Some(e) = write_error {
        return Err(e.into());
    }
    Ok(summary)
}

/// Width of the energy bar between the brackets.
const BAR_WIDTH: usize = 30;

fn print_event(event: &Event, live: bool) {
    match event {
        Event::SessionStarted {
            session_id,
            duration_ms,
            ..
        } => println!("Session {session_id} ({:.1}s)", *duration_ms as f64 / 1000.0),
        Event::LingerArmed {
            peak,
            linger_ms,
            elapsed_ms,
            ..
        } => println!(
            "[{:>6.2}s] burst {:.2}, lingering {linger_ms} ms",
            *elapsed_ms as f64 / 1000.0,
            peak
        ),
        Event::TierChanged {
            from,
            to,
            elapsed_ms,
            ..
        } => println!(
            "[{:>6.2}s] {from} -> {to}",
            *elapsed_ms as f64 / 1000.0
        ),
        Event::SampleSkipped { reason, .. } => eprintln!("skipped: {reason}"),
        Event::Snapshot { snapshot, .. } => {
            if live {
                println!("{}", status_line(snapshot));
            }
        }
        Event::SessionEnded { summary, .. } => print!("{}", format_summary(summary)),
    }
}

/// `[#####-----]` with `energy` in [0, 1]; partial cells round down.
pub fn energy_bar(energy: f64, width: usize) -> String {
    let fill = if energy.is_nan() { 0.0 } else { energy.clamp(0.0, 1.0) };
    let filled = ((fill * width as f64) as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn status_line(snapshot: &DisplaySnapshot) -> String {
    format!(
        "Time left: {:>4.1}s | Gyro now: {:>7.1} avg: {:.2} | Energy: {:.2} {} | Rumble: {:.2} | {}",
        snapshot.remaining_ms as f64 / 1000.0,
        snapshot.magnitude,
        snapshot.rolling_average,
        snapshot.energy,
        energy_bar(snapshot.energy, BAR_WIDTH),
        snapshot.amplitude,
        snapshot.tier,
    )
}

pub fn format_summary(summary: &SessionSummary) -> String {
    format!(
        "Final mean intensity: {:.3}\n\
         Final tier: {}\n\
         Ticks: {} (skipped {})\n\
         Elapsed: {} ms (window {} ms)\n\
         Interrupted: {}\n",
        summary.final_mean_intensity,
        summary.final_tier,
        summary.ticks,
        summary.skipped,
        summary.elapsed_ms,
        summary.window_ms,
        if summary.interrupted { "yes" } else { "no" },
    )
}

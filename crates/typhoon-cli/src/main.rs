use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "typhoon-cli", version, about = "Typhoon CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/typhoon/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session on synthetic motion
    Simulate(commands::simulate::SimulateArgs),
    /// Run a session on a recorded motion file
    Replay(commands::replay::ReplayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show the storm tier table
    Tiers(commands::tiers::TiersArgs),
    /// Encode a rumble command as an 8-byte packet
    Encode(commands::encode::EncodeArgs),
    /// Show the pre-session countdown pulses
    Countdown(commands::countdown::CountdownArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TYPHOON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::run(config, args),
        Commands::Replay(args) => commands::replay::run(config, args),
        Commands::Config { action } => commands::config::run(config, action),
        Commands::Tiers(args) => commands::tiers::run(config, args),
        Commands::Encode(args) => commands::encode::run(config, args),
        Commands::Countdown(args) => commands::countdown::run(config, args),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

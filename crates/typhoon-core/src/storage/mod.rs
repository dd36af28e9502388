mod config;

pub use config::{
    Config, CountdownConfig, EnergyConfig, LingerConfig, RumbleConfig, SensorConfig,
    SessionConfig,
};

use std::path::PathBuf;

/// Returns `~/.config/typhoon[-dev]/` based on TYPHOON_ENV.
///
/// Set TYPHOON_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TYPHOON_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("typhoon-dev")
    } else {
        base_dir.join("typhoon")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

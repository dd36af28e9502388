use std::path::Path;

use clap::Subcommand;
use typhoon_core::{Config, ConfigError};

use super::{config_path, load_config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "sensor.threshold", "linger.curve")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List {
        /// Print as TOML, the on-disk format, instead of JSON
        #[arg(long = "toml")]
        as_toml: bool,
    },
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
    /// Check the config file for invalid values
    Validate,
}

pub fn run(explicit: Option<&Path>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(explicit)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let path = config_path(explicit)?;
            let mut config = Config::load_from(&path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            println!("ok");
        }
        ConfigAction::List { as_toml } => {
            let config = load_config(explicit)?;
            if as_toml {
                print!("{}", toml::to_string_pretty(&config)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save_to(&config_path(explicit)?)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", config_path(explicit)?.display());
        }
        ConfigAction::Validate => {
            let config = load_config(explicit)?;
            config.validate()?;
            println!("config ok");
        }
    }
    Ok(())
}

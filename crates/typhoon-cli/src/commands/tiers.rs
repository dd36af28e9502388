use std::path::Path;

use clap::Args;

#[derive(Args, Debug)]
pub struct TiersArgs {
    /// Classify this normalized value (0.0-1.0) instead of listing the table
    #[arg(long, value_name = "VALUE")]
    pub classify: Option<f64>,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(config_path: Option<&Path>, args: TiersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let table = config.tier_table()?;

    if let Some(value) = args.classify {
        let classification = table.classify(value, 1.0);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&classification)?);
        } else {
            println!("{classification}");
        }
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(table.tiers())?);
        return Ok(());
    }

    let max_level = table.len().saturating_sub(1);
    for (level, tier) in table.tiers().iter().enumerate() {
        println!(
            "Level {level}/{max_level}  >= {:.3}  {}",
            tier.lower_bound, tier.label
        );
    }
    Ok(())
}

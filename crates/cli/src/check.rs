use crate::config::mask_endpoint;
use anyhow::{bail, Result};
use clap::Subcommand;
use sitelog::ClientConfig;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Report missing or invalid settings
    Check,
}

pub fn handle_config(command: &ConfigCommands, config: &ClientConfig) -> Result<()> {
    match command {
        ConfigCommands::Check => handle_check(config),
    }
}

fn handle_check(config: &ClientConfig) -> Result<()> {
    let show = |value: &str| {
        if value.trim().is_empty() {
            "(not set)".to_string()
        } else {
            mask_endpoint(value)
        }
    };
    println!("vision_api_endpoint:    {}", show(&config.vision_api_endpoint));
    println!("text_analysis_endpoint: {}", show(&config.text_analysis_endpoint));
    println!("sheets_api_endpoint:    {}", show(&config.sheets_api_endpoint));
    println!(
        "drive_api_endpoint:     {}",
        config
            .archive_endpoint()
            .map(mask_endpoint)
            .unwrap_or_else(|| "(not set, photos will not be archived)".to_string())
    );
    println!("sheet_name:             {}", config.sheet_name);
    println!("model:                  {}", config.model);
    println!("strategy:               {:?}", config.strategy);

    let missing = config.missing_settings();
    if !missing.is_empty() {
        bail!("Missing required settings: {}", missing.join(", "));
    }
    config.validate()?;
    println!("✅ Configuration is complete.");
    Ok(())
}

use crate::pipeline::build_reconciler;
use anyhow::{bail, Result};
use clap::Parser;
use sitelog::ClientConfig;

#[derive(Parser, Debug)]
pub struct FindArgs {
    /// The site address to look up
    #[arg(required = true)]
    pub address: String,
}

pub async fn handle_find(args: &FindArgs, config: &ClientConfig) -> Result<()> {
    if config.sheets_api_endpoint.trim().is_empty() {
        bail!("sheets_api_endpoint is not configured.");
    }
    let reconciler = build_reconciler(config)?;
    match reconciler.find_site(&args.address).await? {
        Some(row) => println!("'{}' is on row {row} of '{}'.", args.address, reconciler.sheet_name()),
        None => println!("No site found for '{}'.", args.address),
    }
    Ok(())
}

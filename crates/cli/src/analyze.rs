use crate::pipeline::build_controller;
use anyhow::Result;
use clap::Parser;
use sitelog::{ClientConfig, ExtractedFields, ExtractionStrategy, PhotoBlob};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// The site photo to read
    #[arg(required = true)]
    pub photo: PathBuf,
    /// Field extraction strategy: `heuristic` or `model`
    #[arg(long)]
    pub strategy: Option<ExtractionStrategy>,
    /// Address to use when none can be read from the photo
    #[arg(long)]
    pub prefill_address: Option<String>,
    /// Print the fields as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_analyze(args: &AnalyzeArgs, config: &ClientConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    let mut controller = build_controller(&config, false)?;
    if let Some(address) = &args.prefill_address {
        controller.set_prefill_address(address.as_str());
    }

    info!("Analyzing photo: {}", args.photo.display());
    let photo = PhotoBlob::from_path(&args.photo).await?;
    controller.on_photo_selected(photo);
    let fields = controller.on_analyze_requested().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        print_fields(&fields);
    }
    Ok(())
}

pub(crate) fn print_fields(fields: &ExtractedFields) {
    for (label, value) in [
        ("Address", &fields.address),
        ("Company", &fields.company_name),
        ("Contact", &fields.contact_name),
        ("Email", &fields.email),
        ("Website", &fields.website),
        ("Phone", &fields.phone),
    ] {
        println!("{label:>8}: {value}");
    }
}

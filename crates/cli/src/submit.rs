use crate::{analyze::print_fields, pipeline::build_controller};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser};
use sitelog::{
    ArchiveStatus, ClientConfig, ExtractedFields, ExtractionStrategy, PhotoBlob, SiteRecord,
};
use std::path::PathBuf;
use tracing::info;

/// Values typed by the user. Each one replaces the extracted value.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl FieldArgs {
    pub fn apply(&self, fields: &mut ExtractedFields) {
        for (value, target) in [
            (&self.address, &mut fields.address),
            (&self.company, &mut fields.company_name),
            (&self.contact, &mut fields.contact_name),
            (&self.email, &mut fields.email),
            (&self.website, &mut fields.website),
            (&self.phone, &mut fields.phone),
        ] {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// The site photo to submit
    #[arg(required = true)]
    pub photo: PathBuf,
    #[command(flatten)]
    pub fields: FieldArgs,
    /// Address to use when none can be read from the photo
    #[arg(long)]
    pub prefill_address: Option<String>,
    /// The date the photo was taken (YYYY-MM-DD), today by default
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Field extraction strategy: `heuristic` or `model`
    #[arg(long)]
    pub strategy: Option<ExtractionStrategy>,
    /// Submit only the values given on the command line, without OCR
    #[arg(long)]
    pub skip_analysis: bool,
    /// Do not back the photo up to Drive
    #[arg(long)]
    pub no_archive: bool,
    /// Print the submission report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_submit(args: &SubmitArgs, config: &ClientConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    let mut controller = build_controller(&config, !args.no_archive)?;
    if let Some(address) = &args.prefill_address {
        controller.set_prefill_address(address.as_str());
    }

    info!("Submitting photo: {}", args.photo.display());
    controller.on_photo_selected(PhotoBlob::from_path(&args.photo).await?);

    let mut fields = if args.skip_analysis {
        ExtractedFields {
            address: controller.prefill_address().unwrap_or_default().to_string(),
            ..Default::default()
        }
    } else {
        controller.on_analyze_requested().await?
    };
    args.fields.apply(&mut fields);

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let record = SiteRecord::from_fields(&fields, date);
    let report = controller.on_submit(record).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_fields(&fields);
    println!("✅ {}", report.message());
    if let ArchiveStatus::Uploaded(file) = &report.archive {
        match &file.web_view_link {
            Some(link) => println!("📷 Photo saved to Drive: {link}"),
            None => println!("📷 Photo saved to Drive as '{}'", file.file_name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_replace_extracted_ones() {
        let mut fields = ExtractedFields {
            address: "12 Oak Ave".to_string(),
            company_name: "Acme".to_string(),
            phone: "555-123-4567".to_string(),
            ..Default::default()
        };
        let typed = FieldArgs {
            address: Some("12 Oak Avenue".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        };
        typed.apply(&mut fields);
        assert_eq!(fields.address, "12 Oak Avenue");
        assert_eq!(fields.company_name, "Acme");
        assert_eq!(fields.phone, "");
    }
}

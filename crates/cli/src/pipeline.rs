//! Wires the configured proxy clients into a [`SubmissionController`].

use sitelog::{
    errors::SiteError,
    providers::{ChatCompletionProvider, DriveArchiver, PhotoArchiver, VisionProvider},
    ClientConfig, ExtractionStrategy, FieldExtractor, HeuristicExtractor, ModelExtractor,
    SubmissionController,
};
use sitelog_sheets::{Reconciler, SheetsProxyClient};
use tracing::info;

/// Picks the field extractor for `strategy`.
pub fn build_extractor(
    config: &ClientConfig,
    strategy: ExtractionStrategy,
) -> Result<Box<dyn FieldExtractor>, SiteError> {
    Ok(match strategy {
        ExtractionStrategy::Heuristic => Box::new(HeuristicExtractor),
        ExtractionStrategy::Model => {
            let provider = ChatCompletionProvider::new(
                config.text_analysis_endpoint.trim(),
                None,
                config.model.trim(),
            )?;
            Box::new(ModelExtractor::new(Box::new(provider)))
        }
    })
}

pub fn build_reconciler(config: &ClientConfig) -> Result<Reconciler, SiteError> {
    let store = SheetsProxyClient::new(config.sheets_api_endpoint.trim())?;
    Ok(Reconciler::new(Box::new(store), config.sheet_name.trim()))
}

/// Validates `config` and builds a controller. Archival is enabled only when
/// an archive endpoint is configured and `archive` is true.
pub fn build_controller(
    config: &ClientConfig,
    archive: bool,
) -> Result<SubmissionController, SiteError> {
    config.validate()?;

    let ocr = VisionProvider::new(config.vision_api_endpoint.trim())?;
    let extractor = build_extractor(config, config.strategy)?;
    let store = build_reconciler(config)?;
    let archiver: Option<Box<dyn PhotoArchiver>> = match config.archive_endpoint() {
        Some(endpoint) if archive => Some(Box::new(DriveArchiver::new(endpoint)?)),
        _ => None,
    };
    info!(
        strategy = ?config.strategy,
        archive = archiver.is_some(),
        sheet = %config.sheet_name,
        "Submission pipeline ready"
    );

    Ok(SubmissionController::new(
        Box::new(ocr),
        extractor,
        Box::new(store),
        archiver,
    ))
}

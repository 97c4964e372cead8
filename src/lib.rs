// src/lib.rs
//! Extraction of structured campaign performance from the plain-text
//! reports an ad platform generates, plus the thin glue around it
//! (webhook source, authoritative-field overlay, local cache).

pub mod extractors;
pub mod report;
pub mod storage;
pub mod upstream;
pub mod utils;

use once_cell::sync::Lazy;

pub use extractors::{ExtractorConfig, ReportExtractor};
pub use report::{CampaignReport, ProcessedReport};
pub use utils::AppError;

static DEFAULT_EXTRACTOR: Lazy<ReportExtractor> = Lazy::new(ReportExtractor::new);

/// Parses one report document with the default rules. Total: any input yields a full record.
pub fn parse_report(document: &str) -> CampaignReport {
    DEFAULT_EXTRACTOR.parse(document)
}

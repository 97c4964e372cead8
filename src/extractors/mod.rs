// src/extractors/mod.rs
pub mod labels;
pub mod numeric;
pub mod report;
pub mod rules;

// Re-export key extraction types for convenience
pub use report::{ExtractorConfig, FieldTrace, ReportExtractor};

// src/report/mod.rs
pub mod models;
pub mod summary;

pub use models::{
    CampaignReport, Checkpoint, Clicks, CostPair, Investment, ProcessedReport, Results, Settings,
    VideoPerformance, DEFAULT_CAMPAIGN_NAME, NOT_AVAILABLE,
};
pub use summary::{filter_by_name, PortfolioSummary};

// src/report/summary.rs
use serde::Serialize;

use crate::report::models::ProcessedReport;

const ACTIVE_STATUS: &str = "ACTIVE";

/// Totals across a set of processed reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub report_count: usize,
    pub active_count: usize,
    pub total_spent: f64,
    pub total_reach: f64,
    pub average_ctr: f64,
}

impl PortfolioSummary {
    pub fn from_reports(reports: &[ProcessedReport]) -> Self {
        let total_spent = reports.iter().map(|r| r.report.investment.total_spent).sum();
        let total_reach = reports.iter().map(|r| r.report.investment.reach).sum();
        let average_ctr = if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(|r| r.report.clicks.ctr).sum::<f64>() / reports.len() as f64
        };

        Self {
            report_count: reports.len(),
            active_count: reports
                .iter()
                .filter(|r| r.report.settings.status == ACTIVE_STATUS)
                .count(),
            total_spent,
            total_reach,
            average_ctr,
        }
    }
}

/// Case-insensitive substring match on the campaign name. An empty term keeps everything.
pub fn filter_by_name<'a>(reports: &'a [ProcessedReport], term: &str) -> Vec<&'a ProcessedReport> {
    let needle = term.to_lowercase();
    reports
        .iter()
        .filter(|r| r.report.campaign_name.to_lowercase().contains(&needle))
        .collect()
}

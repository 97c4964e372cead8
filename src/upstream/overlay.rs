// src/upstream/overlay.rs
//! Lays the upstream source's authoritative fields over a parsed report.
//!
//! An upstream value wins whenever it is present. Empty or whitespace-only
//! strings count as absent, so they never erase what the text yielded.

use crate::extractors::ReportExtractor;
use crate::report::models::{CampaignReport, ProcessedReport, Settings};
use crate::upstream::models::UpstreamItem;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"];

/// The webhook ships report text with literal `\n` escapes.
pub fn decode_report_text(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A link is usable when it is non-blank and names an http(s) resource.
pub fn usable_link(link: &Option<String>) -> Option<&str> {
    present(link).filter(|l| l.contains("http"))
}

pub fn is_image_link(link: &str) -> bool {
    let lower = link.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Builds the final record from the upstream item and the record parsed from its text.
pub fn overlay(item: &UpstreamItem, parsed: CampaignReport) -> ProcessedReport {
    let ad_link = usable_link(&item.ad_link).map(str::to_string);
    let is_image = ad_link.as_deref().is_some_and(is_image_link);

    let status = present(&item.real_status)
        .or_else(|| present(&item.status))
        .map(str::to_string)
        .unwrap_or(parsed.settings.status);

    let report = CampaignReport {
        campaign_name: present(&item.ad_name)
            .map(str::to_string)
            .unwrap_or(parsed.campaign_name),
        created_at: present(&item.created_at).map(str::to_string).or(parsed.created_at),
        video_url: ad_link.clone().or(parsed.video_url),
        settings: Settings { status, ..parsed.settings },
        ..parsed
    };

    ProcessedReport {
        id: item.id.to_string(),
        ad_link,
        updated_at: present(&item.updated_at).map(str::to_string),
        is_image,
        report,
    }
}

/// Decodes, parses and overlays one upstream item.
pub fn process_item(extractor: &ReportExtractor, item: &UpstreamItem) -> ProcessedReport {
    let parsed = extractor.parse(&decode_report_text(&item.report_text));
    overlay(item, parsed)
}

pub fn find_report_by_id<'a>(reports: &'a [ProcessedReport], id: &str) -> Option<&'a ProcessedReport> {
    reports.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::models::ItemId;

    const REPORT_TEXT: &str = "Campanha: Texto\\nData de criação: 01/01/2024\\nStatus atual: PAUSED\\nGasto Total: R$ 10,00\\n🔗 Link do vídeo: https://cdn.example.com/a.mp4";

    fn item() -> UpstreamItem {
        UpstreamItem {
            id: ItemId::Number(7),
            report_text: REPORT_TEXT.to_string(),
            status: None,
            real_status: None,
            created_at: None,
            updated_at: None,
            ad_link: None,
            ad_name: None,
        }
    }

    #[test]
    fn test_escaped_newlines_are_decoded_before_parsing() {
        let processed = process_item(&ReportExtractor::new(), &item());
        assert_eq!(processed.id, "7");
        assert_eq!(processed.report.campaign_name, "Texto");
        assert_eq!(processed.report.created_at.as_deref(), Some("01/01/2024"));
        assert_eq!(processed.report.investment.total_spent, 10.0);
    }

    #[test]
    fn test_absent_upstream_fields_keep_parsed_values() {
        let processed = process_item(&ReportExtractor::new(), &item());
        assert_eq!(processed.report.settings.status, "PAUSED");
        assert_eq!(
            processed.report.video_url.as_deref(),
            Some("https://cdn.example.com/a.mp4")
        );
        assert!(processed.ad_link.is_none());
        assert!(processed.updated_at.is_none());
        assert!(!processed.is_image);
    }

    #[test]
    fn test_empty_upstream_strings_count_as_absent() {
        let mut upstream = item();
        upstream.ad_name = Some(String::new());
        upstream.real_status = Some("  ".to_string());
        upstream.status = Some(String::new());
        upstream.created_at = Some(String::new());
        upstream.ad_link = Some("".to_string());

        let processed = process_item(&ReportExtractor::new(), &upstream);
        assert_eq!(processed.report.campaign_name, "Texto");
        assert_eq!(processed.report.settings.status, "PAUSED");
        assert_eq!(processed.report.created_at.as_deref(), Some("01/01/2024"));
        assert!(processed.ad_link.is_none());
    }

    #[test]
    fn test_upstream_values_take_precedence() {
        let mut upstream = item();
        upstream.ad_name = Some("Nome Oficial".to_string());
        upstream.status = Some("ACTIVE".to_string());
        upstream.created_at = Some("2024-12-12T10:00:00".to_string());
        upstream.updated_at = Some("2024-12-13T10:00:00".to_string());
        upstream.ad_link = Some("https://cdn.example.com/b.mp4".to_string());

        let processed = process_item(&ReportExtractor::new(), &upstream);
        assert_eq!(processed.report.campaign_name, "Nome Oficial");
        assert_eq!(processed.report.settings.status, "ACTIVE");
        assert_eq!(processed.report.created_at.as_deref(), Some("2024-12-12T10:00:00"));
        assert_eq!(processed.updated_at.as_deref(), Some("2024-12-13T10:00:00"));
        assert_eq!(processed.ad_link.as_deref(), Some("https://cdn.example.com/b.mp4"));
        assert_eq!(
            processed.report.video_url.as_deref(),
            Some("https://cdn.example.com/b.mp4")
        );
        // Non-overlaid fields come from the text untouched.
        assert_eq!(processed.report.investment.total_spent, 10.0);
    }

    #[test]
    fn test_real_status_beats_status() {
        let mut upstream = item();
        upstream.status = Some("ACTIVE".to_string());
        upstream.real_status = Some("COMPLETED".to_string());
        let processed = process_item(&ReportExtractor::new(), &upstream);
        assert_eq!(processed.report.settings.status, "COMPLETED");
    }

    #[test]
    fn test_image_links_are_flagged() {
        let mut upstream = item();
        upstream.ad_link = Some("https://cdn.example.com/banner.PNG?v=2".to_string());
        let processed = process_item(&ReportExtractor::new(), &upstream);
        assert!(processed.is_image);
    }

    #[test]
    fn test_non_http_link_is_ignored() {
        assert!(usable_link(&Some("ftp-less text".to_string())).is_none());
        assert!(usable_link(&None).is_none());
        assert_eq!(usable_link(&Some(" http://a.b/c ".to_string())), Some("http://a.b/c"));
    }

    #[test]
    fn test_find_report_by_id() {
        let extractor = ReportExtractor::new();
        let mut second = item();
        second.id = ItemId::Text("abc".to_string());
        let reports = vec![process_item(&extractor, &item()), process_item(&extractor, &second)];
        assert_eq!(find_report_by_id(&reports, "abc").map(|r| r.id.as_str()), Some("abc"));
        assert!(find_report_by_id(&reports, "nope").is_none());
    }
}

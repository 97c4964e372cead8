// src/upstream/client.rs
use crate::extractors::ReportExtractor;
use crate::report::models::ProcessedReport;
use crate::upstream::models::{UpstreamItem, WebhookPayload};
use crate::upstream::overlay::process_item;
use crate::utils::error::UpstreamError;
use reqwest::header;
use std::time::Duration;

const USER_AGENT: &str = concat!("campaign-report/", env!("CARGO_PKG_VERSION"));
// Generation runs the upstream pipeline before answering; give it room.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Fetches raw reports from the upstream webhooks and turns them into processed records.
pub struct ReportSource {
    client: reqwest::Client,
    extractor: ReportExtractor,
}

impl ReportSource {
    pub fn new(extractor: ReportExtractor) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, extractor })
    }

    /// POSTs an empty JSON object to `url` and decodes the item list it returns.
    pub async fn fetch_items(&self, url: &str) -> Result<Vec<UpstreamItem>, UpstreamError> {
        tracing::info!("Requesting reports from: {}", url);

        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await?; // Propagates reqwest::Error as UpstreamError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(UpstreamError::Http(status));
        }

        let body = response.text().await?;
        tracing::debug!("Received {} bytes from {}", body.len(), url);
        parse_payload(&body)
    }

    /// Fetches, parses and overlays every report the webhook returns.
    pub async fn fetch_reports(&self, url: &str) -> Result<Vec<ProcessedReport>, UpstreamError> {
        let items = self.fetch_items(url).await?;
        let reports: Vec<ProcessedReport> = items
            .iter()
            .map(|item| process_item(&self.extractor, item))
            .collect();
        tracing::info!("Processed {} reports", reports.len());
        Ok(reports)
    }
}

/// Decodes a webhook body. An empty body means no reports.
pub fn parse_payload(body: &str) -> Result<Vec<UpstreamItem>, UpstreamError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<WebhookPayload>(body)
        .map(WebhookPayload::into_items)
        .map_err(|e| UpstreamError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_list() {
        let items = parse_payload(r#"[{"id": 1, "relatorio": "Campanha: A"}]"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].report_text, "Campanha: A");
    }

    #[test]
    fn test_parse_payload_empty_body() {
        assert!(parse_payload("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_payload_rejects_malformed_json() {
        let err = parse_payload("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, UpstreamError::Parse(_)));
    }

    #[test]
    fn test_unreachable_webhook_is_an_error() {
        let source = ReportSource::new(ReportExtractor::new()).unwrap();
        let result = tokio_test::block_on(source.fetch_reports("http://127.0.0.1:9/webhook"));
        assert!(result.is_err());
    }
}

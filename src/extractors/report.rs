// src/extractors/report.rs

// --- Imports ---
use crate::extractors::labels;
use crate::extractors::rules::{
    compile_with_label, find_spec, CompiledRule, DEFAULT_FINAL_CHECKPOINT_LABELS, DEFAULT_RULES,
    FINAL_CHECKPOINT_FIELD,
};
use crate::report::models::{CampaignReport, DEFAULT_CAMPAIGN_NAME};
use crate::utils::error::ExtractError;

/// Knobs for report versions whose wording drifts.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Campaign name used when the document has no `Campanha:` line.
    pub placeholder_name: String,
    /// Regex fragment matching the label of the last retention checkpoint
    /// (`Até o final do vídeo: ...`). Anything between it and the colon is ignored.
    pub final_checkpoint_label: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            placeholder_name: DEFAULT_CAMPAIGN_NAME.to_string(),
            final_checkpoint_label: labels::alternation(DEFAULT_FINAL_CHECKPOINT_LABELS),
        }
    }
}

/// Where one rule matched in a document, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTrace {
    pub field: &'static str,
    pub span: Option<(usize, usize)>,
    pub matched: Option<String>,
}

/// Turns a report document into a [`CampaignReport`].
///
/// Stateless after construction; one instance can serve any number of
/// documents, from any number of threads.
#[derive(Clone)]
pub struct ReportExtractor {
    placeholder_name: String,
    rules: Vec<CompiledRule>,
}

impl Default for ReportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportExtractor {
    pub fn new() -> Self {
        Self {
            placeholder_name: DEFAULT_CAMPAIGN_NAME.to_string(),
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Builds an extractor with a custom placeholder and final-checkpoint label.
    pub fn with_config(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let mut rules = DEFAULT_RULES.clone();
        if let Some(spec) = find_spec(FINAL_CHECKPOINT_FIELD) {
            let custom = compile_with_label(spec, &config.final_checkpoint_label)?;
            for rule in rules.iter_mut().filter(|r| r.field == FINAL_CHECKPOINT_FIELD) {
                *rule = custom.clone();
            }
        }
        tracing::debug!(
            "Configured extractor: placeholder '{}', final checkpoint label '{}'",
            config.placeholder_name,
            config.final_checkpoint_label
        );
        Ok(Self { placeholder_name: config.placeholder_name.clone(), rules })
    }

    /// Extracts every known field. Never fails: a field whose label is missing
    /// or whose value does not parse keeps its default.
    pub fn parse(&self, document: &str) -> CampaignReport {
        let mut report = CampaignReport {
            campaign_name: self.placeholder_name.clone(),
            ..CampaignReport::default()
        };

        let mut matched = 0usize;
        for rule in &self.rules {
            if rule.apply(document, &mut report) {
                matched += 1;
            } else {
                tracing::trace!("No match for {}", rule.field);
            }
        }

        tracing::debug!(
            "Parsed report '{}': {}/{} fields matched ({} bytes)",
            report.campaign_name,
            matched,
            self.rules.len(),
            document.len()
        );
        report
    }

    /// Reports, per rule, the text it matched (if any).
    pub fn trace(&self, document: &str) -> Vec<FieldTrace> {
        self.rules
            .iter()
            .map(|rule| match rule.regex.find(document) {
                Some(m) => FieldTrace {
                    field: rule.field,
                    span: Some((m.start(), m.end())),
                    matched: Some(m.as_str().to_string()),
                },
                None => FieldTrace { field: rule.field, span: None, matched: None },
            })
            .collect()
    }
}

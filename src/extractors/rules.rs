// src/extractors/rules.rs
//! The field-rule table: one entry per record field, each applied
//! independently to the whole document.
//!
//! A rule is `label(s) + glue + value`. The glue absorbs optional qualifying
//! words between a label and its colon (`Alcance (pessoas únicas): ...`).
//! Defaults are not stored here: a rule that does not match leaves the
//! field at its `CampaignReport::default()` value.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::extractors::labels;
use crate::extractors::numeric::{parse_count, parse_decimal};
use crate::report::models::{CampaignReport, Checkpoint, CostPair};
use crate::utils::error::ExtractError;

// --- Glue between label and value ---
const COLON: &str = r"[^:\n]*:[ \t]*";
/// Heading that owns a block: rest of the heading line, then the block.
const HEADING: &str = r"[ \t:]*\r?\n";

// --- Value shapes ---
const DECIMAL: &str = r"(\d[\d.,]*)";
const COUNT: &str = r"(\d[\d.]*)";
const MONEY: &str = r"(?:R\$\s*)?(\d[\d.,]*)";
const PERCENT: &str = r"(\d[\d.,]*)\s*%";
const COST_PAIR: &str = r"(\d[\d.]*)\s*\(\s*(?:R\$\s*)?(\d[\d.,]*)";
const CHECKPOINT: &str = r"(\d[\d.]*)\s*(?:pessoas?)?\s*=?\s*\(\s*(\d[\d.,]*)\s*%\s*\)";
const LINE: &str = r"([^\n]*)";
const TOKEN: &str = r"(\w+)";
const AGE_SPAN: &str = r"(\d+\s*a\s*\d+\s*anos)";
const URL: &str = r"(https?://\S+)";
const JOB_BLOCK: &str = r"(?s:(.*?))(?:\r?\n[ \t]*\r?\n|\r?\n[ \t]*📝|\r?\n[ \t]*🎯|\z)";
/// Ad copy may carry its own 🔗 lines; only the video-link heading ends it.
const CONTENT_BLOCK: &str =
    r"(?s:(.*?))(?:\r?\n[ \t]*🔗[ \t]*Link|\r?\n[ \t]*\r?\n[ \t]*(?:📽|🎯)|\z)";

/// Record field filled by the final retention checkpoint; its label is configurable.
pub const FINAL_CHECKPOINT_FIELD: &str = "videoPerformance.atEnd";

/// Labels for the final retention checkpoint when none is configured.
pub const DEFAULT_FINAL_CHECKPOINT_LABELS: &[&str] = &["Até o final", "Até 100%"];

pub type Apply = fn(&mut CampaignReport, &Captures<'_>);

/// Declarative description of one field rule.
pub struct RuleSpec {
    pub field: &'static str,
    pub labels: &'static [&'static str],
    /// Whole rule is case-insensitive, not just the first letter of each label word.
    pub any_case: bool,
    pub glue: &'static str,
    pub value: &'static str,
    pub apply: Apply,
}

/// A rule ready to run against a document.
#[derive(Clone)]
pub struct CompiledRule {
    pub field: &'static str,
    pub regex: Regex,
    apply: Apply,
}

impl CompiledRule {
    /// Runs the rule; returns whether it matched.
    pub fn apply(&self, document: &str, report: &mut CampaignReport) -> bool {
        match self.regex.captures(document) {
            Some(caps) => {
                (self.apply)(report, &caps);
                true
            }
            None => false,
        }
    }
}

pub static RULE_SPECS: &[RuleSpec] = &[
    // --- Header ---
    RuleSpec {
        field: "campaignName",
        labels: &["Campanha"],
        any_case: false,
        glue: COLON,
        value: LINE,
        apply: |r, c| {
            if let Some(name) = text(c) {
                r.campaign_name = name;
            }
        },
    },
    RuleSpec {
        field: "createdAt",
        labels: &["Data de criação"],
        any_case: false,
        glue: COLON,
        value: LINE,
        apply: |r, c| r.created_at = text(c),
    },
    RuleSpec {
        field: "videoUrl",
        labels: &["Link do vídeo"],
        any_case: false,
        glue: COLON,
        value: URL,
        apply: |r, c| r.video_url = text(c),
    },
    // --- Investment ---
    RuleSpec {
        field: "investment.totalSpent",
        labels: &["Gasto Total"],
        any_case: false,
        glue: COLON,
        value: MONEY,
        apply: |r, c| r.investment.total_spent = decimal(c, 1),
    },
    RuleSpec {
        field: "investment.reach",
        labels: &["Alcance"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.investment.reach = decimal(c, 1),
    },
    RuleSpec {
        field: "investment.impressions",
        labels: &["Impressões"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.investment.impressions = decimal(c, 1),
    },
    RuleSpec {
        field: "investment.frequency",
        labels: &["Frequência"],
        any_case: false,
        glue: COLON,
        value: DECIMAL,
        apply: |r, c| r.investment.frequency = decimal(c, 1),
    },
    RuleSpec {
        field: "investment.cpm",
        labels: &["CPM"],
        any_case: false,
        glue: COLON,
        value: MONEY,
        apply: |r, c| r.investment.cpm = decimal(c, 1),
    },
    // --- Clicks ---
    RuleSpec {
        field: "clicks.totalClicks",
        labels: &["Cliques Totais"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.clicks.total_clicks = decimal(c, 1),
    },
    RuleSpec {
        field: "clicks.uniqueClicks",
        labels: &["Cliques Únicos"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.clicks.unique_clicks = decimal(c, 1),
    },
    RuleSpec {
        field: "clicks.ctr",
        labels: &["CTR"],
        any_case: false,
        glue: COLON,
        value: PERCENT,
        apply: |r, c| r.clicks.ctr = decimal(c, 1),
    },
    RuleSpec {
        field: "clicks.cpc",
        labels: &["CPC"],
        any_case: false,
        glue: COLON,
        value: MONEY,
        apply: |r, c| r.clicks.cpc = decimal(c, 1),
    },
    // --- Results ---
    RuleSpec {
        field: "results.videoViews",
        labels: &["Visualizações do vídeo", "Visualizações qualificadas"],
        any_case: false,
        glue: COLON,
        value: COST_PAIR,
        apply: |r, c| r.results.video_views = cost_pair(c),
    },
    RuleSpec {
        field: "results.linkClicks",
        labels: &["Cliques no link"],
        any_case: false,
        glue: COLON,
        value: COST_PAIR,
        apply: |r, c| r.results.link_clicks = cost_pair(c),
    },
    RuleSpec {
        field: "results.reactions",
        labels: &["Reações no post"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.results.reactions = count(c, 1),
    },
    RuleSpec {
        field: "results.shares",
        labels: &["Compartilhamentos"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.results.shares = count(c, 1),
    },
    RuleSpec {
        field: "results.netLikes",
        labels: &["Curtidas líquidas"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.results.net_likes = count(c, 1),
    },
    RuleSpec {
        field: "results.conversations",
        labels: &["Conversas iniciadas"],
        any_case: false,
        glue: COLON,
        value: COST_PAIR,
        apply: |r, c| r.results.conversations = cost_pair(c),
    },
    RuleSpec {
        field: "results.totalEngagements",
        labels: &["Engajamentos totais"],
        any_case: false,
        glue: COLON,
        value: COST_PAIR,
        apply: |r, c| r.results.total_engagements = cost_pair(c),
    },
    // --- Settings ---
    RuleSpec {
        field: "settings.status",
        labels: &["Status atual"],
        any_case: false,
        glue: COLON,
        value: TOKEN,
        apply: |r, c| r.settings.status = group(c, 1).to_string(),
    },
    RuleSpec {
        field: "settings.ctaType",
        labels: &["Tipo de CTA"],
        any_case: false,
        glue: COLON,
        value: TOKEN,
        apply: |r, c| r.settings.cta_type = group(c, 1).to_string(),
    },
    RuleSpec {
        field: "settings.ageRange",
        labels: &["Faixa etária", "Público"],
        any_case: false,
        glue: COLON,
        value: AGE_SPAN,
        apply: |r, c| r.settings.age_range = group(c, 1).to_string(),
    },
    RuleSpec {
        field: "settings.interests",
        labels: &["Interesses"],
        any_case: false,
        glue: COLON,
        value: LINE,
        apply: |r, c| r.settings.interests = list(c),
    },
    RuleSpec {
        field: "settings.jobTitles",
        labels: &["Cargos de trabalho", "Cargo de trabalho"],
        any_case: false,
        glue: COLON,
        value: JOB_BLOCK,
        apply: |r, c| r.settings.job_titles = list(c),
    },
    // --- Creative ---
    RuleSpec {
        field: "content",
        labels: &["Conteúdo do anúncio"],
        any_case: true,
        glue: HEADING,
        value: CONTENT_BLOCK,
        apply: |r, c| r.content = text(c).unwrap_or_default(),
    },
    // --- Video retention ---
    RuleSpec {
        field: "videoPerformance.totalViews",
        labels: &["Total de visualizações"],
        any_case: false,
        glue: COLON,
        value: COUNT,
        apply: |r, c| r.video_performance.total_views = count(c, 1),
    },
    RuleSpec {
        field: "videoPerformance.at25",
        labels: &["Até 25%"],
        any_case: true,
        glue: COLON,
        value: CHECKPOINT,
        apply: |r, c| r.video_performance.at25 = checkpoint(c),
    },
    RuleSpec {
        field: "videoPerformance.at50",
        labels: &["Até 50%"],
        any_case: true,
        glue: COLON,
        value: CHECKPOINT,
        apply: |r, c| r.video_performance.at50 = checkpoint(c),
    },
    RuleSpec {
        field: "videoPerformance.at75",
        labels: &["Até 75%"],
        any_case: true,
        glue: COLON,
        value: CHECKPOINT,
        apply: |r, c| r.video_performance.at75 = checkpoint(c),
    },
    RuleSpec {
        field: FINAL_CHECKPOINT_FIELD,
        labels: DEFAULT_FINAL_CHECKPOINT_LABELS,
        any_case: true,
        glue: COLON,
        value: CHECKPOINT,
        apply: |r, c| r.video_performance.at_end = checkpoint(c),
    },
];

/// Rules compiled from [`RULE_SPECS`] with no overrides.
pub static DEFAULT_RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    RULE_SPECS
        .iter()
        .map(|spec| {
            let pattern = build_pattern(spec, &labels::alternation(spec.labels));
            let regex = Regex::new(&pattern)
                .unwrap_or_else(|e| panic!("Failed to compile rule {}: {}", spec.field, e));
            CompiledRule { field: spec.field, regex, apply: spec.apply }
        })
        .collect()
});

/// Compiles `spec` with a caller-supplied label regex in place of its built-in labels.
pub fn compile_with_label(spec: &RuleSpec, label_regex: &str) -> Result<CompiledRule, ExtractError> {
    let pattern = build_pattern(spec, &format!("(?:{})", label_regex));
    let invalid = |reason: String| ExtractError::InvalidPattern { field: spec.field, reason };
    let regex = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;

    // Value groups are read by index; extra groups in the label would shift them.
    let expected = Regex::new(spec.value).map_err(|e| invalid(e.to_string()))?.captures_len();
    if regex.captures_len() != expected {
        return Err(invalid("label must not contain capture groups; use (?:...)".to_string()));
    }
    Ok(CompiledRule { field: spec.field, regex, apply: spec.apply })
}

pub fn find_spec(field: &str) -> Option<&'static RuleSpec> {
    RULE_SPECS.iter().find(|spec| spec.field == field)
}

/// Labels open their line; only bullets, emoji and spacing may precede them.
const LINE_START: &str = r"(?m)^[^\p{L}\p{N}\n]*";

fn build_pattern(spec: &RuleSpec, labels: &str) -> String {
    let flags = if spec.any_case { "(?i)" } else { "" };
    format!("{}{}{}{}{}", flags, LINE_START, labels, spec.glue, spec.value)
}

// --- Capture normalization ---

fn group<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map(|m| m.as_str()).unwrap_or_default()
}

fn decimal(caps: &Captures<'_>, idx: usize) -> f64 {
    parse_decimal(group(caps, idx))
}

fn count(caps: &Captures<'_>, idx: usize) -> u64 {
    parse_count(group(caps, idx))
}

fn cost_pair(caps: &Captures<'_>) -> CostPair {
    CostPair { count: count(caps, 1), cost: decimal(caps, 2) }
}

fn checkpoint(caps: &Captures<'_>) -> Checkpoint {
    Checkpoint {
        count: count(caps, 1),
        percentage: decimal(caps, 2).clamp(0.0, 100.0),
    }
}

/// Trimmed capture, `None` when blank.
fn text(caps: &Captures<'_>) -> Option<String> {
    let value = group(caps, 1).trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Comma-separated capture; segments trimmed, blanks dropped.
fn list(caps: &Captures<'_>) -> Vec<String> {
    group(caps, 1)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_rule_compiles() {
        assert_eq!(DEFAULT_RULES.len(), RULE_SPECS.len());
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<&str> = RULE_SPECS.iter().map(|s| s.field).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULE_SPECS.len());
    }

    #[test]
    fn test_qualifier_between_label_and_colon() {
        let mut report = CampaignReport::default();
        let rule = DEFAULT_RULES.iter().find(|r| r.field == "investment.reach").unwrap();
        assert!(rule.apply("Alcance (pessoas únicas): 12.500 pessoas", &mut report));
        assert_eq!(report.investment.reach, 12500.0);
    }

    #[test]
    fn test_custom_label_for_final_checkpoint() {
        let spec = find_spec(FINAL_CHECKPOINT_FIELD).unwrap();
        let rule = compile_with_label(spec, "Assistiram tudo").unwrap();
        let mut report = CampaignReport::default();
        assert!(rule.apply("Assistiram tudo: 12 pessoas = (4,50%)", &mut report));
        assert_eq!(report.video_performance.at_end, Checkpoint { count: 12, percentage: 4.5 });
    }

    #[test]
    fn test_invalid_custom_label_is_reported() {
        let spec = find_spec(FINAL_CHECKPOINT_FIELD).unwrap();
        let err = compile_with_label(spec, "Até (o final").err().unwrap();
        assert!(err.to_string().contains(FINAL_CHECKPOINT_FIELD));
    }

    #[test]
    fn test_custom_label_with_capture_group_is_rejected() {
        let spec = find_spec(FINAL_CHECKPOINT_FIELD).unwrap();
        assert!(compile_with_label(spec, "Assistiram (tudo)").is_err());
        assert!(compile_with_label(spec, "Assistiram (?:tudo)").is_ok());
    }

    #[test]
    fn test_custom_label_may_start_with_punctuation() {
        let spec = find_spec(FINAL_CHECKPOINT_FIELD).unwrap();
        let rule = compile_with_label(spec, r"\(100%\)").unwrap();
        let mut report = CampaignReport::default();
        assert!(rule.apply("(100%): 4 pessoas = (5,00%)", &mut report));
        assert_eq!(report.video_performance.at_end, Checkpoint { count: 4, percentage: 5.0 });
    }

    #[test]
    fn test_label_inside_another_lines_qualifier_is_ignored() {
        let rule = DEFAULT_RULES.iter().find(|r| r.field == "investment.impressions").unwrap();
        let mut report = CampaignReport::default();
        assert!(!rule.apply("Frequência (impressões por pessoa): 3,60", &mut report));
        assert!(rule.apply("• Impressões: 45.000", &mut report));
        assert_eq!(report.investment.impressions, 45000.0);
    }

    #[test]
    fn test_percentages_are_clamped() {
        let mut report = CampaignReport::default();
        let rule = DEFAULT_RULES.iter().find(|r| r.field == "videoPerformance.at25").unwrap();
        assert!(rule.apply("Até 25%: 9 pessoas = (150,00%)", &mut report));
        assert_eq!(report.video_performance.at25.percentage, 100.0);
    }
}

// src/report/models.rs
use serde::{Deserialize, Serialize};

/// Name used when the document carries no campaign label.
pub const DEFAULT_CAMPAIGN_NAME: &str = "Campanha Desconhecida";

/// Sentinel for categorical settings the document does not state.
pub const NOT_AVAILABLE: &str = "N/A";

/// A metric reported both as an occurrence count and a per-occurrence cost,
/// e.g. `Visualizações do vídeo: 3200 (R$ 0,08 cada)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostPair {
    pub count: u64,
    pub cost: f64,
}

/// One video-retention milestone: viewers still watching and their share of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub total_spent: f64,
    pub reach: f64,
    pub impressions: f64,
    pub frequency: f64,
    pub cpm: f64,
}

/// `ctr` and `cpc` are copied from the document as stated, never recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clicks {
    pub total_clicks: f64,
    pub unique_clicks: f64,
    pub ctr: f64,
    pub cpc: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub video_views: CostPair,
    pub link_clicks: CostPair,
    pub reactions: u64,
    pub shares: u64,
    pub net_likes: u64,
    pub conversations: CostPair,
    pub total_engagements: CostPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub status: String,
    pub cta_type: String,
    pub age_range: String,
    pub interests: Vec<String>,
    pub job_titles: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            status: NOT_AVAILABLE.to_string(),
            cta_type: NOT_AVAILABLE.to_string(),
            age_range: NOT_AVAILABLE.to_string(),
            interests: Vec::new(),
            job_titles: Vec::new(),
        }
    }
}

/// Retention funnel. All zero for image ads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPerformance {
    pub total_views: u64,
    pub at25: Checkpoint,
    pub at50: Checkpoint,
    pub at75: Checkpoint,
    pub at_end: Checkpoint,
}

/// Structured campaign performance extracted from one report document.
///
/// Every field always holds a value: `Default` is the record produced for a
/// document with no recognized labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    pub campaign_name: String,
    pub created_at: Option<String>,
    pub video_url: Option<String>,
    pub investment: Investment,
    pub clicks: Clicks,
    pub results: Results,
    pub settings: Settings,
    pub content: String,
    pub video_performance: VideoPerformance,
}

impl Default for CampaignReport {
    fn default() -> Self {
        Self {
            campaign_name: DEFAULT_CAMPAIGN_NAME.to_string(),
            created_at: None,
            video_url: None,
            investment: Investment::default(),
            clicks: Clicks::default(),
            results: Results::default(),
            settings: Settings::default(),
            content: String::new(),
            video_performance: VideoPerformance::default(),
        }
    }
}

/// A parsed report with the upstream source's authoritative fields laid over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedReport {
    pub id: String,
    pub ad_link: Option<String>,
    pub updated_at: Option<String>,
    pub is_image: bool,
    #[serde(flatten)]
    pub report: CampaignReport,
}

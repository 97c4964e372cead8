// src/upstream/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Item identifier; the webhook sends numbers today but strings are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// One raw report as returned by the reports webhook.
/// Wire names are Portuguese; fields the overlay never reads are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamItem {
    pub id: ItemId,
    #[serde(rename = "relatorio", default)]
    pub report_text: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "status_real", default)]
    pub real_status: Option<String>,
    #[serde(rename = "data_criacao", default)]
    pub created_at: Option<String>,
    #[serde(rename = "data_atualizacao", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "link_anuncio", default)]
    pub ad_link: Option<String>,
    #[serde(rename = "nome_anuncio", default)]
    pub ad_name: Option<String>,
}

/// The webhook answers with either a list or a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Many(Vec<UpstreamItem>),
    One(Box<UpstreamItem>),
}

impl WebhookPayload {
    pub fn into_items(self) -> Vec<UpstreamItem> {
        match self {
            WebhookPayload::Many(items) => items,
            WebhookPayload::One(item) => vec![*item],
        }
    }
}

// src/upstream/mod.rs
pub mod client;
pub mod models;
pub mod overlay;

pub use client::ReportSource;
pub use models::{ItemId, UpstreamItem};
pub use overlay::{find_report_by_id, overlay, process_item};

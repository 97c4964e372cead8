// src/storage/mod.rs
//! Local cache of processed reports, kept behind a key-value store so the
//! caller decides where it lives (a directory, memory in tests).

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::report::models::ProcessedReport;
use crate::upstream::overlay::find_report_by_id;
use crate::utils::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

const REPORTS_KEY: &str = "campaignReports";
const METADATA_KEY: &str = "campaignReports_meta";

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub report_count: usize,
    pub saved_at: String,
}

pub struct ReportCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ReportCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replaces the cached report list.
    pub fn save(&self, reports: &[ProcessedReport]) -> Result<CacheMetadata, StorageError> {
        let body = serde_json::to_string_pretty(reports)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store.put(REPORTS_KEY, &body)?;

        let metadata = CacheMetadata {
            report_count: reports.len(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        };
        let meta_body = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store.put(METADATA_KEY, &meta_body)?;

        tracing::info!("Cached {} reports", reports.len());
        Ok(metadata)
    }

    /// `None` when nothing has been cached yet.
    pub fn load(&self) -> Result<Option<Vec<ProcessedReport>>, StorageError> {
        match self.store.get(REPORTS_KEY)? {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn metadata(&self) -> Result<Option<CacheMetadata>, StorageError> {
        match self.store.get(METADATA_KEY)? {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn find(&self, id: &str) -> Result<Option<ProcessedReport>, StorageError> {
        Ok(self
            .load()?
            .and_then(|reports| find_report_by_id(&reports, id).cloned()))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(REPORTS_KEY)?;
        self.store.remove(METADATA_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::CampaignReport;

    fn report(id: &str, name: &str) -> ProcessedReport {
        ProcessedReport {
            id: id.to_string(),
            ad_link: None,
            updated_at: Some("2024-12-13".to_string()),
            is_image: false,
            report: CampaignReport {
                campaign_name: name.to_string(),
                ..CampaignReport::default()
            },
        }
    }

    #[test]
    fn test_empty_cache_loads_none() {
        let cache = ReportCache::new(MemoryStore::new());
        assert!(cache.load().unwrap().is_none());
        assert!(cache.metadata().unwrap().is_none());
        assert!(cache.find("1").unwrap().is_none());
    }

    #[test]
    fn test_save_then_find() {
        let cache = ReportCache::new(MemoryStore::new());
        let reports = vec![report("1", "Black Friday"), report("2", "Natal")];
        let meta = cache.save(&reports).unwrap();
        assert_eq!(meta.report_count, 2);

        assert_eq!(cache.load().unwrap(), Some(reports));
        assert_eq!(cache.find("2").unwrap().unwrap().report.campaign_name, "Natal");
        assert!(cache.find("3").unwrap().is_none());
        assert_eq!(cache.metadata().unwrap(), Some(meta));
    }

    #[test]
    fn test_save_replaces_previous_list() {
        let cache = ReportCache::new(MemoryStore::new());
        cache.save(&[report("1", "A")]).unwrap();
        cache.save(&[report("2", "B")]).unwrap();
        assert!(cache.find("1").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let store = MemoryStore::new();
        store.put(REPORTS_KEY, "not json").unwrap();
        let cache = ReportCache::new(store);
        assert!(matches!(cache.load(), Err(StorageError::SerializationError(_))));
    }

    #[test]
    fn test_clear() {
        let cache = ReportCache::new(MemoryStore::new());
        cache.save(&[report("1", "A")]).unwrap();
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }
}

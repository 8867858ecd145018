//! Implements RecordCachePort with one JSON file per year.
//!
//! File name: `{cache_dir}/ipeds_institutions_{STATE}_{year}.json`, holding the raw
//! (unenriched) directory rows as a pretty-printed JSON array.

use super::atomic::write_atomic;
use crate::domain::{DomainError, InstitutionRecord};
use crate::ports::RecordCachePort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct JsonRecordCache {
    cache_dir: PathBuf,
    state_abbrev: String,
}

impl JsonRecordCache {
    pub fn new(cache_dir: impl AsRef<Path>, state_abbrev: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            state_abbrev: state_abbrev.into(),
        }
    }

    pub fn path_for(&self, year: i32) -> PathBuf {
        self.cache_dir
            .join(format!("ipeds_institutions_{}_{}.json", self.state_abbrev, year))
    }
}

#[async_trait::async_trait]
impl RecordCachePort for JsonRecordCache {
    async fn load(&self, year: i32) -> Result<Option<Vec<InstitutionRecord>>, DomainError> {
        let path = self.path_for(year);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Cache(format!("read {}: {}", path.display(), e))),
        };
        let records: Vec<InstitutionRecord> = serde_json::from_str(&text)
            .map_err(|e| DomainError::Cache(format!("parse {}: {}", path.display(), e)))?;
        info!(path = %path.display(), year, count = records.len(), "loaded cached institutions");
        Ok(Some(records))
    }

    async fn store(&self, year: i32, records: &[InstitutionRecord]) -> Result<(), DomainError> {
        let path = self.path_for(year);
        let json =
            serde_json::to_vec_pretty(records).map_err(|e| DomainError::Cache(e.to_string()))?;
        write_atomic(&path, &json)
            .await
            .map_err(|e| DomainError::Cache(format!("write {}: {}", path.display(), e)))?;
        info!(path = %path.display(), year, count = records.len(), "cached institutions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonRecordCache::new(dir.path(), "FL");
        assert!(cache.load(2022).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonRecordCache::new(dir.path().join("nested"), "FL");
        let records: Vec<InstitutionRecord> =
            serde_json::from_value(json!([{"unitid": 123, "inst_name": "Test University"}]))
                .unwrap();

        cache.store(2023, &records).await.unwrap();

        assert!(
            cache
                .path_for(2023)
                .ends_with("ipeds_institutions_FL_2023.json")
        );
        assert_eq!(cache.load(2023).await.unwrap(), Some(records));
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonRecordCache::new(dir.path(), "FL");
        std::fs::write(cache.path_for(2020), "not json").unwrap();
        assert!(matches!(cache.load(2020).await, Err(DomainError::Cache(_))));
    }
}

//! Implements YearCachePort: a plain-text file holding the latest year with data.

use super::atomic::write_atomic;
use crate::domain::DomainError;
use crate::ports::YearCachePort;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const LATEST_YEAR_FILE: &str = "ipeds_latest_year.txt";

pub struct FileYearCache {
    path: PathBuf,
}

impl FileYearCache {
    /// Marker at `{cache_dir}/ipeds_latest_year.txt`.
    pub fn in_dir(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(LATEST_YEAR_FILE),
        }
    }
}

#[async_trait::async_trait]
impl YearCachePort for FileYearCache {
    async fn read_latest_year(&self) -> Result<Option<i32>, DomainError> {
        // Missing or garbled markers are treated as absent.
        Ok(fs::read_to_string(&self.path)
            .await
            .ok()
            .and_then(|s| s.trim().parse().ok()))
    }

    async fn write_latest_year(&self, year: i32) -> Result<(), DomainError> {
        write_atomic(&self.path, year.to_string().as_bytes())
            .await
            .map_err(|e| DomainError::Cache(format!("write {}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileYearCache::in_dir(dir.path());

        assert_eq!(cache.read_latest_year().await.unwrap(), None);
        cache.write_latest_year(2022).await.unwrap();
        assert_eq!(cache.read_latest_year().await.unwrap(), Some(2022));
    }

    #[tokio::test]
    async fn test_garbage_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LATEST_YEAR_FILE), "twenty").unwrap();
        let cache = FileYearCache::in_dir(dir.path());
        assert_eq!(cache.read_latest_year().await.unwrap(), None);
    }
}

//! Latest-available-year resolution for the IPEDS directory.
//!
//! Walks backward from a start year until a year returns data. The answer is
//! remembered in a marker so repeat runs skip the probing.

use crate::domain::DomainError;
use crate::ports::{InstitutionSource, YearCachePort};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_START_YEAR: i32 = 2024;
pub const DEFAULT_BACKFILL_YEARS: i32 = 5;

pub struct YearResolver {
    source: Arc<dyn InstitutionSource>,
    cache: Arc<dyn YearCachePort>,
    /// How many years before `start` to try.
    backfill: i32,
}

impl YearResolver {
    pub fn new(source: Arc<dyn InstitutionSource>, cache: Arc<dyn YearCachePort>) -> Self {
        Self {
            source,
            cache,
            backfill: DEFAULT_BACKFILL_YEARS,
        }
    }

    pub fn with_backfill(mut self, backfill: i32) -> Self {
        self.backfill = backfill.max(0);
        self
    }

    /// Latest year in `[start - backfill, start]` with non-empty data.
    ///
    /// A cached marker inside that window is trusted without fetching. Fetch
    /// errors count as "not available". When nothing is found, `start` is
    /// returned and the marker is left alone.
    pub async fn resolve_latest_year(&self, start: i32) -> Result<i32, DomainError> {
        let window = start.saturating_sub(self.backfill)..=start;

        if let Some(cached) = self.cached_latest_year().await {
            if window.contains(&cached) {
                info!(year = cached, "using cached latest year");
                return Ok(cached);
            }
        }

        for year in window.rev() {
            info!(year, "checking year for data availability");
            match self.source.fetch_institutions(year, true).await {
                Ok(records) if !records.is_empty() => {
                    info!(year, count = records.len(), "found institutions");
                    self.cache.write_latest_year(year).await?;
                    return Ok(year);
                }
                Ok(_) => info!(year, "no institutions for year"),
                Err(e) => warn!(year, error = %e, "year not available"),
            }
        }

        warn!(year = start, "no data found; falling back to start year");
        Ok(start)
    }

    /// Marker value, without any fetching. Unreadable markers are absent.
    pub async fn cached_latest_year(&self) -> Option<i32> {
        self.cache.read_latest_year().await.ok().flatten()
    }
}

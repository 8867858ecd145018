//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, InstitutionRecord, PopulationRecord};
use std::collections::BTreeMap;

/// Raw HTTP response as seen by the retry logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// `Retry-After` header, verbatim.
    pub retry_after: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP GET transport. Network-level failures map to `DomainError::Http`;
/// any received response (including 4xx/5xx) is returned as `Ok`.
#[async_trait::async_trait]
pub trait HttpPort: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, DomainError>;
}

/// Institution directory for one state.
#[async_trait::async_trait]
pub trait InstitutionSource: Send + Sync {
    /// All institution records for `year`. With `use_cache`, a cached snapshot is
    /// returned as-is and fresh non-empty results are written back.
    async fn fetch_institutions(
        &self,
        year: i32,
        use_cache: bool,
    ) -> Result<Vec<InstitutionRecord>, DomainError>;
}

/// MSA population, keyed by Census MSA code.
#[async_trait::async_trait]
pub trait PopulationSource: Send + Sync {
    async fn fetch_msa_population(&self) -> Result<BTreeMap<String, PopulationRecord>, DomainError>;
}

/// Per-year snapshot cache of raw institution records.
#[async_trait::async_trait]
pub trait RecordCachePort: Send + Sync {
    /// `None` when no snapshot exists for `year`.
    async fn load(&self, year: i32) -> Result<Option<Vec<InstitutionRecord>>, DomainError>;

    async fn store(&self, year: i32, records: &[InstitutionRecord]) -> Result<(), DomainError>;
}

/// Marker for the latest year known to have data.
#[async_trait::async_trait]
pub trait YearCachePort: Send + Sync {
    /// `None` when missing or unreadable.
    async fn read_latest_year(&self) -> Result<Option<i32>, DomainError>;

    async fn write_latest_year(&self, year: i32) -> Result<(), DomainError>;
}

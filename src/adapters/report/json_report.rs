//! JSON output: sorted-key count dumps and the density report envelope.

use super::write_output;
use crate::domain::{DensityRecord, DomainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DENSITY_METRIC: &str = "institutions_per_100k";
pub const DENSITY_DESCRIPTION: &str = "Higher education institutions per 100,000 population";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source: String,
    /// `YYYY-MM-DD`.
    pub generated: String,
    pub metric: String,
    pub description: String,
    pub total_msas: usize,
    pub total_institutions: u64,
    pub total_population: u64,
}

/// Envelope written by the `density` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityReport {
    pub metadata: ReportMetadata,
    pub msas: Vec<DensityRecord>,
}

impl DensityReport {
    pub fn new(msas: Vec<DensityRecord>, source: impl Into<String>, generated: NaiveDate) -> Self {
        let metadata = ReportMetadata {
            source: source.into(),
            generated: generated.format("%Y-%m-%d").to_string(),
            metric: DENSITY_METRIC.to_string(),
            description: DENSITY_DESCRIPTION.to_string(),
            total_msas: msas.len(),
            total_institutions: msas.iter().map(|r| r.institution_count).sum(),
            total_population: msas.iter().map(|r| r.population).sum(),
        };
        Self { metadata, msas }
    }
}

/// Serialize compactly, or with 2-space indentation when `pretty`.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, DomainError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| DomainError::Report(format!("serialize JSON: {}", e)))
}

pub async fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), DomainError> {
    write_output(path, to_json(value, pretty)?.as_bytes()).await
}

//! Reads a full-aggregation JSON file written by `dump --by full`.

use crate::domain::{AggregationResult, DomainError};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Default input for the `density` command, relative to the working directory.
pub const DEFAULT_INSTITUTIONS_PATH: &str = "florida-counties/public/data/institutions_fl.json";

/// Missing keys default to empty, so a file carrying only `msa_counts` loads.
pub async fn load_aggregation(path: &Path) -> Result<AggregationResult, DomainError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Parse(format!("read {}: {}", path.display(), e)))?;
    let result: AggregationResult = serde_json::from_str(&text)
        .map_err(|e| DomainError::Parse(format!("parse {}: {}", path.display(), e)))?;
    info!(
        path = %path.display(),
        msas = result.msa_counts.len(),
        "loaded institution counts"
    );
    Ok(result)
}

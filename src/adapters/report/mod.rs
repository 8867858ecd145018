//! Report writers: JSON (count dumps, density envelope) and CSV.

pub mod csv_export;
pub mod json_report;

pub use csv_export::{density_to_csv, write_csv};
pub use json_report::{DensityReport, ReportMetadata, to_json, write_json};

use crate::domain::DomainError;
use std::path::Path;
use tokio::fs;

/// Write an output file, creating parent directories as needed.
async fn write_output(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Report(format!("create {}: {}", parent.display(), e)))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|e| DomainError::Report(format!("write {}: {}", path.display(), e)))
}

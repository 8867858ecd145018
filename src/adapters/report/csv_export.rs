//! CSV export of density records. Uses the `csv` crate for quoting.

use super::write_output;
use crate::domain::{DensityRecord, DomainError};
use std::path::Path;

/// Density records as CSV with a header row; field names match the JSON output.
pub fn density_to_csv(records: &[DensityRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    // serialize() derives the header from DensityRecord's field names
    for record in records {
        wtr.serialize(record)?;
    }
    if records.is_empty() {
        wtr.write_record([
            "msa_code",
            "msa_name",
            "census_name",
            "institution_count",
            "population",
            "competition_density",
            "institutions_per_100k",
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

pub async fn write_csv(path: &Path, records: &[DensityRecord]) -> Result<(), DomainError> {
    let text = density_to_csv(records)
        .map_err(|e| DomainError::Report(format!("generate CSV: {}", e)))?;
    write_output(path, text.as_bytes()).await
}

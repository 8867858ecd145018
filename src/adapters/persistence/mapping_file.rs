//! Loads the static `county-to-msa.json` reference document.

use crate::domain::{DomainError, MsaMappingDocument};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Default location, relative to the working directory.
pub const DEFAULT_MAPPING_PATH: &str = "florida-counties/public/data/county-to-msa.json";

pub async fn load_mapping(path: &Path) -> Result<MsaMappingDocument, DomainError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Mapping(format!("read {}: {}", path.display(), e)))?;
    let doc: MsaMappingDocument = serde_json::from_str(&text)
        .map_err(|e| DomainError::Mapping(format!("parse {}: {}", path.display(), e)))?;
    info!(
        path = %path.display(),
        counties = doc.county_to_msa.len(),
        non_msa = doc.non_msa_counties.len(),
        "loaded county→MSA mapping"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("county-to-msa.json");
        std::fs::write(
            &path,
            r#"{"countyToMsa": {"12086": {"msaCode": "33100", "msaName": "Miami"}}, "nonMsaCounties": ["12001"]}"#,
        )
        .unwrap();

        let doc = load_mapping(&path).await.unwrap();
        assert_eq!(doc.county_to_msa.len(), 1);
        assert_eq!(doc.non_msa_counties, vec!["12001"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_mapping_error() {
        let err = load_mapping(Path::new("/nonexistent/county-to-msa.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Mapping(_)));
    }
}

//! Census ACS 5-year population by MSA. Implements PopulationSource.
//!
//! The API answers with a JSON table: an array of string rows whose first row
//! is the header. Only areas whose NAME mentions the configured state
//! (", FL") and whose population is positive are kept.

use crate::adapters::http::{RetryPolicy, get_with_retry};
use crate::domain::{DomainError, PopulationRecord};
use crate::ports::{HttpPort, PopulationSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const ACS_BASE_URL: &str = "https://api.census.gov/data";
/// Total population.
pub const POP_FIELD: &str = "B01003_001E";
pub const MSA_GEOGRAPHY: &str = "metropolitan statistical area/micropolitan statistical area";

pub struct AcsPopulationAdapter {
    http: Arc<dyn HttpPort>,
    base_url: String,
    acs_year: i32,
    state_abbrev: String,
    retry: RetryPolicy,
}

impl AcsPopulationAdapter {
    /// 2022 ACS 5-year, Florida.
    pub fn new(http: Arc<dyn HttpPort>) -> Self {
        Self {
            http,
            base_url: ACS_BASE_URL.to_string(),
            acs_year: 2022,
            state_abbrev: "FL".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_acs_year(mut self, acs_year: i32) -> Self {
        self.acs_year = acs_year;
        self
    }

    pub fn with_state_abbrev(mut self, state_abbrev: impl Into<String>) -> Self {
        self.state_abbrev = state_abbrev.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Request URL with the geography already percent-encoded the way the API expects.
    pub fn request_url(&self) -> String {
        format!(
            "{}/{}/acs/acs5?get=NAME,{}&for={}:*",
            self.base_url.trim_end_matches('/'),
            self.acs_year,
            POP_FIELD,
            MSA_GEOGRAPHY.replace(' ', "%20")
        )
    }
}

/// Parse an ACS table into `census code → PopulationRecord` for one state.
pub fn parse_acs_table(
    body: &str,
    state_abbrev: &str,
) -> Result<BTreeMap<String, PopulationRecord>, DomainError> {
    let rows: Vec<Vec<Option<String>>> =
        serde_json::from_str(body).map_err(|e| DomainError::Parse(format!("ACS table: {}", e)))?;
    let (header, rows) = rows
        .split_first()
        .ok_or_else(|| DomainError::Parse("ACS table is empty".to_string()))?;

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.as_deref() == Some(name))
            .ok_or_else(|| DomainError::Parse(format!("ACS table has no '{}' column", name)))
    };
    let name_col = column("NAME")?;
    let pop_col = column(POP_FIELD)?;
    let code_col = column(MSA_GEOGRAPHY)?;

    let state_marker = format!(", {}", state_abbrev);
    fn cell(row: &[Option<String>], idx: usize) -> Option<String> {
        row.get(idx).cloned().flatten()
    }

    let mut out = BTreeMap::new();
    for row in rows {
        let Some(code) = cell(row, code_col).filter(|c| !c.is_empty()) else {
            continue;
        };
        let name = cell(row, name_col).unwrap_or_default();
        let population = cell(row, pop_col)
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(0);
        if population <= 0 || !name.contains(&state_marker) {
            continue;
        }
        out.insert(
            code.clone(),
            PopulationRecord {
                msa_code: code,
                census_name: name,
                population: population as u64,
            },
        );
    }

    debug!(rows = rows.len(), kept = out.len(), "parsed ACS table");
    Ok(out)
}

#[async_trait::async_trait]
impl PopulationSource for AcsPopulationAdapter {
    async fn fetch_msa_population(&self) -> Result<BTreeMap<String, PopulationRecord>, DomainError> {
        let url = self.request_url();
        info!(acs_year = self.acs_year, "fetching MSA population from Census ACS");
        let response = get_with_retry(self.http.as_ref(), &url, &[], &self.retry).await?;
        let population = parse_acs_table(&response.body, &self.state_abbrev)?;
        info!(
            state = %self.state_abbrev,
            msas = population.len(),
            "fetched MSA population"
        );
        Ok(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::ScriptedHttp;
    use serde_json::json;

    fn table() -> serde_json::Value {
        json!([
            ["NAME", "B01003_001E", "metropolitan statistical area/micropolitan statistical area"],
            ["Gainesville, FL Metro Area", "344178", "23540"],
            ["Jacksonville, FL Metro Area", "1605848", "27260"],
            ["Atlanta-Sandy Springs-Alpharetta, GA Metro Area", "6087762", "12060"],
            ["Ghost Town, FL Micro Area", "0", "99990"],
            ["Broken, FL Metro Area", null, "99991"],
            ["No Code, FL Metro Area", "1000", null]
        ])
    }

    #[test]
    fn test_parse_filters_state_and_population() {
        let pop = parse_acs_table(&table().to_string(), "FL").unwrap();

        assert_eq!(pop.len(), 2);
        assert_eq!(pop["23540"].population, 344_178);
        assert_eq!(pop["27260"].census_name, "Jacksonville, FL Metro Area");
        assert!(!pop.contains_key("12060"));
        assert!(!pop.contains_key("99990"));
    }

    #[test]
    fn test_parse_rejects_bad_tables() {
        assert!(matches!(parse_acs_table("[]", "FL"), Err(DomainError::Parse(_))));
        assert!(matches!(
            parse_acs_table(r#"[["NAME", "B01003_001E"]]"#, "FL"),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(parse_acs_table("{}", "FL"), Err(DomainError::Parse(_))));
    }

    #[test]
    fn test_request_url() {
        let acs = AcsPopulationAdapter::new(Arc::new(ScriptedHttp::new()));
        assert_eq!(
            acs.request_url(),
            "https://api.census.gov/data/2022/acs/acs5?get=NAME,B01003_001E&for=metropolitan%20statistical%20area/micropolitan%20statistical%20area:*"
        );
    }

    #[tokio::test]
    async fn test_fetch_msa_population() {
        let http = Arc::new(ScriptedHttp::new().respond(500, "").respond_json(&table()));
        let acs = AcsPopulationAdapter::new(Arc::clone(&http) as Arc<dyn HttpPort>)
            .with_retry(RetryPolicy::immediate(3));

        let pop = acs.fetch_msa_population().await.unwrap();

        assert_eq!(pop.len(), 2);
        assert_eq!(http.call_count(), 2);
    }
}

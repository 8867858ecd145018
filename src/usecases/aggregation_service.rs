//! Institution counts use case: fetch a year's directory, enrich, count.

use crate::domain::aggregate::{self, FILTERED_NOTE};
use crate::domain::{AggregationResult, CountyTable, DomainError, InstitutionRecord, RecordEnricher};
use crate::ports::InstitutionSource;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// What to count by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLevel {
    /// County FIPS.
    County,
    /// Raw `county_name` as reported.
    CountyName,
    Msa,
    /// County and MSA counts plus total and year.
    Full,
}

/// Counts for one level. Serializes as the bare map, or the full object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Counts {
    Flat(BTreeMap<String, u64>),
    Full(AggregationResult),
}

impl Counts {
    /// Top-level entries in the serialized output.
    pub fn entry_count(&self) -> usize {
        match self {
            Counts::Flat(map) => map.len(),
            // county_counts, msa_counts, total, year, optional note
            Counts::Full(result) => 4 + usize::from(result.note.is_some()),
        }
    }
}

pub struct InstitutionCountService {
    source: Arc<dyn InstitutionSource>,
    counties: CountyTable,
}

impl InstitutionCountService {
    pub fn new(source: Arc<dyn InstitutionSource>) -> Self {
        Self::with_counties(source, CountyTable::florida())
    }

    pub fn with_counties(source: Arc<dyn InstitutionSource>, counties: CountyTable) -> Self {
        Self { source, counties }
    }

    /// Cached-or-fetched records for `year`, optionally restricted to
    /// degree-granting institutions, with `fips_derived` filled in.
    pub async fn load_records(
        &self,
        year: i32,
        filtered: bool,
    ) -> Result<Vec<InstitutionRecord>, DomainError> {
        let mut records = self.source.fetch_institutions(year, true).await?;
        if filtered {
            let before = records.len();
            records = aggregate::filter_degree_granting(&records);
            info!(
                before,
                after = records.len(),
                excluded = before - records.len(),
                "filtered out less-than-2-year trade/beauty schools"
            );
        }
        Ok(RecordEnricher::new(&self.counties).enrich(&records))
    }

    /// Counts at `level`. A filtered full aggregation carries the requested
    /// year and a note saying what was excluded.
    pub async fn counts(
        &self,
        level: CountLevel,
        year: i32,
        fips_to_msa: &BTreeMap<String, String>,
        filtered: bool,
    ) -> Result<Counts, DomainError> {
        let records = self.load_records(year, filtered).await?;
        let counts = match level {
            CountLevel::County => Counts::Flat(aggregate::count_by_fips(&records)),
            CountLevel::CountyName => Counts::Flat(aggregate::count_by_county(&records)),
            CountLevel::Msa => Counts::Flat(aggregate::count_by_msa(&records, fips_to_msa)),
            CountLevel::Full => {
                let mut result = aggregate::aggregate_with_details(&records, fips_to_msa);
                if filtered {
                    result.year = Some(year);
                    result.note = Some(FILTERED_NOTE.to_string());
                }
                Counts::Full(result)
            }
        };
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSource(Vec<InstitutionRecord>);

    #[async_trait::async_trait]
    impl InstitutionSource for StaticSource {
        async fn fetch_institutions(
            &self,
            _year: i32,
            _use_cache: bool,
        ) -> Result<Vec<InstitutionRecord>, DomainError> {
            Ok(self.0.clone())
        }
    }

    fn service() -> InstitutionCountService {
        let records: Vec<InstitutionRecord> = serde_json::from_value(json!([
            {"unitid": 1, "county_name": "Miami-Dade County", "sector": 1, "year": 2020},
            {"unitid": 2, "county_fips": 12086, "county_name": "Miami-Dade County", "sector": 9, "year": 2020},
            {"unitid": 3, "fips": "12011", "county_name": "Broward County", "sector": 2, "year": 2020},
            {"unitid": 4, "county_name": "Liberty", "sector": 4, "year": 2020},
            {"unitid": 5, "inst_name": "Nowhere", "sector": 8, "year": 2020}
        ]))
        .unwrap();
        InstitutionCountService::new(Arc::new(StaticSource(records)))
    }

    fn fips_to_msa() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("12086".to_string(), "Miami".to_string()),
            ("12011".to_string(), "Miami".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_county_counts_use_enriched_fips() {
        let counts = service()
            .counts(CountLevel::County, 2020, &fips_to_msa(), false)
            .await
            .unwrap();

        let expected = BTreeMap::from([
            ("12011".to_string(), 1),
            ("12077".to_string(), 1),
            ("12086".to_string(), 2),
        ]);
        assert_eq!(counts, Counts::Flat(expected));
    }

    #[tokio::test]
    async fn test_county_name_counts() {
        let counts = service()
            .counts(CountLevel::CountyName, 2020, &fips_to_msa(), false)
            .await
            .unwrap();

        let Counts::Flat(map) = counts else {
            panic!("expected flat counts");
        };
        assert_eq!(map["Miami-Dade County"], 2);
        assert_eq!(map["Liberty"], 1);
    }

    #[tokio::test]
    async fn test_msa_counts() {
        let counts = service()
            .counts(CountLevel::Msa, 2020, &fips_to_msa(), false)
            .await
            .unwrap();

        assert_eq!(
            counts,
            Counts::Flat(BTreeMap::from([("Miami".to_string(), 3)]))
        );
    }

    #[tokio::test]
    async fn test_full_unfiltered() {
        let counts = service()
            .counts(CountLevel::Full, 2021, &fips_to_msa(), false)
            .await
            .unwrap();

        let Counts::Full(result) = counts else {
            panic!("expected full aggregation");
        };
        assert_eq!(result.total, 5);
        // year comes from the data
        assert_eq!(result.year, Some(2020));
        assert_eq!(result.note, None);
        assert_eq!(result.msa_counts["Miami"], 3);
    }

    #[tokio::test]
    async fn test_full_filtered() {
        let counts = service()
            .counts(CountLevel::Full, 2021, &fips_to_msa(), true)
            .await
            .unwrap();

        assert_eq!(counts.entry_count(), 5);
        let Counts::Full(result) = counts else {
            panic!("expected full aggregation");
        };
        assert_eq!(result.total, 3);
        assert_eq!(result.year, Some(2021));
        assert_eq!(result.note.as_deref(), Some(FILTERED_NOTE));
        assert_eq!(result.msa_counts["Miami"], 2);
    }

    #[test]
    fn test_flat_serializes_as_bare_map() {
        let counts = Counts::Flat(BTreeMap::from([("Ocala".to_string(), 4)]));
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"Ocala":4}"#);
        assert_eq!(counts.entry_count(), 1);
    }
}

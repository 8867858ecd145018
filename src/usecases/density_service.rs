//! Competition density use case: join MSA institution counts with Census
//! population and rank MSAs by institutions per 100k residents.

use crate::domain::density::{self, FLORIDA_EXPECTED_POPULATION};
use crate::domain::msa;
use crate::domain::{
    DensityCalculator, DensityDiagnostics, DensityRecord, DomainError, MsaMappingDocument,
};
use crate::ports::PopulationSource;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::info;

/// Ranked records plus the sanity figures computed over them.
#[derive(Debug, Clone)]
pub struct DensityOutcome {
    pub records: Vec<DensityRecord>,
    pub diagnostics: DensityDiagnostics,
}

pub struct DensityService {
    population: Arc<dyn PopulationSource>,
    calculator: DensityCalculator,
    expected_population: Option<RangeInclusive<u64>>,
}

impl DensityService {
    pub fn new(population: Arc<dyn PopulationSource>) -> Self {
        Self {
            population,
            calculator: DensityCalculator::new(),
            expected_population: Some(FLORIDA_EXPECTED_POPULATION),
        }
    }

    pub fn with_calculator(mut self, calculator: DensityCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// `None` disables the range check.
    pub fn with_expected_population(mut self, range: Option<RangeInclusive<u64>>) -> Self {
        self.expected_population = range;
        self
    }

    /// MSA name → code from the mapping document. With `strict`, a name seen
    /// with two codes is an error; otherwise the last code wins.
    pub fn msa_codes(
        mapping: &MsaMappingDocument,
        strict: bool,
    ) -> Result<BTreeMap<String, String>, DomainError> {
        let codes = if strict {
            msa::msa_name_to_code_strict(mapping)?
        } else {
            msa::msa_name_to_code(mapping)
        };
        info!(msas = codes.len(), strict, "loaded MSA codes");
        Ok(codes)
    }

    pub async fn compute(
        &self,
        institution_counts: &BTreeMap<String, u64>,
        msa_codes: &BTreeMap<String, String>,
    ) -> Result<DensityOutcome, DomainError> {
        let population = self.population.fetch_msa_population().await?;
        info!(msas = institution_counts.len(), "computing competition density");
        let records = self
            .calculator
            .compute(institution_counts, &population, msa_codes);
        let diagnostics = density::validate(&records, self.expected_population.clone());
        Ok(DensityOutcome {
            records,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PopulationRecord;
    use serde_json::json;

    struct FixedPopulation(Result<Vec<(&'static str, &'static str, u64)>, &'static str>);

    #[async_trait::async_trait]
    impl PopulationSource for FixedPopulation {
        async fn fetch_msa_population(
            &self,
        ) -> Result<BTreeMap<String, PopulationRecord>, DomainError> {
            match &self.0 {
                Ok(rows) => Ok(rows
                    .iter()
                    .map(|(code, name, population)| {
                        (
                            code.to_string(),
                            PopulationRecord {
                                msa_code: code.to_string(),
                                census_name: name.to_string(),
                                population: *population,
                            },
                        )
                    })
                    .collect()),
                Err(msg) => Err(DomainError::Http(msg.to_string())),
            }
        }
    }

    fn mapping() -> MsaMappingDocument {
        serde_json::from_value(json!({
            "countyToMsa": {
                "12001": {"msaCode": "23540", "msaName": "Gainesville"},
                "12031": {"msaCode": "27740", "msaName": "Jacksonville"},
                "12089": {"msaCode": "27740", "msaName": "Jacksonville"},
                "12083": {"msaCode": "37300", "msaName": "Ocala"}
            }
        }))
        .unwrap()
    }

    fn counts() -> BTreeMap<String, u64> {
        BTreeMap::from([
            ("Gainesville".to_string(), 10),
            ("Jacksonville".to_string(), 32),
            ("Ocala".to_string(), 4),
        ])
    }

    #[tokio::test]
    async fn test_compute_joins_translates_and_ranks() {
        let service = DensityService::new(Arc::new(FixedPopulation(Ok(vec![
            ("23540", "Gainesville, FL Metro Area", 50_000),
            ("27260", "Jacksonville, FL Metro Area", 1_600_000),
        ]))))
        .with_expected_population(None);
        let codes = DensityService::msa_codes(&mapping(), true).unwrap();

        let outcome = service.compute(&counts(), &codes).await.unwrap();

        // Ocala's Census code (36100) has no population row
        let names: Vec<_> = outcome.records.iter().map(|r| r.msa_name.as_str()).collect();
        assert_eq!(names, vec!["Gainesville", "Jacksonville"]);
        assert_eq!(outcome.records[0].institutions_per_100k, 20.0);
        assert_eq!(outcome.records[1].msa_code, "27740");
        assert_eq!(outcome.diagnostics.msa_count, 2);
        assert_eq!(outcome.diagnostics.total_population, 1_650_000);
        assert_eq!(outcome.diagnostics.population_in_expected_range, None);
    }

    #[tokio::test]
    async fn test_expected_range_flag() {
        let service = DensityService::new(Arc::new(FixedPopulation(Ok(vec![(
            "23540",
            "Gainesville, FL Metro Area",
            50_000,
        )]))));
        let codes = DensityService::msa_codes(&mapping(), false).unwrap();

        let outcome = service.compute(&counts(), &codes).await.unwrap();

        assert_eq!(outcome.diagnostics.population_in_expected_range, Some(false));
    }

    #[tokio::test]
    async fn test_population_failure_propagates() {
        let service = DensityService::new(Arc::new(FixedPopulation(Err("timeout"))));
        let err = service
            .compute(&counts(), &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Http(_)));
    }

    #[test]
    fn test_strict_codes_reject_conflicts() {
        let doc: MsaMappingDocument = serde_json::from_value(json!({
            "countyToMsa": {
                "12001": {"msaCode": "1", "msaName": "Split"},
                "12003": {"msaCode": "2", "msaName": "Split"}
            }
        }))
        .unwrap();

        assert!(matches!(
            DensityService::msa_codes(&doc, true),
            Err(DomainError::MsaCodeConflict { .. })
        ));
        assert_eq!(DensityService::msa_codes(&doc, false).unwrap()["Split"], "2");
    }
}

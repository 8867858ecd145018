//! Competition density: institutions per capita for each MSA.
//!
//! Institution counts are keyed by MSA name, population by Census MSA code. The
//! join goes name → local MSA code (from the county mapping) → Census code
//! (through the translation table) → population. A miss at any step drops that
//! MSA with a warning.
//!
//! `institutions_per_100k` is rounded to 2 decimals, half away from zero, on the
//! binary value (`(x * 100).round() / 100`).

use crate::domain::entities::{DensityRecord, PopulationRecord};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::{info, warn};

/// Local MSA codes that the Census ACS publishes under a different code.
pub const MSA_CODE_TRANSLATION: &[(&str, &str)] = &[
    ("30460", "26140"), // Homosassa Springs
    ("27740", "27260"), // Jacksonville
    ("37300", "36100"), // Ocala
    ("48680", "45540"), // The Villages
];

/// Expected total MSA population for Florida (2022 ACS).
pub const FLORIDA_EXPECTED_POPULATION: RangeInclusive<u64> = 18_000_000..=23_000_000;

pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Joins MSA institution counts with population.
#[derive(Debug, Clone)]
pub struct DensityCalculator {
    translation: BTreeMap<String, String>,
}

impl Default for DensityCalculator {
    fn default() -> Self {
        Self::with_translation(MSA_CODE_TRANSLATION.iter().copied())
    }
}

impl DensityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator with a custom `local code → Census code` override table.
    pub fn with_translation<I, L, C>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (L, C)>,
        L: Into<String>,
        C: Into<String>,
    {
        Self {
            translation: overrides
                .into_iter()
                .map(|(l, c)| (l.into(), c.into()))
                .collect(),
        }
    }

    /// Census code for a local MSA code; unlisted codes pass through.
    pub fn census_code<'a>(&'a self, local: &'a str) -> &'a str {
        self.translation
            .get(local)
            .map(String::as_str)
            .unwrap_or(local)
    }

    /// One record per MSA that survives the join, sorted by
    /// `institutions_per_100k` descending. The sort is stable and inputs are
    /// visited in MSA-name order, so ties stay in name order.
    pub fn compute(
        &self,
        institution_counts: &BTreeMap<String, u64>,
        msa_population: &BTreeMap<String, PopulationRecord>,
        msa_name_to_code: &BTreeMap<String, String>,
    ) -> Vec<DensityRecord> {
        let mut results = Vec::with_capacity(institution_counts.len());

        for (msa_name, &count) in institution_counts {
            let Some(msa_code) = msa_name_to_code.get(msa_name) else {
                warn!(msa = %msa_name, "no MSA code found; skipping");
                continue;
            };

            let census_code = self.census_code(msa_code);
            let Some(pop) = msa_population.get(census_code) else {
                warn!(
                    msa = %msa_name,
                    code = %msa_code,
                    census_code,
                    "no population data; skipping"
                );
                continue;
            };

            let competition_density = if pop.population > 0 {
                count as f64 / pop.population as f64
            } else {
                0.0
            };

            results.push(DensityRecord {
                msa_code: msa_code.clone(),
                msa_name: msa_name.clone(),
                census_name: pop.census_name.clone(),
                institution_count: count,
                population: pop.population,
                competition_density,
                institutions_per_100k: round_2dp(competition_density * 100_000.0),
            });
        }

        results.sort_by(|a, b| b.institutions_per_100k.total_cmp(&a.institutions_per_100k));
        results
    }
}

/// Sanity figures over a density result set. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityDiagnostics {
    pub msa_count: usize,
    /// MSA names with zero population.
    pub zero_population: Vec<String>,
    pub total_population: u64,
    pub total_institutions: u64,
    pub min_per_100k: Option<f64>,
    pub max_per_100k: Option<f64>,
    /// `None` when no expected range was given.
    pub population_in_expected_range: Option<bool>,
}

/// Compute and log diagnostics. Never fails.
pub fn validate(
    records: &[DensityRecord],
    expected_population: Option<RangeInclusive<u64>>,
) -> DensityDiagnostics {
    let zero_population: Vec<String> = records
        .iter()
        .filter(|r| r.population == 0)
        .map(|r| r.msa_name.clone())
        .collect();
    let total_population: u64 = records.iter().map(|r| r.population).sum();
    let total_institutions: u64 = records.iter().map(|r| r.institution_count).sum();
    let per_100k = records.iter().map(|r| r.institutions_per_100k);
    let min_per_100k = per_100k.clone().min_by(f64::total_cmp);
    let max_per_100k = per_100k.max_by(f64::total_cmp);
    let population_in_expected_range =
        expected_population.map(|range| range.contains(&total_population));

    let diag = DensityDiagnostics {
        msa_count: records.len(),
        zero_population,
        total_population,
        total_institutions,
        min_per_100k,
        max_per_100k,
        population_in_expected_range,
    };

    if diag.zero_population.is_empty() {
        info!("all MSAs have nonzero population");
    } else {
        warn!(
            count = diag.zero_population.len(),
            msas = ?diag.zero_population,
            "MSAs with zero population"
        );
    }
    info!(total_population = diag.total_population, "total MSA population");
    match diag.population_in_expected_range {
        Some(true) => info!("total population in expected range"),
        Some(false) => warn!(
            total_population = diag.total_population,
            "total population outside expected range"
        ),
        None => {}
    }
    if let (Some(min), Some(max)) = (diag.min_per_100k, diag.max_per_100k) {
        info!("density range: {:.2} - {:.2} per 100k", min, max);
    }
    info!(msas = diag.msa_count, "computed density");

    diag
}

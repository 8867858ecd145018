//! Counting institutions by county FIPS, MSA and raw county name.
//!
//! Records without a usable county FIPS (or in a rural county with no MSA) are
//! left out of the per-key counts without complaint. Results are ordered maps,
//! so serialized output is sorted by key.

use crate::domain::entities::{AggregationResult, InstitutionRecord};
use std::collections::BTreeMap;

/// IPEDS sectors for less-than-2-year institutions (public, private nonprofit,
/// private for-profit): trade and beauty schools, mostly.
pub const LESS_THAN_TWO_YEAR_SECTORS: [i64; 3] = [7, 8, 9];

/// Note attached to aggregations computed over [`filter_degree_granting`] output.
pub const FILTERED_NOTE: &str = "Filtered to exclude less-than-2-year trade/beauty schools";

/// Count by trimmed raw `county_name`; blank names are skipped.
pub fn count_by_county(records: &[InstitutionRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for name in records
        .iter()
        .filter_map(|r| r.county_name.as_deref().map(str::trim))
        .filter(|name| !name.is_empty())
    {
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Count by county FIPS (`fips_derived`, else `fips`).
pub fn count_by_fips(records: &[InstitutionRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for fips in records.iter().filter_map(InstitutionRecord::aggregation_fips) {
        *counts.entry(fips).or_insert(0) += 1;
    }
    counts
}

/// Count by MSA name. Counties absent from `fips_to_msa` contribute nothing.
pub fn count_by_msa(
    records: &[InstitutionRecord],
    fips_to_msa: &BTreeMap<String, String>,
) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for msa in records
        .iter()
        .filter_map(InstitutionRecord::aggregation_fips)
        .filter_map(|fips| fips_to_msa.get(&fips))
        .filter(|msa| !msa.is_empty())
    {
        *counts.entry(msa.clone()).or_insert(0) += 1;
    }
    counts
}

/// County and MSA counts plus the raw total. `year` comes from the first record.
pub fn aggregate_with_details(
    records: &[InstitutionRecord],
    fips_to_msa: &BTreeMap<String, String>,
) -> AggregationResult {
    AggregationResult {
        county_counts: count_by_fips(records),
        msa_counts: count_by_msa(records, fips_to_msa),
        total: records.len(),
        year: records.first().and_then(InstitutionRecord::year),
        note: None,
    }
}

/// Keep traditional colleges and universities: drops sectors 7, 8 and 9.
/// Records with no sector are kept.
pub fn filter_degree_granting(records: &[InstitutionRecord]) -> Vec<InstitutionRecord> {
    records
        .iter()
        .filter(|r| {
            r.sector()
                .is_none_or(|sector| !LESS_THAN_TWO_YEAR_SECTORS.contains(&sector))
        })
        .cloned()
        .collect()
}

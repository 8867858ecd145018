//! Record enrichment: derive one canonical county FIPS per institution record.
//!
//! Sources are tried in order and the first one yielding a 5-digit county FIPS
//! wins. Records nothing resolves for keep `fips_derived` absent and simply drop
//! out of FIPS/MSA aggregation later.

use crate::domain::county::CountyTable;
use crate::domain::entities::{InstitutionRecord, county_fips_from_value};

/// One step of the fallback chain.
#[derive(Clone, Copy)]
pub struct FipsRule {
    /// Field name, for logs.
    pub source: &'static str,
    pub extract: fn(&InstitutionRecord, &CountyTable) -> Option<String>,
}

impl std::fmt::Debug for FipsRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FipsRule").field("source", &self.source).finish()
    }
}

fn from_county_fips(rec: &InstitutionRecord, _: &CountyTable) -> Option<String> {
    rec.county_fips.as_ref().and_then(county_fips_from_value)
}

fn from_fips(rec: &InstitutionRecord, _: &CountyTable) -> Option<String> {
    rec.fips.as_ref().and_then(county_fips_from_value)
}

fn from_county_name(rec: &InstitutionRecord, counties: &CountyTable) -> Option<String> {
    let name = rec.county_name.as_deref()?;
    counties.fips_for_name(name).map(str::to_string)
}

/// `county_fips` (most reliable), then `fips`, then the county name.
pub const DEFAULT_RULES: &[FipsRule] = &[
    FipsRule {
        source: "county_fips",
        extract: from_county_fips,
    },
    FipsRule {
        source: "fips",
        extract: from_fips,
    },
    FipsRule {
        source: "county_name",
        extract: from_county_name,
    },
];

/// Applies the FIPS fallback chain against a county table.
#[derive(Debug, Clone)]
pub struct RecordEnricher<'a> {
    counties: &'a CountyTable,
    rules: Vec<FipsRule>,
}

impl<'a> RecordEnricher<'a> {
    pub fn new(counties: &'a CountyTable) -> Self {
        Self::with_rules(counties, DEFAULT_RULES.to_vec())
    }

    pub fn with_rules(counties: &'a CountyTable, rules: Vec<FipsRule>) -> Self {
        Self { counties, rules }
    }

    /// First FIPS any rule yields for this record.
    pub fn derive(&self, record: &InstitutionRecord) -> Option<String> {
        self.rules
            .iter()
            .find_map(|rule| (rule.extract)(record, self.counties))
    }

    /// Returns fresh records (same order and length) with `fips_derived` set
    /// wherever a FIPS could be derived.
    pub fn enrich(&self, records: &[InstitutionRecord]) -> Vec<InstitutionRecord> {
        records
            .iter()
            .map(|record| InstitutionRecord {
                fips_derived: self.derive(record),
                ..record.clone()
            })
            .collect()
    }
}

//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here; adapters deserialize straight into these.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One IPEDS directory row. Location fields arrive inconsistently populated
/// (string or number, sometimes missing), so they stay as raw JSON values until
/// the enricher coerces them. Everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county_fips: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fips: Option<Value>,
    /// Canonical county FIPS set by the enricher; absent when unresolvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fips_derived: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl InstitutionRecord {
    /// Data year passthrough (`year` attribute), if numeric.
    pub fn year(&self) -> Option<i32> {
        self.attributes
            .get("year")
            .and_then(Value::as_i64)
            .and_then(|y| i32::try_from(y).ok())
    }

    /// IPEDS sector code (1-9), if numeric.
    pub fn sector(&self) -> Option<i64> {
        self.attributes.get("sector").and_then(Value::as_i64)
    }

    /// FIPS used for aggregation: `fips_derived` first, then the raw `fips` field.
    pub fn aggregation_fips(&self) -> Option<String> {
        match self.fips_derived.as_deref().map(str::trim) {
            Some(derived) if !derived.is_empty() => {
                is_county_fips(derived).then(|| derived.to_string())
            }
            _ => self.fips.as_ref().and_then(county_fips_from_value),
        }
    }
}

/// Coerce a raw JSON code field to text. Empty strings, zero, null, booleans and
/// containers count as "not populated".
pub fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

/// True for a 5-digit county FIPS (2-digit state + 3-digit county).
pub fn is_county_fips(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Coerce a JSON value and keep it only if it is a county-level FIPS.
pub fn county_fips_from_value(value: &Value) -> Option<String> {
    code_text(value).filter(|code| is_county_fips(code))
}

/// One entry of the county→MSA reference mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsaInfo {
    pub msa_code: String,
    pub msa_name: String,
}

/// The `county-to-msa.json` reference document. Values stay raw so that
/// malformed entries can be skipped individually instead of failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MsaMappingDocument {
    #[serde(rename = "countyToMsa", default)]
    pub county_to_msa: BTreeMap<String, Value>,
    #[serde(rename = "nonMsaCounties", default)]
    pub non_msa_counties: Vec<String>,
}

/// County and MSA counts for one snapshot. Maps are ordered and fields are
/// declared alphabetically, so serialized keys come out sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationResult {
    pub county_counts: BTreeMap<String, u64>,
    pub msa_counts: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Raw record count, enrichable or not.
    pub total: usize,
    pub year: Option<i32>,
}

/// MSA population from the Census ACS, keyed by the Census MSA code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub msa_code: String,
    pub census_name: String,
    pub population: u64,
}

/// Per-capita institution density for one MSA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityRecord {
    /// MSA code on the institution side (before translation to Census codes).
    pub msa_code: String,
    pub msa_name: String,
    pub census_name: String,
    pub institution_count: u64,
    pub population: u64,
    pub competition_density: f64,
    pub institutions_per_100k: f64,
}

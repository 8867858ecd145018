//! County FIPS → MSA lookups built from the static `county-to-msa.json` document.
//!
//! Counties missing from `countyToMsa` are rural (non-MSA) and are simply not in
//! the maps. Entries that are not objects, lack an `msaName`, or are keyed by
//! something other than a county FIPS are skipped.

use crate::domain::DomainError;
use crate::domain::entities::{MsaInfo, MsaMappingDocument, code_text, is_county_fips};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

fn parse_entry(fips: &str, value: &Value) -> Option<MsaInfo> {
    if !is_county_fips(fips) {
        debug!(key = fips, "skipping mapping key that is not a county FIPS");
        return None;
    }
    let obj = value.as_object()?;
    let msa_name = obj.get("msaName").and_then(Value::as_str)?.trim();
    if msa_name.is_empty() {
        return None;
    }
    let msa_code = obj.get("msaCode").and_then(code_text).unwrap_or_default();
    Some(MsaInfo {
        msa_code,
        msa_name: msa_name.to_string(),
    })
}

/// Well-formed `(fips, MsaInfo)` entries in FIPS order.
pub fn entries(doc: &MsaMappingDocument) -> impl Iterator<Item = (&str, MsaInfo)> {
    doc.county_to_msa
        .iter()
        .filter_map(|(fips, value)| parse_entry(fips, value).map(|info| (fips.as_str(), info)))
}

/// County FIPS → MSA name.
pub fn build_fips_to_msa(doc: &MsaMappingDocument) -> BTreeMap<String, String> {
    entries(doc)
        .map(|(fips, info)| (fips.to_string(), info.msa_name))
        .collect()
}

/// MSA name → MSA code, lenient.
///
/// The source data can in principle give one MSA name two codes. Entries are
/// visited in FIPS order and the last code seen wins; each conflict is logged.
pub fn msa_name_to_code(doc: &MsaMappingDocument) -> BTreeMap<String, String> {
    let mut codes: BTreeMap<String, String> = BTreeMap::new();
    for (fips, info) in entries(doc) {
        if info.msa_code.is_empty() {
            continue;
        }
        if let Some(previous) = codes.insert(info.msa_name.clone(), info.msa_code.clone()) {
            if previous != info.msa_code {
                warn!(
                    msa = %info.msa_name,
                    fips,
                    previous = %previous,
                    code = %info.msa_code,
                    "MSA name maps to more than one code; keeping the last"
                );
            }
        }
    }
    codes
}

/// MSA name → MSA code, requiring a true 1:1 relationship.
pub fn msa_name_to_code_strict(
    doc: &MsaMappingDocument,
) -> Result<BTreeMap<String, String>, DomainError> {
    let mut codes: BTreeMap<String, String> = BTreeMap::new();
    for (_, info) in entries(doc) {
        if info.msa_code.is_empty() {
            continue;
        }
        match codes.entry(info.msa_name) {
            Entry::Vacant(slot) => {
                slot.insert(info.msa_code);
            }
            Entry::Occupied(slot) if slot.get() != &info.msa_code => {
                return Err(DomainError::MsaCodeConflict {
                    msa_name: slot.key().clone(),
                    first: slot.get().clone(),
                    second: info.msa_code,
                });
            }
            Entry::Occupied(_) => {}
        }
    }
    Ok(codes)
}

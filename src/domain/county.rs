//! County identity: free-text county name normalization and name ↔ FIPS lookup.
//!
//! The table is an immutable value built once and passed to whoever needs it.

use crate::domain::DomainError;
use std::collections::{BTreeMap, HashMap};

/// Florida counties (state FIPS 12), canonical names without the "County" suffix.
pub const FLORIDA_COUNTIES: &[(&str, &str)] = &[
    ("12001", "Alachua"),
    ("12003", "Baker"),
    ("12005", "Bay"),
    ("12007", "Bradford"),
    ("12009", "Brevard"),
    ("12011", "Broward"),
    ("12013", "Calhoun"),
    ("12015", "Charlotte"),
    ("12017", "Citrus"),
    ("12019", "Clay"),
    ("12021", "Collier"),
    ("12023", "Columbia"),
    ("12027", "DeSoto"),
    ("12029", "Dixie"),
    ("12031", "Duval"),
    ("12033", "Escambia"),
    ("12035", "Flagler"),
    ("12037", "Franklin"),
    ("12039", "Gadsden"),
    ("12041", "Gilchrist"),
    ("12043", "Glades"),
    ("12045", "Gulf"),
    ("12047", "Hamilton"),
    ("12049", "Hardee"),
    ("12051", "Hendry"),
    ("12053", "Hernando"),
    ("12055", "Highlands"),
    ("12057", "Hillsborough"),
    ("12059", "Holmes"),
    ("12061", "Indian River"),
    ("12063", "Jackson"),
    ("12065", "Jefferson"),
    ("12067", "Lafayette"),
    ("12069", "Lake"),
    ("12071", "Lee"),
    ("12073", "Leon"),
    ("12075", "Levy"),
    ("12077", "Liberty"),
    ("12079", "Madison"),
    ("12081", "Manatee"),
    ("12083", "Marion"),
    ("12085", "Martin"),
    ("12086", "Miami-Dade"),
    ("12087", "Monroe"),
    ("12089", "Nassau"),
    ("12091", "Okaloosa"),
    ("12093", "Okeechobee"),
    ("12095", "Orange"),
    ("12097", "Osceola"),
    ("12099", "Palm Beach"),
    ("12101", "Pasco"),
    ("12103", "Pinellas"),
    ("12105", "Polk"),
    ("12107", "Putnam"),
    ("12109", "St. Johns"),
    ("12111", "St. Lucie"),
    ("12113", "Santa Rosa"),
    ("12115", "Sarasota"),
    ("12117", "Seminole"),
    ("12119", "Sumter"),
    ("12121", "Suwannee"),
    ("12123", "Taylor"),
    ("12125", "Union"),
    ("12127", "Volusia"),
    ("12129", "Wakulla"),
    ("12131", "Walton"),
    ("12133", "Washington"),
];

/// Normalize a raw county name to the canonical form used by the table.
///
/// `"Miami-Dade County"` → `"Miami-Dade"`, `"BROWARD COUNTY"` → `"Broward"`,
/// `"Saint Lucie County"` → `"St. Lucie"`. Blank input yields an empty string.
/// Normalizing an already-normalized name returns it unchanged.
pub fn normalize(raw: &str) -> String {
    let mut name = raw.trim();
    if name.is_empty() {
        return String::new();
    }

    while let Some(stripped) = strip_county_suffix(name) {
        name = stripped;
    }

    let mut tokens: Vec<String> = name.split_whitespace().map(normalize_token).collect();
    if tokens.len() > 1 && tokens[0].eq_ignore_ascii_case("saint") {
        tokens[0] = "St.".to_string();
    }
    tokens.join(" ")
}

/// `"Lee County"` → `Some("Lee")`. A lone `"County"` is a name, not a suffix.
fn strip_county_suffix(name: &str) -> Option<&str> {
    let (head, last) = name.rsplit_once(char::is_whitespace)?;
    let head = head.trim_end();
    (last.eq_ignore_ascii_case("county") && !head.is_empty()).then_some(head)
}

fn normalize_token(token: &str) -> String {
    if token.contains('-') {
        return token
            .split('-')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join("-");
    }

    let mut chars = token.chars();
    let is_mc = matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(m), Some(c), Some(_)) if m.eq_ignore_ascii_case(&'m') && c.eq_ignore_ascii_case(&'c')
    );
    if is_mc {
        // both leading chars are ASCII, so byte index 2 is a char boundary
        return format!("Mc{}", capitalize(&token[2..]));
    }

    capitalize(token)
}

/// First character uppercase, the rest lowercase. ASCII letters only; other
/// characters pass through, since full Unicode case mapping can change length.
fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => std::iter::once(first.to_ascii_uppercase())
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Bidirectional county name ↔ FIPS table for one state.
///
/// Name lookups go through [`normalize`] on both sides, so canonical names with
/// interior capitals (e.g. "DeSoto") still resolve from any casing.
#[derive(Debug, Clone)]
pub struct CountyTable {
    by_fips: BTreeMap<String, String>,
    by_name: HashMap<String, String>,
}

impl CountyTable {
    /// Build from `(fips, canonical name)` pairs. Rejects duplicate FIPS codes and
    /// names that collide after normalization.
    pub fn from_entries<I, F, N>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (F, N)>,
        F: Into<String>,
        N: Into<String>,
    {
        let mut by_fips = BTreeMap::new();
        let mut by_name = HashMap::new();
        for (fips, name) in entries {
            let (fips, name) = (fips.into(), name.into());
            let key = normalize(&name);
            if let Some(existing) = by_name.insert(key, fips.clone()) {
                return Err(DomainError::Mapping(format!(
                    "county name '{}' used by both {} and {}",
                    name, existing, fips
                )));
            }
            if by_fips.insert(fips.clone(), name).is_some() {
                return Err(DomainError::Mapping(format!("duplicate county FIPS {}", fips)));
            }
        }
        Ok(Self { by_fips, by_name })
    }

    /// The 67 Florida counties.
    pub fn florida() -> Self {
        let by_fips: BTreeMap<String, String> = FLORIDA_COUNTIES
            .iter()
            .map(|(fips, name)| (fips.to_string(), name.to_string()))
            .collect();
        let by_name = by_fips
            .iter()
            .map(|(fips, name)| (normalize(name), fips.clone()))
            .collect();
        Self { by_fips, by_name }
    }

    /// FIPS for a raw county name; `None` for unknown counties.
    pub fn fips_for_name(&self, raw_name: &str) -> Option<&str> {
        let key = normalize(raw_name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(String::as_str)
    }

    /// Canonical county name for a FIPS code.
    pub fn name_for_fips(&self, fips: &str) -> Option<&str> {
        self.by_fips.get(fips.trim()).map(String::as_str)
    }

    /// `(fips, canonical name)` pairs ordered by FIPS.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_fips.iter().map(|(f, n)| (f.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_fips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fips.is_empty()
    }
}

impl Default for CountyTable {
    fn default() -> Self {
        Self::florida()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize("Miami-Dade County"), "Miami-Dade");
        assert_eq!(normalize("BROWARD COUNTY"), "Broward");
        assert_eq!(normalize("Saint Lucie County"), "St. Lucie");
        assert_eq!(normalize("Hillsborough"), "Hillsborough");
        assert_eq!(normalize("miami-dade"), "Miami-Dade");
        assert_eq!(normalize("mcdonald"), "McDonald");
        assert_eq!(normalize("  palm   beach  county "), "Palm Beach");
        assert_eq!(normalize("County"), "County");
        assert_eq!(normalize("Saint\tLucie County"), "St. Lucie");
        assert_eq!(normalize("Saint County"), "Saint");
        assert_eq!(normalize("ßa"), "ßa");
    }

    #[test]
    fn test_normalize_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Miami-Dade County",
            "BROWARD COUNTY",
            "Saint Lucie County",
            "st. johns",
            "MCDONALD county",
            "Indian River",
            "DeSoto",
            "Lee County County",
            "mc",
            "x-",
            "Saint\tLucie County",
            "saint   johns",
            "Saint County",
            "ßa",
            "ÉLAN county",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_fips_for_name() {
        let table = CountyTable::florida();
        assert_eq!(table.fips_for_name("Miami-Dade"), Some("12086"));
        assert_eq!(table.fips_for_name("BROWARD COUNTY"), Some("12011"));
        assert_eq!(table.fips_for_name("st. lucie"), Some("12111"));
        assert_eq!(table.fips_for_name("Saint Lucie County"), Some("12111"));
        assert_eq!(table.fips_for_name("Saint\tLucie County"), Some("12111"));
        assert_eq!(table.fips_for_name("SAINT  JOHNS\tCOUNTY"), Some("12109"));
        assert_eq!(table.fips_for_name("DESOTO"), Some("12027"));
        assert_eq!(table.fips_for_name("Unknown County"), None);
        assert_eq!(table.fips_for_name(""), None);
    }

    #[test]
    fn test_name_for_fips() {
        let table = CountyTable::florida();
        assert_eq!(table.name_for_fips("12086"), Some("Miami-Dade"));
        assert_eq!(table.name_for_fips("12011"), Some("Broward"));
        assert_eq!(table.name_for_fips("12111"), Some("St. Lucie"));
        assert_eq!(table.name_for_fips("99999"), None);
    }

    #[test]
    fn test_florida_table_is_bijective() {
        let table = CountyTable::florida();
        assert_eq!(table.len(), 67);
        for (fips, name) in table.iter() {
            assert!(fips.starts_with("12"));
            assert_eq!(table.fips_for_name(name), Some(fips));
            assert_eq!(table.name_for_fips(fips), Some(name));
        }
        assert!(CountyTable::from_entries(FLORIDA_COUNTIES.iter().copied()).is_ok());
    }

    #[test]
    fn test_from_entries_rejects_collisions() {
        let dup_fips = CountyTable::from_entries([("12001", "Alachua"), ("12001", "Baker")]);
        assert!(matches!(dup_fips, Err(DomainError::Mapping(_))));

        let dup_name = CountyTable::from_entries([("12001", "Lee"), ("12003", "LEE")]);
        assert!(matches!(dup_name, Err(DomainError::Mapping(_))));
    }
}

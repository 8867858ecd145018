//! Application configuration. Paths, endpoints, request tuning.
//!
//! Read from `MSA_DENSITY_*` environment variables (after `.env`), plus an
//! optional file named by `MSA_DENSITY_CONFIG`. CLI flags take precedence.

use crate::adapters::census::ACS_BASE_URL;
use crate::adapters::ipeds::{DEFAULT_PER_PAGE, IPEDS_DIRECTORY_URL};
use crate::adapters::persistence::DEFAULT_MAPPING_PATH;
use crate::domain::density::FLORIDA_EXPECTED_POPULATION;
use crate::usecases::year_resolver::{DEFAULT_BACKFILL_YEARS, DEFAULT_START_YEAR};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_DIR: &str = "data";
pub const DEFAULT_ACS_YEAR: i32 = 2022;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Snapshot cache and latest-year marker. Read from MSA_DENSITY_CACHE_DIR.
    #[serde(default)]
    pub cache_dir: Option<String>,

    /// county-to-msa.json. Read from MSA_DENSITY_MAPPING_PATH.
    #[serde(default)]
    pub mapping_path: Option<String>,

    #[serde(default)]
    pub state_fips: Option<String>,

    #[serde(default)]
    pub state_abbrev: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Upstream APIs
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub ipeds_base_url: Option<String>,

    #[serde(default)]
    pub acs_base_url: Option<String>,

    /// ACS 5-year vintage. Read from MSA_DENSITY_ACS_YEAR.
    #[serde(default)]
    pub acs_year: Option<i32>,

    #[serde(default)]
    pub per_page: Option<u32>,

    #[serde(default)]
    pub max_retries: Option<u32>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Pause between directory pages. Read from MSA_DENSITY_PAGE_DELAY_MS.
    #[serde(default)]
    pub page_delay_ms: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Year resolution and validation
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub start_year: Option<i32>,

    #[serde(default)]
    pub backfill_years: Option<i32>,

    #[serde(default)]
    pub expected_population_min: Option<u64>,

    #[serde(default)]
    pub expected_population_max: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MSA_DENSITY").try_parsing(true));
        if let Ok(path) = std::env::var("MSA_DENSITY_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn cache_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR))
    }

    pub fn mapping_path_or_default(&self) -> PathBuf {
        PathBuf::from(self.mapping_path.as_deref().unwrap_or(DEFAULT_MAPPING_PATH))
    }

    pub fn state_fips_or_default(&self) -> String {
        self.state_fips.clone().unwrap_or_else(|| "12".to_string())
    }

    pub fn state_abbrev_or_default(&self) -> String {
        self.state_abbrev.clone().unwrap_or_else(|| "FL".to_string())
    }

    pub fn ipeds_base_url_or_default(&self) -> String {
        self.ipeds_base_url
            .clone()
            .unwrap_or_else(|| IPEDS_DIRECTORY_URL.to_string())
    }

    pub fn acs_base_url_or_default(&self) -> String {
        self.acs_base_url
            .clone()
            .unwrap_or_else(|| ACS_BASE_URL.to_string())
    }

    pub fn acs_year_or_default(&self) -> i32 {
        self.acs_year.unwrap_or(DEFAULT_ACS_YEAR)
    }

    pub fn per_page_or_default(&self) -> u32 {
        self.per_page.filter(|&n| n > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.filter(|&n| n > 0).unwrap_or(6)
    }

    pub fn request_timeout_or_default(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(30))
    }

    pub fn page_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms.unwrap_or(100))
    }

    pub fn start_year_or_default(&self) -> i32 {
        self.start_year.unwrap_or(DEFAULT_START_YEAR)
    }

    pub fn backfill_years_or_default(&self) -> i32 {
        self.backfill_years.unwrap_or(DEFAULT_BACKFILL_YEARS)
    }

    /// Expected total MSA population; either bound may be overridden.
    pub fn expected_population_or_default(&self) -> RangeInclusive<u64> {
        let min = self
            .expected_population_min
            .unwrap_or(*FLORIDA_EXPECTED_POPULATION.start());
        let max = self
            .expected_population_max
            .unwrap_or(*FLORIDA_EXPECTED_POPULATION.end());
        min..=max
    }
}

//! Wiring & DI. Entry point: parse the CLI, bootstrap adapters, inject into
//! services, write outputs. No business logic here.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use msa_density::adapters::census::AcsPopulationAdapter;
use msa_density::adapters::http::{ReqwestHttp, RetryPolicy};
use msa_density::adapters::ipeds::IpedsClient;
use msa_density::adapters::persistence::{
    DEFAULT_INSTITUTIONS_PATH, FileYearCache, JsonRecordCache, load_aggregation, load_mapping,
};
use msa_density::adapters::report::{self, DensityReport};
use msa_density::adapters::ui::{self, Spinner};
use msa_density::domain::msa;
use msa_density::ports::{HttpPort, InstitutionSource};
use msa_density::shared::config::AppConfig;
use msa_density::usecases::{CountLevel, DensityService, InstitutionCountService, YearResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Rows shown in each of the top/bottom ranking tables.
const RANKING_ROWS: usize = 5;

/// Florida higher-education institution counts and MSA competition density.
#[derive(Parser)]
#[command(name = "msa-density")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump institution counts as JSON (sorted keys)
    Dump {
        /// Aggregation level
        #[arg(long, value_enum, default_value_t = By::Msa)]
        by: By,

        /// Data year (default: latest available)
        #[arg(long)]
        year: Option<i32>,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Path to county-to-msa.json
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Exclude less-than-2-year trade/beauty schools
        #[arg(long)]
        filtered: bool,
    },

    /// Compute MSA competition density (institutions per 100k residents)
    Density {
        /// Output file for density JSON
        #[arg(long)]
        out: PathBuf,

        /// Full-aggregation JSON with msa_counts
        #[arg(long)]
        institutions: Option<PathBuf>,

        /// Path to county-to-msa.json
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Also write the results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Fail if an MSA name maps to more than one MSA code
        #[arg(long)]
        strict_msa_codes: bool,
    },

    /// Resolve the latest IPEDS year with data
    Year {
        /// Year to start probing from
        #[arg(long)]
        start: Option<i32>,

        /// How many earlier years to try
        #[arg(long)]
        backfill: Option<i32>,

        /// Cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum By {
    /// Counts by county FIPS
    County,
    /// Counts by MSA name
    Msa,
    /// County and MSA counts, total and year
    Full,
    /// Counts by raw county name
    CountyName,
}

impl From<By> for CountLevel {
    fn from(by: By) -> Self {
        match by {
            By::County => CountLevel::County,
            By::Msa => CountLevel::Msa,
            By::Full => CountLevel::Full,
            By::CountyName => CountLevel::CountyName,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = &env_loaded {
        info!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();
    let cfg = AppConfig::load().context("invalid MSA_DENSITY_* configuration")?;

    match cli.command {
        Commands::Dump {
            by,
            year,
            out,
            cache_dir,
            mapping,
            pretty,
            filtered,
        } => {
            let cache_dir = cache_dir.unwrap_or_else(|| cfg.cache_dir_or_default());
            let mapping = mapping.unwrap_or_else(|| cfg.mapping_path_or_default());
            run_dump(&cfg, by, year, out, cache_dir, mapping, pretty, filtered).await
        }
        Commands::Density {
            out,
            institutions,
            mapping,
            pretty,
            csv,
            strict_msa_codes,
        } => {
            ui::init_ui("Census ACS population × IPEDS institutions");
            let institutions = institutions.unwrap_or_else(|| PathBuf::from(DEFAULT_INSTITUTIONS_PATH));
            let mapping = mapping.unwrap_or_else(|| cfg.mapping_path_or_default());
            run_density(&cfg, out, institutions, mapping, pretty, csv, strict_msa_codes).await
        }
        Commands::Year {
            start,
            backfill,
            cache_dir,
        } => {
            let cache_dir = cache_dir.unwrap_or_else(|| cfg.cache_dir_or_default());
            let start = start.unwrap_or_else(|| cfg.start_year_or_default());
            let backfill = backfill.unwrap_or_else(|| cfg.backfill_years_or_default());
            let resolver = year_resolver(&cfg, cache_dir, backfill)?;
            let year = resolver.resolve_latest_year(start).await?;
            println!("{}", year);
            Ok(())
        }
    }
}

fn http_client(cfg: &AppConfig) -> Result<Arc<dyn HttpPort>> {
    let http = ReqwestHttp::new(cfg.request_timeout_or_default())?;
    Ok(Arc::new(http))
}

fn retry_policy(cfg: &AppConfig) -> RetryPolicy {
    RetryPolicy {
        max_retries: cfg.max_retries_or_default(),
        ..RetryPolicy::default()
    }
}

fn institution_source(cfg: &AppConfig, cache_dir: &Path) -> Result<Arc<dyn InstitutionSource>> {
    let cache = Arc::new(JsonRecordCache::new(cache_dir, cfg.state_abbrev_or_default()));
    let client = IpedsClient::new(http_client(cfg)?, cache)
        .with_base_url(cfg.ipeds_base_url_or_default())
        .with_state_fips(cfg.state_fips_or_default())
        .with_per_page(cfg.per_page_or_default())
        .with_page_delay(cfg.page_delay_or_default())
        .with_retry(retry_policy(cfg));
    Ok(Arc::new(client))
}

fn year_resolver(cfg: &AppConfig, cache_dir: PathBuf, backfill: i32) -> Result<YearResolver> {
    let source = institution_source(cfg, &cache_dir)?;
    let cache = Arc::new(FileYearCache::in_dir(&cache_dir));
    Ok(YearResolver::new(source, cache).with_backfill(backfill))
}

#[allow(clippy::too_many_arguments)]
async fn run_dump(
    cfg: &AppConfig,
    by: By,
    year: Option<i32>,
    out: Option<PathBuf>,
    cache_dir: PathBuf,
    mapping: PathBuf,
    pretty: bool,
    filtered: bool,
) -> Result<()> {
    let year = match year {
        Some(year) => year,
        None => {
            year_resolver(cfg, cache_dir.clone(), cfg.backfill_years_or_default())?
                .resolve_latest_year(cfg.start_year_or_default())
                .await?
        }
    };

    // The mapping only matters for MSA-level output.
    let fips_to_msa = match by {
        By::Msa | By::Full => msa::build_fips_to_msa(&load_mapping(&mapping).await?),
        By::County | By::CountyName => Default::default(),
    };

    let service = InstitutionCountService::new(institution_source(cfg, &cache_dir)?);
    let spinner = Spinner::start(format!("Loading IPEDS institutions for {}", year));
    let counts = service
        .counts(by.into(), year, &fips_to_msa, filtered)
        .await;
    spinner.clear();
    let counts = counts?;

    match out {
        Some(path) => {
            report::write_json(&path, &counts, pretty).await?;
            eprintln!(
                "✓ Wrote {} entries to {}",
                counts.entry_count(),
                path.display()
            );
        }
        None => println!("{}", report::to_json(&counts, pretty)?),
    }
    Ok(())
}

async fn run_density(
    cfg: &AppConfig,
    out: PathBuf,
    institutions: PathBuf,
    mapping: PathBuf,
    pretty: bool,
    csv: Option<PathBuf>,
    strict_msa_codes: bool,
) -> Result<()> {
    let aggregation = load_aggregation(&institutions).await?;
    let msa_codes = DensityService::msa_codes(&load_mapping(&mapping).await?, strict_msa_codes)?;

    let acs_year = cfg.acs_year_or_default();
    let population = AcsPopulationAdapter::new(http_client(cfg)?)
        .with_base_url(cfg.acs_base_url_or_default())
        .with_acs_year(acs_year)
        .with_state_abbrev(cfg.state_abbrev_or_default())
        .with_retry(retry_policy(cfg));
    let service = DensityService::new(Arc::new(population))
        .with_expected_population(Some(cfg.expected_population_or_default()));

    let spinner = Spinner::start("Fetching MSA population from Census ACS");
    let outcome = service.compute(&aggregation.msa_counts, &msa_codes).await;
    spinner.clear();
    let outcome = outcome?;

    let ipeds = aggregation
        .year
        .map(|y| format!("IPEDS ({})", y))
        .unwrap_or_else(|| "IPEDS".to_string());
    let source = format!("Census ACS 5-Year ({}) + {}", acs_year, ipeds);
    let density = DensityReport::new(outcome.records, source, Utc::now().date_naive());

    report::write_json(&out, &density, pretty).await?;
    eprintln!("✓ Wrote competition density data to {}", out.display());
    if let Some(path) = csv {
        report::write_csv(&path, &density.msas).await?;
        eprintln!("✓ Wrote CSV to {}", path.display());
    }

    ui::print_rankings(&density.msas, RANKING_ROWS);
    Ok(())
}

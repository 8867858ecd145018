//! IPEDS directory client for the Urban Institute Education Data API.
//!
//! Implements InstitutionSource. No API key needed. Pages are followed through
//! the absolute `next` link until it is null; results are cached per year.

use crate::adapters::http::{RetryPolicy, get_with_retry};
use crate::domain::{DomainError, InstitutionRecord};
use crate::ports::{HttpPort, InstitutionSource, RecordCachePort};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const IPEDS_DIRECTORY_URL: &str =
    "https://educationdata.urban.org/api/v1/college-university/ipeds/directory/";

pub const DEFAULT_PER_PAGE: u32 = 500;

/// One page of `/ipeds/directory/{year}/`.
#[derive(Debug, Deserialize)]
struct DirectoryPage {
    #[serde(default)]
    results: Vec<InstitutionRecord>,
    #[serde(default)]
    next: Option<String>,
}

pub struct IpedsClient {
    http: Arc<dyn HttpPort>,
    cache: Arc<dyn RecordCachePort>,
    base_url: String,
    state_fips: String,
    per_page: u32,
    /// Pause between pages, to be polite to the API.
    page_delay: Duration,
    retry: RetryPolicy,
}

impl IpedsClient {
    /// Florida (`fips=12`), 500 rows per page, default retry policy.
    pub fn new(http: Arc<dyn HttpPort>, cache: Arc<dyn RecordCachePort>) -> Self {
        Self {
            http,
            cache,
            base_url: IPEDS_DIRECTORY_URL.to_string(),
            state_fips: "12".to_string(),
            per_page: DEFAULT_PER_PAGE,
            page_delay: Duration::from_millis(100),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_state_fips(mut self, state_fips: impl Into<String>) -> Self {
        self.state_fips = state_fips.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn year_url(&self, year: i32) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), year)
    }

    async fn fetch_all_pages(&self, year: i32) -> Result<Vec<InstitutionRecord>, DomainError> {
        let mut url = self.year_url(year);
        let mut query = vec![
            ("fips".to_string(), self.state_fips.clone()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        let mut out = Vec::new();
        let mut page_no = 1u32;

        loop {
            info!(page = page_no, year, "fetching IPEDS directory page");
            let response = get_with_retry(self.http.as_ref(), &url, &query, &self.retry).await?;
            let page: DirectoryPage = serde_json::from_str(&response.body)
                .map_err(|e| DomainError::Parse(format!("IPEDS page {}: {}", page_no, e)))?;
            debug!(page = page_no, rows = page.results.len(), "page received");
            out.extend(page.results);

            match page.next.filter(|next| !next.trim().is_empty()) {
                Some(next) => {
                    // `next` already carries the query string
                    url = next;
                    query.clear();
                    page_no += 1;
                    tokio::time::sleep(self.page_delay).await;
                }
                None => break,
            }
        }

        info!(year, count = out.len(), "fetched institutions");
        Ok(out)
    }
}

#[async_trait::async_trait]
impl InstitutionSource for IpedsClient {
    async fn fetch_institutions(
        &self,
        year: i32,
        use_cache: bool,
    ) -> Result<Vec<InstitutionRecord>, DomainError> {
        if use_cache {
            if let Some(records) = self.cache.load(year).await? {
                return Ok(records);
            }
        }

        let records = self.fetch_all_pages(year).await?;

        if use_cache && !records.is_empty() {
            self.cache.store(year, &records).await?;
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::ScriptedHttp;
    use crate::adapters::persistence::JsonRecordCache;
    use serde_json::json;

    fn client(http: Arc<ScriptedHttp>, dir: &std::path::Path) -> IpedsClient {
        IpedsClient::new(http, Arc::new(JsonRecordCache::new(dir, "FL")))
            .with_base_url("https://example.com/ipeds/directory/")
            .with_page_delay(Duration::ZERO)
            .with_retry(RetryPolicy::immediate(6))
    }

    #[tokio::test]
    async fn test_pagination() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(
            ScriptedHttp::new()
                .respond_json(&json!({
                    "results": [{"unitid": 1}, {"unitid": 2}],
                    "next": "https://example.com/page2"
                }))
                .respond_json(&json!({"results": [{"unitid": 3}], "next": null})),
        );

        let records = client(Arc::clone(&http), dir.path())
            .fetch_institutions(2022, false)
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].attributes["unitid"], json!(1));
        assert_eq!(records[2].attributes["unitid"], json!(3));

        let calls = http.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "https://example.com/ipeds/directory/2022/");
        assert_eq!(
            calls[0].query,
            vec![
                ("fips".to_string(), "12".to_string()),
                ("per_page".to_string(), "500".to_string())
            ]
        );
        assert_eq!(calls[1].url, "https://example.com/page2");
        assert!(calls[1].query.is_empty());

        // caching disabled: nothing written
        assert!(!dir.path().join("ipeds_institutions_FL_2022.json").exists());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_http() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ipeds_institutions_FL_2022.json"),
            r#"[{"unitid": 123, "inst_name": "Test University"}]"#,
        )
        .unwrap();
        let http = Arc::new(ScriptedHttp::new());

        let records = client(Arc::clone(&http), dir.path())
            .fetch_institutions(2022, true)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attributes["inst_name"], json!("Test University"));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_written_after_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(
            ScriptedHttp::new().respond_json(&json!({"results": [{"unitid": 999}], "next": null})),
        );
        let ipeds = client(Arc::clone(&http), dir.path());

        let fetched = ipeds.fetch_institutions(2023, true).await.unwrap();
        let cached = std::fs::read_to_string(dir.path().join("ipeds_institutions_FL_2023.json"))
            .unwrap();
        let cached: Vec<InstitutionRecord> = serde_json::from_str(&cached).unwrap();
        assert_eq!(cached, fetched);

        // second call is served from disk
        ipeds.fetch_institutions(2023, true).await.unwrap();
        assert_eq!(http.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(ScriptedHttp::new().respond_json(&json!({"results": [], "next": null})));

        let records = client(http, dir.path())
            .fetch_institutions(2025, true)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert!(!dir.path().join("ipeds_institutions_FL_2025.json").exists());
    }

    #[tokio::test]
    async fn test_retry_inside_pagination() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(
            ScriptedHttp::new()
                .respond_with_retry_after(429, "1")
                .respond_json(&json!({"results": [{"unitid": 1}]})),
        );

        let records = client(Arc::clone(&http), dir.path())
            .fetch_institutions(2021, false)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(http.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_page_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let http = Arc::new(ScriptedHttp::new().respond(200, "<html>oops</html>"));

        let err = client(http, dir.path())
            .fetch_institutions(2021, false)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Parse(_)));
    }
}

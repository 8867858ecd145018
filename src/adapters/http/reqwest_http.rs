//! reqwest-backed HttpPort.

use crate::domain::DomainError;
use crate::ports::{HttpPort, HttpResponse};
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = "Florida-MSA-Analytics/1.0";

/// Shared reqwest client with a per-request timeout.
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Http(format!("build client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpPort for ReqwestHttp {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, DomainError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Http(format!("read body from {}: {}", url, e)))?;

        debug!(url, status, body_len = body.len(), "HTTP GET");

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

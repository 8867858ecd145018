//! Scripted HttpPort for tests.
//!
//! Replies are served in the order they were queued; every call is recorded.

use crate::domain::DomainError;
use crate::ports::{HttpPort, HttpResponse};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A recorded GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub query: Vec<(String, String)>,
}

#[derive(Default)]
pub struct ScriptedHttp {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, reply: Result<HttpResponse, String>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpResponse {
            status,
            retry_after: None,
            body: body.into(),
        }))
    }

    pub fn respond_json(self, body: &serde_json::Value) -> Self {
        self.respond(200, body.to_string())
    }

    pub fn respond_with_retry_after(self, status: u16, retry_after: &str) -> Self {
        self.push(Ok(HttpResponse {
            status,
            retry_after: Some(retry_after.to_string()),
            body: String::new(),
        }))
    }

    /// Queue a transport-level failure.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(message.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl HttpPort for ScriptedHttp {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, DomainError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                url: url.to_string(),
                query: query.to_vec(),
            });
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(DomainError::Http(message)),
            None => Err(DomainError::Http(format!("no scripted reply for {}", url))),
        }
    }
}

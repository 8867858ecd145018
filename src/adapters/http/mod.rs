//! HTTP transport: reqwest adapter, retry policy, scripted test double.

#[cfg(test)]
pub mod mock_http;
pub mod reqwest_http;
pub mod retry;

#[cfg(test)]
pub use mock_http::ScriptedHttp;
pub use reqwest_http::ReqwestHttp;
pub use retry::{DEFAULT_MAX_RETRY_AFTER, RetryPolicy, get_with_retry};

//! Provider Utilities
//!
//! Shared utilities used by provider implementations.

mod http_response;

pub use http_response::HttpResponseUtils;

use std::time::Duration;

use reqwest::Client;

use crate::constants::USER_AGENT;

/// Build the HTTP client used by an API adapter
pub fn build_http_client(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))
}

/// Trim a configured value, dropping it when blank
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

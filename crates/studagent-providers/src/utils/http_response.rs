//! HTTP Response Utilities
//!
//! Helper functions for turning HTTP outcomes from API providers into
//! `ProviderError`s. These are shared utilities, not ports.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use studagent_domain::error::{ProviderError, ProviderErrorKind};

use crate::constants::ERROR_BODY_MAX_CHARS;

/// Utilities for processing HTTP responses
///
/// Provides the status mapping shared by every LLM adapter.
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Error kind for a non-success status
    pub fn classify_status(status: StatusCode) -> ProviderErrorKind {
        match status.as_u16() {
            401 | 403 => ProviderErrorKind::Unauthorized,
            429 => ProviderErrorKind::RateLimited,
            408 | 504 => ProviderErrorKind::Timeout,
            500..=599 => ProviderErrorKind::Unavailable,
            _ => ProviderErrorKind::InvalidResponse,
        }
    }

    /// Check response status and parse JSON
    ///
    /// # Arguments
    /// * `response` - The HTTP response to check
    /// * `provider` - Name of the provider for error messages
    pub async fn check_and_parse(
        response: Response,
        provider: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let kind = Self::classify_status(status);
            return Err(ProviderError::new(
                provider,
                kind,
                format!("HTTP {}: {}", status.as_u16(), truncate(&body)),
            ));
        }

        response.json().await.map_err(|e| {
            ProviderError::invalid_response(provider, format!("response parse failed: {e}"))
        })
    }

    /// Map a transport error from `send()`
    pub fn send_error(provider: &str, err: &reqwest::Error, timeout: Duration) -> ProviderError {
        if err.is_timeout() {
            ProviderError::timeout(provider, format!("request timed out after {timeout:?}"))
        } else if let Some(status) = err.status() {
            ProviderError::new(provider, Self::classify_status(status), err.to_string())
        } else {
            ProviderError::unavailable(provider, format!("HTTP request failed: {err}"))
        }
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_MAX_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

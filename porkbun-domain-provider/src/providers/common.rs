//! Shared helpers for provider implementations

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Create an HTTP client with JSON headers and the given timeouts
pub fn create_http_client(provider: &str, timeout: Duration, user_agent: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(timeout))
        .timeout(timeout)
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ Domain name handling ============

/// Normalize a domain name: trim, drop the trailing dot, lower-case.
///
/// Empty names and names with inner whitespace or slashes are rejected, since they
/// would otherwise be spliced into the endpoint path.
pub fn normalize_domain(name: &str, provider: &str) -> Result<String> {
    let normalized = name.trim().trim_end_matches('.').to_lowercase();

    let invalid = |detail: &str| ProviderError::InvalidParameter {
        provider: provider.to_string(),
        param: "domain".to_string(),
        detail: detail.to_string(),
    };

    if normalized.is_empty() {
        return Err(invalid("domain name must not be empty"));
    }
    if normalized
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(invalid("domain name contains invalid characters"));
    }
    Ok(normalized)
}

/// Normalize a TLD: trim, drop leading dots, lower-case.
/// `".COM"` -> `"com"`
pub fn normalize_tld(tld: &str) -> String {
    tld.trim().trim_start_matches('.').to_lowercase()
}

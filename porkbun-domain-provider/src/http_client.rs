//! Generic HTTP client tools
//!
//! Reusable request execution for the Porkbun client: sending, logging,
//! classifying transport failures and retrying the transient ones.
//! Callers build the `RequestBuilder` themselves and decide how to interpret the body.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::{sanitize_body_for_log, truncate_for_log};

/// Base delay of the exponential backoff.
const BACKOFF_BASE_MS: u64 = 500;
/// Upper bound of the exponential backoff.
const BACKOFF_MAX_MS: u64 = 10_000;
/// Upper bound honoured for a server-provided `Retry-After`.
const RETRY_AFTER_MAX_SECS: u64 = 30;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// Transport failures are classified into [`ProviderError::Timeout`] and
    /// [`ProviderError::NetworkError`]; HTTP 429 becomes [`ProviderError::RateLimited`]
    /// and 502/503/504 become `NetworkError` so that they are retried.
    /// Any other status is returned to the caller together with the body.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        endpoint: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {endpoint}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Read Retry-After before the body consumes the response
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            sanitize_body_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    ///
    /// Returns [`ProviderError::ParseError`] and logs a truncated copy of the
    /// body when it does not match `T`.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                sanitize_body_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request with retries.
    ///
    /// `handle` interprets each response; an error it returns goes through the
    /// same retry decision as a transport error, so a rate limit reported in the
    /// body is retried like an HTTP 429.
    ///
    /// # Retry strategy
    /// - Only transient errors are retried (see [`ProviderError::is_retryable`])
    /// - Exponential backoff: 0.5s, 1s, 2s, 4s, ... (maximum 10 seconds)
    /// - A `Retry-After` from a 429 response is honoured, capped at 30 seconds
    /// - `max_retries == 0` sends exactly once
    pub async fn execute_request_with_retry<T, F>(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        endpoint: &str,
        max_retries: u32,
        mut handle: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut(u16, String) -> Result<T, ProviderError>,
    {
        if max_retries == 0 {
            let (status, text) =
                Self::execute_request(request_builder, provider_name, method_name, endpoint)
                    .await?;
            return handle(status, text);
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                let (status, text) =
                    Self::execute_request(request_builder, provider_name, method_name, endpoint)
                        .await?;
                return handle(status, text);
            };

            let outcome = Self::execute_request(req, provider_name, method_name, endpoint)
                .await
                .and_then(|(status, text)| handle(status, text));

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request to {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        endpoint,
                        attempt + 1,
                        max_retries + 1,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: format!("Request failed after {max_retries} retries"),
        }))
    }
}

/// Calculate the delay before the next attempt.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(RETRY_AFTER_MAX_SECS))
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 500ms, 1s, 2s, 4s, 8s, capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keep the shift in range
    let delay_ms = BACKOFF_BASE_MS.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(BACKOFF_MAX_MS))
}

//! Porkbun HTTP request method

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::PorkbunClient;
use super::types::{ApiEnvelope, AuthPayload, AuthedRequest};

/// Whether a request must carry the API key pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Required,
    /// Credentials are attached when configured, but the endpoint works without them
    Optional,
}

/// Whether a failed request may be sent again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Retry {
    /// Transient failures are retried up to the client's `max_retries`
    Transient,
    /// Sent exactly once; the server may have acted on a request that failed in transit
    Never,
}

impl PorkbunClient {
    /// Execute a Porkbun API call.
    ///
    /// Every endpoint is a `POST` with a JSON body holding the key pair plus `body`.
    /// The response envelope is checked before `T` is parsed, on every attempt.
    pub(crate) async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        auth: Auth,
        retry: Retry,
        ctx: ErrorContext,
    ) -> Result<T> {
        let configured = self.credentials.is_configured();
        if auth == Auth::Required && !configured {
            return Err(ProviderError::MissingCredentials {
                provider: self.provider_name().to_string(),
            });
        }

        // 1. Serialize request body
        let payload = if configured {
            serde_json::to_vec(&AuthedRequest {
                auth: AuthPayload::from(&self.credentials),
                body,
            })
        } else {
            serde_json::to_vec(body)
        }
        .map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })?;

        // 2. Send request, decoding each response so API-level rate limits are retried too
        let url = format!("{}{endpoint}", self.base_url);
        let request = self.client.post(&url).body(payload);
        let max_retries = match retry {
            Retry::Transient => self.max_retries,
            Retry::Never => 0,
        };

        HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "POST",
            endpoint,
            max_retries,
            |status, response_text| self.decode(endpoint, status, &response_text, &ctx),
        )
        .await
    }

    /// Check the response envelope, then parse the data.
    fn decode<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        status: u16,
        response_text: &str,
        ctx: &ErrorContext,
    ) -> Result<T> {
        let envelope: ApiEnvelope = match serde_json::from_str(response_text) {
            Ok(envelope) => envelope,
            Err(e) if !(200..300).contains(&status) => {
                log::debug!("[{}] Non-JSON error body: {e}", self.provider_name());
                return Err(ProviderError::Http {
                    provider: self.provider_name().to_string(),
                    status,
                    body: truncate_for_log(response_text),
                });
            }
            Err(e) => return Err(self.parse_error(e)),
        };

        if !envelope.is_success() {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown API error".to_string());
            log::warn!(
                "[{}] API error on {endpoint} (HTTP {status}): {message}",
                self.provider_name()
            );
            return Err(self.map_error(RawApiError::new(status, message), ctx.clone()));
        }

        log::debug!("[{}] API request successful: {endpoint}", self.provider_name());

        HttpUtils::parse_json(response_text, self.provider_name())
    }
}

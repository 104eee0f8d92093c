//! Porkbun error mapping
//!
//! Porkbun reports failures as `{"status": "ERROR", "message": "..."}` without a
//! machine-readable code, so errors are classified from the message text
//! (and the HTTP status when the message is not conclusive).

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::PorkbunClient;

impl ProviderErrorMapper for PorkbunClient {
    fn provider_name(&self) -> &'static str {
        "porkbun"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        classify(self.provider_name(), &raw, context).unwrap_or_else(|| self.unknown_error(raw))
    }
}

/// Recognised failures; `None` when neither the message nor the status is conclusive.
fn classify(provider: &str, raw: &RawApiError, context: ErrorContext) -> Option<ProviderError> {
    let lower = raw.message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    let raw_message = Some(raw.message.clone());

    // "Invalid API key. (002)", "All API requests must include the apikey ..."
    if has(&["api key", "apikey", "secretapikey", "secret key", "authentication"]) {
        return Some(ProviderError::InvalidCredentials {
            provider: provider.to_string(),
            raw_message,
        });
    }

    // "Domain is not opted in to API access."
    if has(&["opted in", "api access", "permission", "not authorized", "forbidden"]) {
        return Some(ProviderError::PermissionDenied {
            provider: provider.to_string(),
            raw_message,
        });
    }

    if has(&["insufficient", "funds", "balance", "credit"]) {
        return Some(ProviderError::InsufficientFunds {
            provider: provider.to_string(),
            raw_message,
        });
    }

    if has(&["rate limit", "too many requests"]) || raw.status == 429 {
        return Some(ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after: None,
            raw_message,
        });
    }

    // "Invalid domain.", "Domain not found", "... not in your account"
    if has(&["invalid domain", "not found", "not in your account", "does not exist"])
        || raw.status == 404
    {
        return Some(ProviderError::DomainNotFound {
            provider: provider.to_string(),
            domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
            raw_message,
        });
    }

    match raw.status {
        401 => Some(ProviderError::InvalidCredentials {
            provider: provider.to_string(),
            raw_message,
        }),
        403 => Some(ProviderError::PermissionDenied {
            provider: provider.to_string(),
            raw_message,
        }),
        _ => None,
    }
}

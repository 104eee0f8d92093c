use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{AuthCode, Domain, PricingInfo, RenewalResult};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status of the response that carried the error
    pub status: u16,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Extra information available when mapping an error (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Domain the request was about (used for `DomainNotFound`)
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
        }
    }
}

/// Maps raw API errors onto [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: invalid parameter
    fn invalid_parameter(&self, param: &str, detail: impl Into<String>) -> ProviderError {
        ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: param.to_string(),
            detail: detail.into(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_message: raw.message,
        }
    }
}

/// Domain registrar operations exposed to the MCP tools.
///
/// Implemented by [`PorkbunClient`](crate::PorkbunClient); test code substitutes mocks.
#[async_trait]
pub trait DomainRegistrar: Send + Sync {
    /// Registrar identifier
    fn id(&self) -> &'static str;

    /// API base URL requests are sent to
    fn base_url(&self) -> &str;

    /// Whether an API key pair is configured
    fn has_credentials(&self) -> bool;

    /// All domains in the account
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// A single domain of the account
    ///
    /// Fails with [`ProviderError::DomainNotFound`] when the account does not hold it.
    async fn get_domain_info(&self, domain: &str) -> Result<Domain>;

    /// Transfer authorization (EPP) code of a domain
    async fn get_auth_code(&self, domain: &str) -> Result<AuthCode>;

    /// Renew a domain for `years` (1..=10)
    async fn renew_domain(&self, domain: &str, years: u32) -> Result<RenewalResult>;

    /// Prices keyed by TLD, optionally restricted to one TLD
    ///
    /// An unknown TLD yields an empty map.
    async fn get_pricing(&self, tld: Option<&str>) -> Result<BTreeMap<String, PricingInfo>>;
}

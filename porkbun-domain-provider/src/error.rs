use serde::{Deserialize, Serialize};

/// Unified error type for all Porkbun API operations.
///
/// Each variant includes a `provider` field identifying the API that produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError): network connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
/// - [`RateLimited`](Self::RateLimited): API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    ///
    /// This is a transient error and is automatically retried.
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// No API key / secret key pair is configured.
    MissingCredentials {
        /// Provider that produced the error.
        provider: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The key pair is valid but not allowed to perform the operation
    /// (e.g. the domain is not opted in to API access).
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The domain does not exist in the account.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g. renewal years out of range, empty domain).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The account balance does not cover the requested purchase.
    InsufficientFunds {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The API answered with a non-success HTTP status and no readable error envelope.
    Http {
        /// Provider that produced the error.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the API.
    ///
    /// This is a catch-all for error messages not yet mapped to a specific variant.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the error is transient and the request may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Whether the error is caused by user input or account state, used to pick a log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// Keep this in sync when adding variants.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. }
                | Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::DomainNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::InsufficientFunds { .. }
        )
    }

    /// HTTP status associated with the failure, if one is known.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::DomainNotFound { .. } => Some(404),
            Self::InvalidCredentials { .. } | Self::MissingCredentials { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::InvalidParameter { .. } => Some(400),
            _ => None,
        }
    }

    /// Variant tag, identical to the `code` field of the serialized form.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NetworkError { .. } => "NetworkError",
            Self::Timeout { .. } => "Timeout",
            Self::RateLimited { .. } => "RateLimited",
            Self::MissingCredentials { .. } => "MissingCredentials",
            Self::InvalidCredentials { .. } => "InvalidCredentials",
            Self::PermissionDenied { .. } => "PermissionDenied",
            Self::DomainNotFound { .. } => "DomainNotFound",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::Http { .. } => "Http",
            Self::ParseError { .. } => "ParseError",
            Self::SerializationError { .. } => "SerializationError",
            Self::Unknown { .. } => "Unknown",
        }
    }

    /// Structured view of the error for tool responses.
    #[must_use]
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "status": self.http_status(),
            "code": self.code(),
        })
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::MissingCredentials { provider } => {
                write!(f, "[{provider}] API credentials are not configured")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Domain '{domain}' not found in account")
                }
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::InsufficientFunds {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Insufficient funds: {msg}")
                } else {
                    write!(f, "[{provider}] Insufficient funds")
                }
            }
            Self::Http {
                provider,
                status,
                body,
            } => {
                write!(f, "[{provider}] HTTP {status}: {body}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

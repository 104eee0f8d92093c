//! # porkbun-domain-provider
//!
//! Async client for the [Porkbun](https://porkbun.com/) domain API, used by the
//! porkbun-domain-mcp server.
//!
//! ## Operations
//!
//! | Operation | Endpoint | Auth |
//! |-----------|----------|------|
//! | [`list_domains`](DomainRegistrar::list_domains) | `/domain/listAll` | API key pair |
//! | [`get_domain_info`](DomainRegistrar::get_domain_info) | `/domain/listAll` | API key pair |
//! | [`get_auth_code`](DomainRegistrar::get_auth_code) | `/domain/getAuthCode/{domain}` | API key pair |
//! | [`renew_domain`](DomainRegistrar::renew_domain) | `/domain/renew/{domain}` | API key pair |
//! | [`get_pricing`](DomainRegistrar::get_pricing) | `/pricing/get` | none |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use porkbun_domain_provider::{Credentials, DomainRegistrar, PorkbunClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PorkbunClient::builder(Credentials::new("pk1_...", "sk1_..."))
//!         .max_retries(2)
//!         .build()?;
//!
//!     for domain in client.list_domains().await? {
//!         println!("{} ({}) expires {:?}", domain.domain, domain.status, domain.expire_date);
//!     }
//!
//!     let pricing = client.get_pricing(Some("com")).await?;
//!     println!("{pricing:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//! Porkbun's `{"status": "ERROR"}` envelopes are mapped onto structured variants
//! such as [`ProviderError::InvalidCredentials`] or [`ProviderError::DomainNotFound`].
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are automatically
//! retried with exponential backoff.

mod error;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use traits::DomainRegistrar;

pub use types::{
    AuthCode, Credentials, Domain, DomainLabel, DomainStatus, PricingInfo, RenewalResult,
    WhoisPrivacy,
};

pub use providers::common::{normalize_domain, normalize_tld};
pub use providers::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, MAX_RENEWAL_YEARS, PorkbunClient,
    PorkbunClientBuilder,
};

pub use utils::datetime;
pub use utils::log_sanitizer::mask_secret;

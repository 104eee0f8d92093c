//! Porkbun registrar client

mod error;
mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::Credentials;

pub(crate) use types::{AuthCodeResponse, DomainsResponse, PricingResponse, RenewResponse};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://porkbun.com/api/json/v3";
/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default number of retries for transient failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Longest renewal period accepted
pub const MAX_RENEWAL_YEARS: u32 = 10;
/// Page size of `/domain/listAll`
pub(crate) const LIST_ALL_PAGE_SIZE: usize = 1000;

/// Porkbun API client
pub struct PorkbunClient {
    pub(crate) client: Client,
    pub(crate) credentials: Credentials,
    pub(crate) base_url: String,
    pub(crate) max_retries: u32,
}

/// Porkbun client builder
pub struct PorkbunClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    user_agent: String,
}

impl PorkbunClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: format!("porkbun-domain-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the API base URL; a trailing `/` is dropped and an empty value keeps the default.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<PorkbunClient> {
        let client = create_http_client("porkbun", self.timeout, &self.user_agent)?;
        log::debug!(
            "HTTP client initialized: base_url={}, timeout={:?}, api_key={}",
            self.base_url,
            self.timeout,
            self.credentials.masked_api_key()
        );
        Ok(PorkbunClient {
            client,
            credentials: self.credentials,
            base_url: self.base_url,
            max_retries: self.max_retries,
        })
    }
}

impl PorkbunClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> PorkbunClientBuilder {
        PorkbunClientBuilder::new(credentials)
    }
}

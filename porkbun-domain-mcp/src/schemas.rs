//! MCP tool parameter schemas
//!
//! Defines the input parameter structures for all MCP tools.
//! All structs derive `Debug`, `Deserialize`, and `JsonSchema` as required by rmcp.

use schemars::JsonSchema;
use serde::Deserialize;

/// Renewal period used when `renew_domain` is called without `years`.
pub const DEFAULT_RENEWAL_YEARS: u32 = 1;

/// Parameters for `list_domains` tool.
///
/// This tool takes no parameters, but we need an empty struct for the schema.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDomainsParams {}

/// Parameters for tools that act on a single domain
/// (`get_domain_info`, `get_auth_code`).
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DomainParams {
    /// Domain name (e.g. `example.com`).
    #[schemars(description = "Domain name (e.g., 'example.com')")]
    pub domain: String,
}

/// Parameters for `renew_domain` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenewDomainParams {
    /// Domain name (e.g. `example.com`).
    #[schemars(description = "Domain name (e.g., 'example.com')")]
    pub domain: String,

    /// Number of years to renew (1-10, default: 1).
    #[schemars(description = "Number of years to renew (1-10, default: 1)")]
    pub years: Option<u32>,
}

impl RenewDomainParams {
    pub fn years(&self) -> u32 {
        self.years.unwrap_or(DEFAULT_RENEWAL_YEARS)
    }
}

/// Parameters for `get_pricing` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetPricingParams {
    /// Optional TLD filter.
    #[schemars(
        description = "Optional TLD to filter by (e.g., 'com', 'net'). If not provided, returns pricing for all TLDs"
    )]
    pub tld: Option<String>,
}

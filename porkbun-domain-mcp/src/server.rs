//! MCP Server implementation for Porkbun domain management.
//!
//! Exposes 5 tools for AI agents to inspect, renew and price domains.

use std::future::Future;
use std::sync::Arc;

use porkbun_domain_provider::{DomainRegistrar, ProviderError};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tokio::time::{Duration, timeout};

use crate::response::{DomainView, PricingView, ToolResponse};
use crate::schemas::{DomainParams, GetPricingParams, ListDomainsParams, RenewDomainParams};

/// Message and recovery hints returned when a tool fails.
struct Failure {
    message: String,
    next_steps: &'static [&'static str],
}

impl Failure {
    fn new(message: impl Into<String>, next_steps: &'static [&'static str]) -> Self {
        Self {
            message: message.into(),
            next_steps,
        }
    }
}

/// Sanitize error messages to prevent sensitive information leakage.
///
/// Logs the full error to stderr but returns a generic message to the client.
fn sanitize_internal_error(error: impl std::fmt::Display, context: &str) -> McpError {
    tracing::error!("{context} error: {error}");
    McpError::internal_error(
        format!("{context} failed - check server logs for details"),
        None,
    )
}

fn log_registrar_error(tool_name: &str, error: &ProviderError) {
    if error.is_expected() {
        tracing::warn!(tool = tool_name, details = %error.to_details(), "{error}");
    } else {
        tracing::error!(tool = tool_name, details = %error.to_details(), "{error}");
    }
}

/// Serialize a tool response; failures are flagged as tool errors.
fn respond(response: &ToolResponse, tool_name: &str) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| sanitize_internal_error(e, &format!("Serialize {tool_name} result")))?;

    let content = vec![Content::text(json)];
    Ok(if response.success {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    })
}

/// Execute a registrar operation with timeout, error logging, and response shaping.
async fn run_registrar_tool<T>(
    tool_name: &str,
    duration: Duration,
    future: impl Future<Output = porkbun_domain_provider::Result<T>>,
    on_success: impl FnOnce(T) -> ToolResponse,
    failure: Failure,
) -> Result<CallToolResult, McpError> {
    let error = match timeout(duration, future).await {
        Ok(Ok(value)) => return respond(&on_success(value), tool_name),
        Ok(Err(e)) => {
            log_registrar_error(tool_name, &e);
            e.to_string()
        }
        Err(_) => {
            tracing::error!(tool = tool_name, "timed out after {duration:?}");
            format!("{tool_name} timed out")
        }
    };

    respond(
        &ToolResponse::failure(failure.message, error, failure.next_steps),
        tool_name,
    )
}

/// MCP Server for Porkbun domain management.
///
/// Provides AI agents with access to a Porkbun account
/// through the Model Context Protocol.
#[derive(Clone)]
pub struct PorkbunDomainMcp {
    /// Registrar the tools delegate to.
    registrar: Arc<dyn DomainRegistrar>,
    /// Timeout for each registrar call.
    tool_timeout: Duration,
    /// Tool router generated by macro.
    tool_router: ToolRouter<Self>,
}

impl PorkbunDomainMcp {
    /// Create a new MCP server instance.
    ///
    /// `tool_timeout` bounds each registrar call, retries included.
    #[must_use]
    pub fn new(registrar: Arc<dyn DomainRegistrar>, tool_timeout: Duration) -> Self {
        Self {
            registrar,
            tool_timeout,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PorkbunDomainMcp {
    /// List all domains in the account.
    #[tool(
        description = "List all domains in your Porkbun account, with status, expiration date, auto-renew and WHOIS privacy"
    )]
    async fn list_domains(
        &self,
        _params: Parameters<ListDomainsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Listing domains");

        run_registrar_tool(
            "list_domains",
            self.tool_timeout,
            self.registrar.list_domains(),
            |domains| {
                let views: Vec<DomainView> = domains.iter().map(DomainView::from).collect();
                ToolResponse::success(
                    format!("Found {} domains in your account", views.len()),
                    json!({ "count": views.len(), "domains": views }),
                    &[
                        "Use get_domain_info for details on a specific domain",
                        "Use get_pricing to check renewal costs",
                        "Use renew_domain to extend registration",
                    ],
                )
            },
            Failure::new(
                "Failed to list domains",
                &[
                    "Verify your API credentials are valid",
                    "Check network connectivity",
                ],
            ),
        )
        .await
    }

    /// Get details of one domain.
    #[tool(description = "Get detailed information for a specific domain in your Porkbun account")]
    async fn get_domain_info(
        &self,
        Parameters(params): Parameters<DomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let domain = params.domain;
        tracing::info!(domain = %domain, "Getting domain info");

        run_registrar_tool(
            "get_domain_info",
            self.tool_timeout,
            self.registrar.get_domain_info(&domain),
            |info| {
                ToolResponse::success(
                    format!("Retrieved information for {domain}"),
                    json!({ "domain": DomainView::from(&info) }),
                    &[
                        "Use get_auth_code to get transfer authorization",
                        "Use renew_domain to extend registration",
                    ],
                )
            },
            Failure::new(
                format!("Failed to get info for {domain}"),
                &[
                    "Verify the domain name is correct",
                    "Ensure the domain is in your account",
                    "Use list_domains to see all your domains",
                ],
            ),
        )
        .await
    }

    /// Get the transfer authorization code.
    #[tool(
        description = "Get the transfer authorization code (EPP code) for a domain. The code is required to transfer the domain to another registrar; keep it secure"
    )]
    async fn get_auth_code(
        &self,
        Parameters(params): Parameters<DomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let domain = params.domain;
        tracing::info!(domain = %domain, "Getting auth code");

        run_registrar_tool(
            "get_auth_code",
            self.tool_timeout,
            self.registrar.get_auth_code(&domain),
            |code| {
                ToolResponse::success(
                    format!("Retrieved auth code for {domain}"),
                    json!({ "domain": code.domain, "auth_code": code.auth_code }),
                    &[
                        "Provide this code to the gaining registrar",
                        "Unlock the domain at Porkbun before transfer",
                        "Verify the admin email is correct for transfer approval",
                    ],
                )
            },
            Failure::new(
                format!("Failed to get auth code for {domain}"),
                &[
                    "Verify the domain is in your account",
                    "Check if the domain is eligible for transfer",
                ],
            ),
        )
        .await
    }

    /// Renew a domain registration.
    #[tool(
        description = "Renew a domain registration for 1-10 years (default: 1). Charges the account balance"
    )]
    async fn renew_domain(
        &self,
        Parameters(params): Parameters<RenewDomainParams>,
    ) -> Result<CallToolResult, McpError> {
        let years = params.years();
        let domain = params.domain;
        tracing::info!(domain = %domain, years, "Renewing domain");

        run_registrar_tool(
            "renew_domain",
            self.tool_timeout,
            self.registrar.renew_domain(&domain, years),
            |result| {
                ToolResponse::success(
                    format!("Renewed {domain} for {years} year(s)"),
                    json!(result),
                    &[
                        "Check the new expiration date",
                        "Verify auto-renew is configured if desired",
                    ],
                )
            },
            Failure::new(
                format!("Failed to renew {domain}"),
                &[
                    "Verify the domain is in your account",
                    "Check if the domain is eligible for renewal",
                    "Ensure you have sufficient account balance",
                ],
            ),
        )
        .await
    }

    /// Get TLD pricing.
    #[tool(
        description = "Get registration, renewal and transfer pricing for TLDs, optionally for a single TLD. Works without API credentials"
    )]
    async fn get_pricing(
        &self,
        Parameters(params): Parameters<GetPricingParams>,
    ) -> Result<CallToolResult, McpError> {
        let tld = params.tld;
        tracing::info!(tld = ?tld, "Getting pricing");

        run_registrar_tool(
            "get_pricing",
            self.tool_timeout,
            self.registrar.get_pricing(tld.as_deref()),
            |pricing| {
                let list: Vec<PricingView> = pricing.into_values().map(PricingView::from).collect();
                ToolResponse::success(
                    format!("Retrieved pricing for {} TLD(s)", list.len()),
                    json!({ "count": list.len(), "pricing": list }),
                    &[
                        "Compare prices across TLDs",
                        "Use this info to plan domain registrations",
                    ],
                )
            },
            Failure::new(
                "Failed to get pricing information",
                &["Try again later", "Check network connectivity"],
            ),
        )
        .await
    }
}

#[tool_handler]
impl ServerHandler for PorkbunDomainMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Porkbun Domain MCP Server - Manage domains registered at Porkbun. \
                 Use list_domains to see the domains in your account, get_domain_info for details, \
                 get_auth_code to obtain a transfer code and renew_domain to extend a registration. \
                 get_pricing shows TLD prices and works without API credentials. \
                 Every tool returns JSON with success, message, data, error and next_steps."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_mocks;

#[cfg(test)]
#[path = "server_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests;

#[cfg(test)]
#[path = "client_integration_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod client_integration_tests;

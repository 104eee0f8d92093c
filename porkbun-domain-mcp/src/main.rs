//! MCP Server entry point for Porkbun domain management
//!
//! Serves the MCP tools over stdio by default, or over streamable HTTP when
//! `--http` is given or `enable_http_transport` is set.
//!
//! # Credentials
//!
//! The Porkbun key pair is read from `PORKBUN_DOMAIN_API_KEY` and
//! `PORKBUN_DOMAIN_SECRET_KEY` (or the settings files). Without it only
//! `get_pricing` works.

mod health;
mod logging;
mod response;
mod schemas;
mod server;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use health::HealthSnapshot;
use rmcp::ServiceExt;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use server::PorkbunDomainMcp;
use settings::Settings;

#[derive(Parser)]
#[command(name = "porkbun-domain-mcp")]
#[command(version, about = "MCP server for Porkbun domain management")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server (default)
    Serve(ServeArgs),
    /// Print a health snapshot as JSON
    Health,
    /// Print the effective settings with secrets masked
    Config,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Serve streamable HTTP instead of stdio
    #[arg(long)]
    http: bool,

    /// HTTP bind address (overrides settings)
    #[arg(long)]
    host: Option<String>,

    /// HTTP port (overrides settings)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => serve(settings, args).await,
        Commands::Health => print_json(&HealthSnapshot::from_settings(&settings)),
        Commands::Config => print_json(&settings.redacted()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn serve(mut settings: Settings, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.http_host = host;
    }
    if let Some(port) = args.port {
        settings.http_port = port;
    }
    let http = args.http || settings.enable_http_transport;

    logging::init(&settings).context("failed to initialise logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        http_transport = http,
        api_url = %settings.base_url,
        "Starting Porkbun Domain MCP server"
    );

    if settings.has_credentials() {
        tracing::info!(api_key = %settings.masked_api_key(), "API credentials configured");
    } else {
        tracing::warn!(
            "API credentials not configured. Set PORKBUN_DOMAIN_API_KEY and \
             PORKBUN_DOMAIN_SECRET_KEY environment variables. Only get_pricing will work."
        );
    }

    let client = settings
        .build_client()
        .context("failed to build Porkbun client")?;
    let tool_timeout = settings.tool_timeout();
    let mcp_server = PorkbunDomainMcp::new(Arc::new(client), tool_timeout);

    tracing::info!(?tool_timeout, "MCP server initialized with 5 tools");

    if http {
        serve_http(mcp_server, &settings).await
    } else {
        serve_stdio(mcp_server).await
    }
}

async fn serve_stdio(mcp_server: PorkbunDomainMcp) -> anyhow::Result<()> {
    tracing::info!("Starting MCP server on stdio transport");

    let service = mcp_server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;

    let reason = service.waiting().await.context("MCP server error")?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}

async fn serve_http(mcp_server: PorkbunDomainMcp, settings: &Settings) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.http_host, settings.http_port);

    let service = StreamableHttpService::new(
        move || Ok(mcp_server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Starting MCP server on http://{addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

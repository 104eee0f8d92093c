//! Tracing setup
//!
//! Logs always go to stderr: stdout carries the MCP protocol in stdio mode.
//! `RUST_LOG`, when set, replaces the configured level. Records emitted through
//! the `log` crate (the provider crate) are forwarded into tracing.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

/// Map a configured level name onto a tracing filter directive.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

fn env_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&settings.log_level)))
}

/// Install the global subscriber.
pub fn init(settings: &Settings) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(settings));

    if settings.log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()
    }
}

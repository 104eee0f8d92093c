//! Health snapshot printed by the `health` command.

use serde::Serialize;

use crate::settings::Settings;

pub const SERVER_NAME: &str = "porkbun-domain-mcp";

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub server_name: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub credentials_configured: bool,
    pub api_url: String,
}

impl HealthSnapshot {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            server_name: SERVER_NAME,
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            credentials_configured: settings.has_credentials(),
            api_url: settings.base_url.clone(),
        }
    }
}

//! Porkbun wire types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Credentials, Domain};

/// Authentication fields merged into every request body
#[derive(Debug, Serialize)]
pub struct AuthPayload<'a> {
    pub apikey: &'a str,
    pub secretapikey: &'a str,
}

impl<'a> From<&'a Credentials> for AuthPayload<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            apikey: &credentials.api_key,
            secretapikey: &credentials.secret_key,
        }
    }
}

/// Request body: auth fields plus an endpoint-specific payload
#[derive(Debug, Serialize)]
pub struct AuthedRequest<'a, B: Serialize> {
    #[serde(flatten)]
    pub auth: AuthPayload<'a>,
    #[serde(flatten)]
    pub body: &'a B,
}

/// Status/message envelope shared by all responses
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("SUCCESS")
    }
}

/// `/domain/listAll`
#[derive(Debug, Deserialize)]
pub struct DomainsResponse {
    #[serde(default)]
    pub domains: Option<Vec<Domain>>,
}

/// `/domain/getAuthCode/{domain}`
#[derive(Debug, Deserialize)]
pub struct AuthCodeResponse {
    #[serde(default, alias = "authcode", alias = "auth_code")]
    #[serde(rename = "authCode")]
    pub auth_code: Option<String>,
}

/// `/domain/renew/{domain}`
#[derive(Debug, Deserialize)]
pub struct RenewResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "expireDate", alias = "expire_date")]
    #[serde(rename = "newExpireDate")]
    pub new_expire_date: Option<String>,
}

/// `/pricing/get`
#[derive(Debug, Deserialize)]
pub struct PricingResponse {
    #[serde(default)]
    pub pricing: HashMap<String, PricingEntry>,
}

/// Prices of one TLD; the API sends strings, numbers are tolerated
#[derive(Debug, Deserialize)]
pub struct PricingEntry {
    #[serde(default)]
    pub registration: Option<serde_json::Value>,
    #[serde(default)]
    pub renewal: Option<serde_json::Value>,
    #[serde(default)]
    pub transfer: Option<serde_json::Value>,
}

/// Render a price value as the decimal string the API normally sends.
pub fn price_to_string(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

//! Tool response payloads
//!
//! Every tool answers with a [`ToolResponse`] serialized as JSON text, so the
//! agent always sees the same shape whether the call succeeded or not.

use chrono::{DateTime, Utc};
use porkbun_domain_provider::{Domain, PricingInfo};
use serde::Serialize;
use serde_json::Value;

/// Uniform result of a tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable result message
    pub message: String,
    /// Structured output data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error details if the operation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Suggested follow-up actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
}

impl ToolResponse {
    pub fn success(message: impl Into<String>, data: Value, next_steps: &[&str]) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            next_steps: steps(next_steps),
        }
    }

    pub fn failure(
        message: impl Into<String>,
        error: impl Into<String>,
        next_steps: &[&str],
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
            next_steps: steps(next_steps),
        }
    }
}

fn steps(next_steps: &[&str]) -> Option<Vec<String>> {
    if next_steps.is_empty() {
        None
    } else {
        Some(next_steps.iter().map(ToString::to_string).collect())
    }
}

/// Domain as presented to agents.
#[derive(Debug, Clone, Serialize)]
pub struct DomainView {
    pub domain: String,
    pub status: String,
    pub tld: String,
    pub create_date: Option<DateTime<Utc>>,
    pub expire_date: Option<DateTime<Utc>>,
    pub security_lock: Option<bool>,
    pub whois_privacy: Option<bool>,
    pub auto_renew: Option<bool>,
    pub not_local: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl From<&Domain> for DomainView {
    fn from(domain: &Domain) -> Self {
        Self {
            domain: domain.domain.clone(),
            status: domain.status.to_string(),
            tld: domain.tld.clone(),
            create_date: domain.create_date,
            expire_date: domain.expire_date,
            security_lock: domain.security_lock,
            whois_privacy: domain.whois_privacy,
            auto_renew: domain.auto_renew,
            not_local: domain.not_local,
            labels: domain.labels.iter().map(|l| l.title.clone()).collect(),
        }
    }
}

/// Price list entry as presented to agents.
#[derive(Debug, Clone, Serialize)]
pub struct PricingView {
    pub tld: String,
    pub registration: Option<String>,
    pub renewal: Option<String>,
    pub transfer: Option<String>,
}

impl From<PricingInfo> for PricingView {
    fn from(info: PricingInfo) -> Self {
        Self {
            tld: info.tld,
            registration: info.registration,
            renewal: info.renewal,
            transfer: info.transfer,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use porkbun_domain_provider::{DomainLabel, DomainStatus};

    #[test]
    fn success_omits_error() {
        let response = ToolResponse::success("done", serde_json::json!({ "count": 1 }), &["next"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["count"], 1);
        assert!(json.get("error").is_none());
        assert_eq!(json["next_steps"][0], "next");
    }

    #[test]
    fn failure_omits_data_and_empty_steps() {
        let response = ToolResponse::failure("Failed", "boom", &[]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
        assert!(json.get("next_steps").is_none());
    }

    #[test]
    fn domain_view_uses_snake_case() {
        let domain = Domain {
            domain: "example.com".to_string(),
            status: DomainStatus::Active,
            tld: "com".to_string(),
            create_date: None,
            expire_date: None,
            security_lock: Some(true),
            whois_privacy: Some(true),
            auto_renew: Some(false),
            not_local: None,
            labels: vec![DomainLabel {
                id: "1".to_string(),
                title: "work".to_string(),
                color: "#000000".to_string(),
            }],
        };

        let json = serde_json::to_value(DomainView::from(&domain)).unwrap();

        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["auto_renew"], false);
        assert_eq!(json["security_lock"], true);
        assert!(json["expire_date"].is_null());
        assert_eq!(json["labels"][0], "work");
    }
}

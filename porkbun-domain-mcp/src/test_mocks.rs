use super::*;

use std::collections::BTreeMap;

use async_trait::async_trait;
use porkbun_domain_provider::{
    AuthCode, Domain, DomainStatus, PricingInfo, RenewalResult, Result as ProviderResult,
};
use tokio::sync::Mutex;

/// In-memory registrar recording every call.
#[derive(Default)]
pub struct MockRegistrar {
    domains: Mutex<Vec<Domain>>,
    pricing: Mutex<BTreeMap<String, PricingInfo>>,
    error: Mutex<Option<ProviderError>>,
    delay: Mutex<Option<Duration>>,
    auth_code_calls: Mutex<Vec<String>>,
    renew_calls: Mutex<Vec<(String, u32)>>,
    pricing_calls: Mutex<Vec<Option<String>>>,
}

impl MockRegistrar {
    pub fn with_domains(names: &[&str]) -> Self {
        let mock = Self::default();
        *mock.domains.try_lock().unwrap() = names.iter().map(|n| test_domain(n)).collect();
        *mock.pricing.try_lock().unwrap() = test_pricing();
        mock
    }

    /// Fail every subsequent call with `error`.
    pub async fn fail_with(&self, error: ProviderError) {
        *self.error.lock().await = Some(error);
    }

    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    pub async fn auth_code_calls(&self) -> Vec<String> {
        self.auth_code_calls.lock().await.clone()
    }

    pub async fn renew_calls(&self) -> Vec<(String, u32)> {
        self.renew_calls.lock().await.clone()
    }

    pub async fn pricing_calls(&self) -> Vec<Option<String>> {
        self.pricing_calls.lock().await.clone()
    }

    async fn check(&self) -> ProviderResult<()> {
        if let Some(delay) = *self.delay.lock().await {
            tokio::time::sleep(delay).await;
        }
        match self.error.lock().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DomainRegistrar for MockRegistrar {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn base_url(&self) -> &str {
        "http://mock.invalid"
    }

    fn has_credentials(&self) -> bool {
        true
    }

    async fn list_domains(&self) -> ProviderResult<Vec<Domain>> {
        self.check().await?;
        Ok(self.domains.lock().await.clone())
    }

    async fn get_domain_info(&self, domain: &str) -> ProviderResult<Domain> {
        self.check().await?;
        self.domains
            .lock()
            .await
            .iter()
            .find(|d| d.domain == domain)
            .cloned()
            .ok_or_else(|| not_found(domain))
    }

    async fn get_auth_code(&self, domain: &str) -> ProviderResult<AuthCode> {
        self.auth_code_calls.lock().await.push(domain.to_string());
        self.check().await?;
        Ok(AuthCode {
            domain: domain.to_string(),
            auth_code: "Xy7#pQ-mock".to_string(),
        })
    }

    async fn renew_domain(&self, domain: &str, years: u32) -> ProviderResult<RenewalResult> {
        self.renew_calls
            .lock()
            .await
            .push((domain.to_string(), years));
        self.check().await?;
        Ok(RenewalResult {
            domain: domain.to_string(),
            years,
            success: true,
            message: "Domain renewed successfully".to_string(),
            new_expire_date: None,
        })
    }

    async fn get_pricing(&self, tld: Option<&str>) -> ProviderResult<BTreeMap<String, PricingInfo>> {
        self.pricing_calls
            .lock()
            .await
            .push(tld.map(ToString::to_string));
        self.check().await?;
        let pricing = self.pricing.lock().await.clone();
        Ok(match tld {
            Some(tld) => pricing.into_iter().filter(|(k, _)| k == tld).collect(),
            None => pricing,
        })
    }
}

pub fn not_found(domain: &str) -> ProviderError {
    ProviderError::DomainNotFound {
        provider: "mock".to_string(),
        domain: domain.to_string(),
        raw_message: None,
    }
}

pub fn test_domain(name: &str) -> Domain {
    Domain {
        domain: name.to_string(),
        status: DomainStatus::Active,
        tld: name.rsplit('.').next().unwrap_or_default().to_string(),
        create_date: None,
        expire_date: None,
        security_lock: Some(true),
        whois_privacy: Some(true),
        auto_renew: Some(false),
        not_local: Some(false),
        labels: Vec::new(),
    }
}

pub fn test_pricing() -> BTreeMap<String, PricingInfo> {
    ["com", "dev"]
        .into_iter()
        .map(|tld| {
            (
                tld.to_string(),
                PricingInfo {
                    tld: tld.to_string(),
                    registration: Some("9.68".to_string()),
                    renewal: Some("10.37".to_string()),
                    transfer: Some("9.68".to_string()),
                },
            )
        })
        .collect()
}

pub(super) fn build_server(registrar: Arc<MockRegistrar>) -> PorkbunDomainMcp {
    PorkbunDomainMcp::new(registrar, Duration::from_secs(60))
}

pub(super) fn build_server_with_timeout(
    registrar: Arc<MockRegistrar>,
    tool_timeout: Duration,
) -> PorkbunDomainMcp {
    PorkbunDomainMcp::new(registrar, tool_timeout)
}

/// Parse the JSON text of a tool result.
pub fn response_json(result: &CallToolResult) -> serde_json::Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .unwrap();
    serde_json::from_str(text).unwrap()
}

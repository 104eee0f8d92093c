//! Porkbun `DomainRegistrar` implementation

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain, normalize_tld};
use crate::traits::{DomainRegistrar, ErrorContext, ProviderErrorMapper};
use crate::types::{AuthCode, Domain, PricingInfo, RenewalResult};
use crate::utils::datetime::parse_timestamp;

use super::http::{Auth, Retry};
use super::types::price_to_string;
use super::{
    AuthCodeResponse, DomainsResponse, LIST_ALL_PAGE_SIZE, MAX_RENEWAL_YEARS, PorkbunClient,
    PricingResponse, RenewResponse,
};

#[derive(Serialize)]
struct NoBody {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListAllBody {
    start: usize,
    include_labels: &'static str,
}

#[derive(Serialize)]
struct RenewBody {
    years: u32,
}

#[async_trait]
impl DomainRegistrar for PorkbunClient {
    fn id(&self) -> &'static str {
        self.provider_name()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn has_credentials(&self) -> bool {
        self.credentials.is_configured()
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        log::debug!("Listing domains");

        let mut all = Vec::new();
        loop {
            let body = ListAllBody {
                start: all.len(),
                include_labels: "yes",
            };
            let page: DomainsResponse = self
                .request(
                    "/domain/listAll",
                    &body,
                    Auth::Required,
                    Retry::Transient,
                    ErrorContext::default(),
                )
                .await?;

            let domains = page.domains.unwrap_or_default();
            let fetched = domains.len();
            all.extend(domains);

            if fetched < LIST_ALL_PAGE_SIZE {
                break;
            }
        }

        log::debug!("Listed {} domains", all.len());
        Ok(all)
    }

    async fn get_domain_info(&self, domain: &str) -> Result<Domain> {
        let domain = normalize_domain(domain, self.provider_name())?;
        log::debug!("Getting domain info: {domain}");

        // No single-domain endpoint; scan the account listing
        self.list_domains()
            .await?
            .into_iter()
            .find(|d| d.domain.eq_ignore_ascii_case(&domain))
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain,
                raw_message: None,
            })
    }

    async fn get_auth_code(&self, domain: &str) -> Result<AuthCode> {
        let domain = normalize_domain(domain, self.provider_name())?;
        log::debug!("Getting auth code: {domain}");

        let response: AuthCodeResponse = self
            .request(
                &format!("/domain/getAuthCode/{domain}"),
                &NoBody {},
                Auth::Required,
                Retry::Transient,
                ErrorContext::domain(&domain),
            )
            .await?;

        Ok(AuthCode {
            domain,
            auth_code: response.auth_code.unwrap_or_default(),
        })
    }

    async fn renew_domain(&self, domain: &str, years: u32) -> Result<RenewalResult> {
        let domain = normalize_domain(domain, self.provider_name())?;
        if !(1..=MAX_RENEWAL_YEARS).contains(&years) {
            return Err(self.invalid_parameter(
                "years",
                format!("must be between 1 and {MAX_RENEWAL_YEARS}, got {years}"),
            ));
        }
        log::debug!("Renewing domain: {domain} for {years} year(s)");

        // A renewal is charged; never resend one the server may already have processed
        let response: RenewResponse = self
            .request(
                &format!("/domain/renew/{domain}"),
                &RenewBody { years },
                Auth::Required,
                Retry::Never,
                ErrorContext::domain(&domain),
            )
            .await?;

        Ok(RenewalResult {
            domain,
            years,
            success: true,
            message: response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Domain renewed successfully".to_string()),
            new_expire_date: response.new_expire_date.as_deref().and_then(parse_timestamp),
        })
    }

    async fn get_pricing(&self, tld: Option<&str>) -> Result<BTreeMap<String, PricingInfo>> {
        let tld = tld.map(normalize_tld).filter(|t| !t.is_empty());
        log::debug!("Getting pricing: tld={tld:?}");

        let response: PricingResponse = self
            .request(
                "/pricing/get",
                &NoBody {},
                Auth::Optional,
                Retry::Transient,
                ErrorContext::default(),
            )
            .await?;

        let pricing = response
            .pricing
            .into_iter()
            .filter(|(key, _)| tld.as_deref().is_none_or(|t| key.eq_ignore_ascii_case(t)))
            .map(|(key, entry)| {
                let info = PricingInfo {
                    tld: key.clone(),
                    registration: price_to_string(entry.registration),
                    renewal: price_to_string(entry.renewal),
                    transfer: price_to_string(entry.transfer),
                };
                (key, info)
            })
            .collect();

        Ok(pricing)
    }
}

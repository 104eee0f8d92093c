use super::test_mocks::*;
use super::*;

use crate::schemas::{DomainParams, GetPricingParams, ListDomainsParams, RenewDomainParams};

fn domain_params(domain: &str) -> Parameters<DomainParams> {
    Parameters(DomainParams {
        domain: domain.to_string(),
    })
}

#[test]
fn sanitize_internal_error_hides_error_details() {
    let error = sanitize_internal_error("sensitive: secretapikey=sk1_abc", "Serialize renew_domain result");
    let message = error.to_string();
    assert!(message.contains("Serialize renew_domain result failed"));
    assert!(!message.contains("sk1_abc"));
}

#[tokio::test]
async fn list_domains_returns_count_and_views() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com", "example.dev"]));
    let server = build_server(registrar);

    let result = server
        .list_domains(Parameters(ListDomainsParams {}))
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    let json = response_json(&result);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Found 2 domains in your account");
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["domains"][1]["tld"], "dev");
    assert_eq!(json["data"]["domains"][0]["auto_renew"], false);
    assert_eq!(json["next_steps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_domains_failure_is_tool_error_with_hints() {
    let registrar = Arc::new(MockRegistrar::default());
    registrar
        .fail_with(ProviderError::MissingCredentials {
            provider: "porkbun".to_string(),
        })
        .await;
    let server = build_server(registrar);

    let result = server
        .list_domains(Parameters(ListDomainsParams {}))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let json = response_json(&result);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Failed to list domains");
    assert_eq!(json["error"], "[porkbun] API credentials are not configured");
    assert_eq!(
        json["next_steps"][0],
        "Verify your API credentials are valid"
    );
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn get_domain_info_wraps_domain() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    let server = build_server(registrar);

    let result = server
        .get_domain_info(domain_params("example.com"))
        .await
        .unwrap();

    let json = response_json(&result);
    assert_eq!(json["message"], "Retrieved information for example.com");
    assert_eq!(json["data"]["domain"]["domain"], "example.com");
    assert_eq!(json["data"]["domain"]["status"], "ACTIVE");
}

#[tokio::test]
async fn get_domain_info_missing_domain() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    let server = build_server(registrar);

    let result = server
        .get_domain_info(domain_params("missing.org"))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let json = response_json(&result);
    assert_eq!(json["message"], "Failed to get info for missing.org");
    assert!(json["error"].as_str().unwrap().contains("missing.org"));
    assert_eq!(json["next_steps"][2], "Use list_domains to see all your domains");
}

#[tokio::test]
async fn get_auth_code_returns_code() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    let server = build_server(Arc::clone(&registrar));

    let result = server
        .get_auth_code(domain_params("example.com"))
        .await
        .unwrap();

    let json = response_json(&result);
    assert_eq!(json["message"], "Retrieved auth code for example.com");
    assert_eq!(json["data"]["auth_code"], "Xy7#pQ-mock");
    assert_eq!(registrar.auth_code_calls().await, vec!["example.com".to_string()]);
}

#[tokio::test]
async fn renew_domain_defaults_to_one_year() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    let server = build_server(Arc::clone(&registrar));

    let result = server
        .renew_domain(Parameters(RenewDomainParams {
            domain: "example.com".to_string(),
            years: None,
        }))
        .await
        .unwrap();

    let json = response_json(&result);
    assert_eq!(json["message"], "Renewed example.com for 1 year(s)");
    assert_eq!(json["data"]["years"], 1);
    assert_eq!(json["data"]["success"], true);
    assert_eq!(
        registrar.renew_calls().await,
        vec![("example.com".to_string(), 1)]
    );
}

#[tokio::test]
async fn renew_domain_insufficient_funds_is_reported() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    registrar
        .fail_with(ProviderError::InsufficientFunds {
            provider: "porkbun".to_string(),
            raw_message: Some("Insufficient funds.".to_string()),
        })
        .await;
    let server = build_server(Arc::clone(&registrar));

    let result = server
        .renew_domain(Parameters(RenewDomainParams {
            domain: "example.com".to_string(),
            years: Some(3),
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let json = response_json(&result);
    assert_eq!(json["message"], "Failed to renew example.com");
    assert!(json["error"].as_str().unwrap().contains("Insufficient funds"));
    assert_eq!(
        json["next_steps"][2],
        "Ensure you have sufficient account balance"
    );
    assert_eq!(
        registrar.renew_calls().await,
        vec![("example.com".to_string(), 3)]
    );
}

#[tokio::test]
async fn get_pricing_lists_all_tlds() {
    let registrar = Arc::new(MockRegistrar::with_domains(&[]));
    let server = build_server(Arc::clone(&registrar));

    let result = server
        .get_pricing(Parameters(GetPricingParams { tld: None }))
        .await
        .unwrap();

    let json = response_json(&result);
    assert_eq!(json["message"], "Retrieved pricing for 2 TLD(s)");
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["pricing"][0]["tld"], "com");
    assert_eq!(json["data"]["pricing"][0]["renewal"], "10.37");
    assert_eq!(registrar.pricing_calls().await, vec![None]);
}

#[tokio::test]
async fn get_pricing_passes_tld_filter() {
    let registrar = Arc::new(MockRegistrar::with_domains(&[]));
    let server = build_server(Arc::clone(&registrar));

    let result = server
        .get_pricing(Parameters(GetPricingParams {
            tld: Some("dev".to_string()),
        }))
        .await
        .unwrap();

    let json = response_json(&result);
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(
        registrar.pricing_calls().await,
        vec![Some("dev".to_string())]
    );
}

#[tokio::test]
async fn slow_registrar_times_out() {
    let registrar = Arc::new(MockRegistrar::with_domains(&["example.com"]));
    registrar.set_delay(Some(Duration::from_millis(50))).await;
    let server = build_server_with_timeout(registrar, Duration::from_millis(5));

    let result = server
        .list_domains(Parameters(ListDomainsParams {}))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let json = response_json(&result);
    assert_eq!(json["error"], "list_domains timed out");
    assert_eq!(json["message"], "Failed to list domains");
}

#[tokio::test]
async fn get_info_contains_expected_instructions() {
    let server = build_server(Arc::new(MockRegistrar::default()));

    let info = server.get_info();

    assert_eq!(info.protocol_version, ProtocolVersion::LATEST);
    assert!(info.capabilities.tools.is_some());
    let instructions = info.instructions.unwrap_or_default();
    assert!(instructions.contains("list_domains"));
    assert!(instructions.contains("without API credentials"));
}

#[tokio::test]
async fn run_registrar_tool_success_returns_json() {
    let future = async { Ok::<_, ProviderError>("hello".to_string()) };
    let result = run_registrar_tool(
        "test tool",
        Duration::from_secs(1),
        future,
        |value| ToolResponse::success("ok", serde_json::json!({ "value": value }), &[]),
        Failure::new("failed", &[]),
    )
    .await
    .unwrap();

    assert_ne!(result.is_error, Some(true));
    assert_eq!(response_json(&result)["data"]["value"], "hello");
}

#[tokio::test]
async fn run_registrar_tool_error_keeps_provider_message() {
    let future = async {
        Err::<String, _>(ProviderError::NetworkError {
            provider: "porkbun".to_string(),
            detail: "conn refused".to_string(),
        })
    };
    let result = run_registrar_tool(
        "fail tool",
        Duration::from_secs(1),
        future,
        |_| ToolResponse::success("unreachable", serde_json::Value::Null, &[]),
        Failure::new("failed", &["retry"]),
    )
    .await
    .unwrap();

    assert_eq!(result.is_error, Some(true));
    let json = response_json(&result);
    assert!(json["error"].as_str().unwrap().contains("conn refused"));
    assert_eq!(json["next_steps"][0], "retry");
}

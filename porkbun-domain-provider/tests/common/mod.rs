//! Shared test utilities: an in-process Porkbun stub and live-test helpers

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use porkbun_domain_provider::{Credentials, PorkbunClient};
use serde_json::Value;

/// Skip a test when an environment variable is missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// A canned response served by the stub.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<u64>,
}

impl StubResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            retry_after: None,
        }
    }

    pub fn success(extra: &Value) -> Self {
        let mut body = serde_json::json!({ "status": "SUCCESS" });
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        Self::json(200, &body)
    }

    pub fn api_error(message: &str) -> Self {
        Self::json(
            400,
            &serde_json::json!({ "status": "ERROR", "message": message }),
        )
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            retry_after: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            status: 429,
            body: "Too Many Requests".to_string(),
            retry_after: Some(retry_after),
        }
    }
}

/// A request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
pub struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    /// Responses per path; the last one is repeated once the queue drains.
    responses: Mutex<HashMap<String, VecDeque<StubResponse>>>,
}

/// In-process HTTP server standing in for the Porkbun API.
pub struct StubServer {
    pub base_url: String,
    state: Arc<StubState>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .fallback(handle_request)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Queue responses for a path, served in order.
    pub fn respond(&self, path: &str, responses: Vec<StubResponse>) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), responses.into());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Client pointed at the stub with short timeouts.
    pub fn client(&self, credentials: Credentials, max_retries: u32) -> PorkbunClient {
        PorkbunClient::builder(credentials)
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(5))
            .max_retries(max_retries)
            .build()
            .unwrap()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_request(State(state): State<Arc<StubState>>, uri: Uri, body: String) -> Response {
    let path = uri.path().to_string();
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        body: json,
    });

    let next = {
        let mut responses = state.responses.lock().unwrap();
        responses.get_mut(&path).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    let Some(stub) = next else {
        return (
            StatusCode::NOT_FOUND,
            r#"{"status":"ERROR","message":"No stub for path"}"#.to_string(),
        )
            .into_response();
    };

    let mut headers = HeaderMap::new();
    if let Some(secs) = stub.retry_after {
        headers.insert("retry-after", HeaderValue::from(secs));
    }
    let status = StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, headers, stub.body).into_response()
}

/// A `/domain/listAll` entry.
pub fn domain_entry(name: &str) -> Value {
    let tld = name.rsplit('.').next().unwrap_or_default();
    serde_json::json!({
        "domain": name,
        "status": "ACTIVE",
        "tld": tld,
        "createDate": "2020-01-01 00:00:00",
        "expireDate": "2030-01-01 00:00:00",
        "securityLock": "1",
        "whoisPrivacy": "1",
        "autoRenew": 0,
        "notLocal": 0,
        "labels": []
    })
}

pub fn test_credentials() -> Credentials {
    Credentials::new("pk1_test0000key", "sk1_test0000secret")
}

/// Client for the live API, when credentials are present.
pub fn live_client() -> Option<PorkbunClient> {
    let api_key = env::var("PORKBUN_API_KEY").ok()?;
    let secret_key = env::var("PORKBUN_SECRET_KEY").ok()?;
    let mut builder = PorkbunClient::builder(Credentials::new(api_key, secret_key));
    if let Ok(base_url) = env::var("PORKBUN_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    builder.build().ok()
}

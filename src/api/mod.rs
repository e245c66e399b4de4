//! Shared HTTP plumbing for the VoyageView backend.
//!
//! Every feature client goes through [`ApiClient`] so request setup stays in
//! one place: base-URL validation, the bearer header, a bounded timeout on
//! all outbound calls, consistent error classification, and retry with
//! jittered backoff for idempotent GETs only.

pub mod error;

pub use error::ApiError;

use rand::{rngs::StdRng, Rng, SeedableRng};
use reqwest::{multipart::Form, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info_span, warn, Instrument};
use url::Url;

/// Timeout applied to every outbound request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Attempts for idempotent GETs, first try included.
const GET_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    retry_base: Duration,
}

impl ApiClient {
    /// Build a client for the given API base URL.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the URL cannot be parsed, has no host,
    /// or uses a scheme other than http/https.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid API URL {base_url}: {e}")))?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ApiError::Config(format!("unsupported scheme {scheme}")));
        }

        if url.host().is_none() {
            return Err(ApiError::Config("no host specified".to_string()));
        }

        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_base: Duration::from_millis(500),
        })
    }

    /// Override the first retry delay, mainly for tests.
    #[must_use]
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET a JSON payload, retrying transport failures with jittered
    /// exponential backoff. Only GETs are retried; nothing else is idempotent
    /// from the backend's point of view.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut rng = StdRng::from_entropy();

        for attempt in 1..=GET_ATTEMPTS {
            let span = info_span!("api.get", http.method = "GET", url = %url);
            let result = async {
                let response = Self::bearer(self.http.get(&url), token).send().await?;
                parse_json(response).await
            }
            .instrument(span)
            .await;

            match result {
                Err(err) if err.is_transport() && attempt < GET_ATTEMPTS => {
                    let backoff = self.retry_base * 2u32.pow(attempt - 1);
                    let jittered = backoff.mul_f64(rng.gen_range(0.7..1.0));

                    warn!("GET {} failed ({}), retrying in {:?}", url, err, jittered);

                    sleep(jittered).await;
                }
                other => return other,
            }
        }

        Err(ApiError::Network("retries exhausted".to_string()))
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        let span = info_span!("api.post", http.method = "POST", url = %url);
        let response = Self::bearer(self.http.post(&url), token)
            .json(body)
            .send()
            .instrument(span)
            .await?;

        parse_json(response).await
    }

    /// POST a JSON body where only the status matters.
    pub async fn post_json_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.url(path);

        let span = info_span!("api.post", http.method = "POST", url = %url);
        let response = Self::bearer(self.http.post(&url), token)
            .json(body)
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await
    }

    /// POST with an empty body, used by the like/follow toggles.
    pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.url(path);

        let span = info_span!("api.post", http.method = "POST", url = %url);
        let response = Self::bearer(self.http.post(&url), token)
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        let span = info_span!("api.post", http.method = "POST", url = %url);
        let response = Self::bearer(self.http.post(&url), token)
            .multipart(form)
            .send()
            .instrument(span)
            .await?;

        parse_json(response).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        let span = info_span!("api.put", http.method = "PUT", url = %url);
        let response = Self::bearer(self.http.put(&url), token)
            .multipart(form)
            .send()
            .instrument(span)
            .await?;

        parse_json(response).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);

        let span = info_span!("api.put", http.method = "PUT", url = %url);
        let response = Self::bearer(self.http.put(&url), token)
            .json(body)
            .send()
            .instrument(span)
            .await?;

        parse_json(response).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.url(path);

        let span = info_span!("api.delete", http.method = "DELETE", url = %url);
        let response = Self::bearer(self.http.delete(&url), token)
            .send()
            .instrument(span)
            .await?;

        expect_success(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.status().is_success() {
        debug!("response status: {}", response.status());

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    } else {
        Err(classify(response).await)
    }
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(classify(response).await)
    }
}

/// Map a non-2xx response into the error taxonomy: 401/403 mean the session
/// must be re-established, 5xx is a server fault, anything else carries a
/// field-level message for the user.
async fn classify(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        return ApiError::Auth {
            status: status.as_u16(),
        };
    }

    let message = extract_message(&body);

    if status.is_server_error() {
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        ApiError::Validation {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull a human-readable message out of an error body. The backend uses
/// `detail` for auth/validation errors and `message` for the analysis
/// endpoint; fall back to the raw body, truncated.
fn extract_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("detail")
            .or_else(|| v.get("message"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or_else(|| {
                v.get("errors")
                    .and_then(|e| e.get(0))
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            })
    });

    let message = from_json.unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        "request failed".to_string()
    } else {
        message.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base)
            .expect("client")
            .with_retry_base(Duration::from_millis(10))
    }

    #[test]
    fn new_rejects_unsupported_scheme() {
        let err = ApiClient::new("ftp://example.com").err();
        assert!(matches!(err, Some(ApiError::Config(_))));
    }

    #[test]
    fn new_rejects_missing_host() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let api = ApiClient::new("http://example.com:8000/").expect("client");
        assert_eq!(
            api.url("/users/profile/"),
            "http://example.com:8000/users/profile/"
        );
    }

    #[test]
    fn extract_message_prefers_detail_field() {
        let body = r#"{"detail": "No active account found"}"#;
        assert_eq!(extract_message(body), "No active account found");
    }

    #[test]
    fn extract_message_reads_errors_array() {
        let body = r#"{"errors": ["username taken"]}"#;
        assert_eq!(extract_message(body), "username taken");
    }

    #[test]
    fn extract_message_falls_back_to_raw_body() {
        assert_eq!(extract_message("plain text"), "plain text");
        assert_eq!(extract_message("   "), "request failed");
    }

    #[tokio::test]
    async fn get_json_attaches_bearer_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/profile/"))
            .and(header("Authorization", "Bearer token-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let value: Value = api
            .get_json("/users/profile/", Some("token-a"))
            .await
            .expect("response");
        assert_eq!(value["ok"], json!(true));
    }

    #[tokio::test]
    async fn get_json_classifies_401_as_auth() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/profile/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "token expired"
            })))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let err = api
            .get_json::<Value>("/users/profile/", Some("stale"))
            .await
            .expect_err("expected error");
        assert!(matches!(err, ApiError::Auth { status: 401 }));
    }

    #[tokio::test]
    async fn get_json_surfaces_validation_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blog/search/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "q is required"
            })))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let err = api
            .get_json::<Value>("/blog/search/", None)
            .await
            .expect_err("expected error");
        match err {
            ApiError::Validation { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "q is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_json_classifies_500_as_server() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blog/posts/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let err = api
            .get_json::<Value>("/blog/posts/", None)
            .await
            .expect_err("expected error");
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn get_json_does_not_retry_validation_errors() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blog/categories/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let _ = api.get_json::<Value>("/blog/categories/", None).await;
    }

    #[tokio::test]
    async fn get_json_retries_transport_failures_three_times() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }

        // Accept and immediately drop every connection so each attempt fails
        // at the transport layer, then count the accepts.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");

        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        let api = client(&format!("http://{addr}"));
        let err = api
            .get_json::<Value>("/blog/posts/", None)
            .await
            .expect_err("expected error");

        assert!(err.is_transport());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn get_json_gives_up_on_unreachable_host() {
        // Port 1 on loopback refuses connections immediately.
        let api = ApiClient::new("http://127.0.0.1:1")
            .expect("client")
            .with_retry_base(Duration::from_millis(1));

        let err = api
            .get_json::<Value>("/blog/posts/popular/", None)
            .await
            .expect_err("expected error");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn post_json_sends_payload() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/login/"))
            .and(body_json(json!({
                "username": "alice",
                "password": "secret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "A",
                "refresh": "R"
            })))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let value: Value = api
            .post_json(
                "/users/login/",
                &json!({"username": "alice", "password": "secret"}),
                None,
            )
            .await
            .expect("response");
        assert_eq!(value["access"], json!("A"));
    }

    #[tokio::test]
    async fn delete_checks_status_only() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/blog/posts/7/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        api.delete("/blog/posts/7/", Some("t")).await.expect("ok");
    }
}

//! Generic REST client shared by the service clients
//!
//! Wraps a base URL and a reusable session (auth header, default headers,
//! TLS verification) and exposes a single `request` primitive. Transport
//! failures and non-2xx statuses are logged here, once, and surfaced as
//! typed errors so callers can tell a failed call apart from an empty
//! result.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, Response};

use crate::error::{ApiError, ConfigError, Result};

/// Request timeout for every call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Basic-auth credentials for a session
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

/// Explicit session configuration for an [`ApiClient`].
///
/// Every knob is enumerated here; there is no pass-through of arbitrary
/// session attributes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Basic-auth credentials applied to every request
    pub auth: Option<Credentials>,

    /// Default headers applied to every request
    pub headers: HeaderMap,

    /// Whether to verify TLS certificates (the IQ Server deployments this
    /// tool targets commonly run with self-signed certificates)
    pub verify_tls: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            auth: None,
            headers,
            verify_tls: true,
        }
    }
}

/// Minimal REST client: base URL plus one reusable HTTP session
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: HttpClient,
}

impl ApiClient {
    /// Build a client. The trailing slash on `base_url` is stripped so
    /// endpoints can always start with `/`.
    pub fn new(base_url: &str, session: SessionConfig) -> Result<Self> {
        let mut headers = session.headers;
        if let Some(creds) = &session.auth {
            headers.insert(AUTHORIZATION, basic_auth_header(&creds.username, &creds.secret)?);
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!session.verify_tls)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Issue one request. No retries, no backoff; any failure is logged
    /// with the method and endpoint and returned as an [`ApiError`].
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> std::result::Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(json) = body {
            builder = builder.json(json);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                let err = ApiError::from(e);
                log::error!("API request failed: {method} {url}: {err}");
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            log::error!("API request failed: {method} {url}: HTTP {status}");
            Err(ApiError::Status {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status,
            })
        }
    }
}

/// Encode a Basic authorization header value
fn basic_auth_header(username: &str, secret: &str) -> Result<HeaderValue> {
    let token = general_purpose::STANDARD.encode(format!("{username}:{secret}"));
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))
        .map_err(|e| ConfigError::Invalid(format!("credentials are not header-safe: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_trailing_slash_on_base_url_stripped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .create_async()
            .await;

        let base = format!("{}/", server.url());
        let client = ApiClient::new(&base, SessionConfig::default()).unwrap();
        client.request(Method::GET, "/ping", None).await.unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn test_basic_auth_header_encoding() {
        // "admin:secret" base64-encoded
        let value = basic_auth_header("admin", "secret").unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_basic_auth_header_rejects_control_characters() {
        let err = basic_auth_header("admin\n", "secret").unwrap_err();
        match err {
            Error::Config(ConfigError::Invalid(_)) => (),
            other => panic!("Expected ConfigError::Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), SessionConfig::default()).unwrap();
        let response = client.request(Method::GET, "/ping", None).await.unwrap();
        assert_eq!(response.status(), 200);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_sends_auth_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/items")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .match_body(mockito::Matcher::Json(serde_json::json!({"name": "x"})))
            .with_status(201)
            .create_async()
            .await;

        let session = SessionConfig {
            auth: Some(Credentials::new("admin", "secret")),
            ..SessionConfig::default()
        };
        let client = ApiClient::new(&server.url(), session).unwrap();
        let body = serde_json::json!({"name": "x"});
        let response = client
            .request(Method::POST, "/items", Some(&body))
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_non_success_is_error_not_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), SessionConfig::default()).unwrap();
        let err = client.request(Method::GET, "/broken", None).await.unwrap_err();
        match err {
            ApiError::Status { method, endpoint, status } => {
                assert_eq!(method, "GET");
                assert_eq!(endpoint, "/broken");
                assert_eq!(status, 500);
            }
            other => panic!("Expected ApiError::Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_connection_refused() {
        // Port 9 (discard) is almost certainly closed
        let client = ApiClient::new("http://127.0.0.1:9", SessionConfig::default()).unwrap();
        let err = client.request(Method::GET, "/x", None).await.unwrap_err();
        match err {
            ApiError::Network(_) => (),
            other => panic!("Expected ApiError::Network, got {other:?}"),
        }
    }
}

//! HTTP transport seam
//!
//! Checks build [`ApiRequest`]s and hand them to an [`ApiTransport`].
//! [`HttpTransport`] talks to a live backend via reqwest; the in-memory
//! fake in [`crate::fakes`] answers from a route table for tests.

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// HTTP methods exercised by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the API, relative to the API prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API prefix, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn get(path: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Method::Get, path, timeout)
    }

    pub fn post(path: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Method::Post, path, timeout)
    }

    pub fn put(path: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Method::Put, path, timeout)
    }

    /// Append query parameters, preserving order.
    pub fn with_query<K, V>(mut self, params: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.query.extend(
            params
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            ProbeError::Transport(format!("failed to encode request body: {}", e))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// `METHOD /path?k=v&...`, unencoded. Used for logging and fake routing.
    pub fn route_key(&self) -> String {
        route_key(self.method, &self.path, &self.query)
    }
}

pub(crate) fn route_key(method: Method, path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        format!("{} {}", method, path)
    } else {
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{} {}?{}", method, path, pairs.join("&"))
    }
}

/// Status and raw body of a received response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body.
    pub fn json_body(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| ProbeError::MalformedBody {
            status: self.status,
            reason: e.to_string(),
        })
    }
}

/// Sends requests to the API under test.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue one request. Fails only when no well-formed HTTP response
    /// arrived; non-2xx statuses are returned as responses.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport for a live backend.
pub struct HttpTransport {
    api_base: String,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agency-probe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpTransport {
            api_base: config.api_base(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn classify(err: reqwest::Error, url: &str, timeout: Duration) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .http_client
            .request(request.method.to_reqwest(), &url)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(e, &url, request.timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(e, &url, request.timeout))?;

        debug!(url = %url, status, "received response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_key_without_query() {
        let request = ApiRequest::get("/agencies", Duration::from_secs(10));
        assert_eq!(request.route_key(), "GET /agencies");
    }

    #[test]
    fn test_route_key_with_query_preserves_order() {
        let request = ApiRequest::get("/agencies", Duration::from_secs(10))
            .with_query(&[("page", "1"), ("limit", "3")]);
        assert_eq!(request.route_key(), "GET /agencies?page=1&limit=3");
    }

    #[test]
    fn test_with_json_sets_body() {
        let request = ApiRequest::put("/agencies/a1", Duration::from_secs(10))
            .with_json(&json!({ "recruiting": false }))
            .expect("encode failed");
        assert_eq!(request.body, Some(json!({ "recruiting": false })));
        assert_eq!(request.method, Method::Put);
    }

    #[test]
    fn test_response_json_decodes() {
        let response = ApiResponse::json_body(200, &json!({ "message": "hi" }));
        let value = response.json().expect("decode failed");
        assert_eq!(value["message"], "hi");
    }

    #[test]
    fn test_response_json_rejects_html() {
        let response = ApiResponse::new(502, "<html>Bad Gateway</html>");
        match response.json() {
            Err(ProbeError::MalformedBody { status, .. }) => assert_eq!(status, 502),
            other => panic!("expected MalformedBody, got {:?}", other),
        }
    }

    #[test]
    fn test_http_transport_builds_url() {
        let config = ProbeConfig::new("http://localhost:4000");
        let transport = HttpTransport::new(&config).expect("client failed");
        assert_eq!(transport.url("/agencies"), "http://localhost:4000/api/agencies");
    }
}

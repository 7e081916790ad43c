//! Generic JSON-over-HTTP client
//!
//! Every HTTP status is returned as an [`ApiResponse`]; only transport and
//! URL failures become a [`ClientError`]. Status expectations belong to the
//! caller (see the fluent assertions in `response.rs`).

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::utils::HasId;
use crate::wait::{HasStatus, WaitError};

/// Errors that can occur when talking to a service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {elapsed:?} waiting for {condition} ({attempts} attempts)")]
    Wait {
        condition: String,
        elapsed: Duration,
        attempts: u32,
    },

    #[error("{0}")]
    Unavailable(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<WaitError<ApiResponse, ClientError>> for ClientError {
    fn from(err: WaitError<ApiResponse, ClientError>) -> Self {
        match err {
            WaitError::Timeout {
                condition,
                elapsed,
                attempts,
                ..
            } => ClientError::Wait {
                condition,
                elapsed,
                attempts,
            },
            WaitError::Operation(e) => e,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Status code and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Parse the body as a JSON document, `None` if it is not JSON
    pub fn json_value(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Value at a dotted path (`error`, `items.0.name`) rendered as a string
    ///
    /// Numbers and booleans are stringified, objects and arrays are rendered
    /// as JSON; JSON null and missing values give `None`.
    pub fn json_string(&self, path: &str) -> Option<String> {
        let root = self.json_value()?;
        lookup(&root, path).and_then(render)
    }
}

impl HasStatus for ApiResponse {
    fn status(&self) -> u16 {
        self.status
    }
}

fn lookup<'a>(root: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let path = path.trim_start_matches('$').trim_start_matches('.');
    if path.is_empty() {
        return Some(root);
    }

    path.split('.').try_fold(root, |value, segment| match value {
        serde_json::Value::Object(map) => map.get(segment),
        serde_json::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Client for one REST service
///
/// # Example
/// ```no_run
/// use apiprobe::client::ApiClient;
/// use apiprobe::config::ServiceConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServiceConfig::new("https://petstore.swagger.io/").with_base_path("v2/");
/// let client = ApiClient::from_config(&config)?;
/// let response = client.get("user/steve").await?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL every request path is joined onto (always ends with `/`)
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
    /// Service name for logging/identification
    name: Option<String>,
}

impl ApiClient {
    /// Create a client with default request settings
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::from_config(&ServiceConfig::new(base_url))
    }

    /// Create a client from an explicit service configuration
    pub fn from_config(config: &ServiceConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Self::with_client(&config.endpoint(), client)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(base_url: &str, client: Client) -> ClientResult<Self> {
        Ok(Self {
            base_url: Url::parse(&with_trailing_slash(base_url))?,
            client,
            name: None,
        })
    }

    /// Set a name for this client (useful for logging)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path against the base URL
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        let url = self.url(path)?;
        self.send("GET", path, self.client.get(url)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<ApiResponse> {
        let url = self.url(path)?;
        self.send("DELETE", path, self.client.delete(url)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse> {
        let url = self.url(path)?;
        self.send("POST", path, self.client.post(url).json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<ApiResponse> {
        let url = self.url(path)?;
        self.send("PUT", path, self.client.put(url).json(body)).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<ApiResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(
            service = %self.id(),
            method,
            path,
            status,
            body_len = body.len(),
            "Request completed"
        );

        Ok(ApiResponse { status, body })
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

impl HasId for ApiClient {
    fn id(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.base_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_base_path_is_joined() {
        let config = ServiceConfig::new("https://petstore.swagger.io").with_base_path("v2");
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://petstore.swagger.io/v2/");
        assert_eq!(
            client.url("user/steve").unwrap().as_str(),
            "https://petstore.swagger.io/v2/user/steve"
        );
        assert_eq!(
            client.url("/user").unwrap().as_str(),
            "https://petstore.swagger.io/v2/user"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_has_id() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.id(), "http://localhost:8080/");
        assert_eq!(client.with_name("superhero").id(), "superhero");
    }

    #[test]
    fn test_json_string_paths() {
        let response = ApiResponse::new(
            400,
            r#"{"status":400,"error":"Bad Request","ok":false,"phone":null,"items":[{"name":"a"}]}"#,
        );
        assert_eq!(response.json_string("status").as_deref(), Some("400"));
        assert_eq!(response.json_string("error").as_deref(), Some("Bad Request"));
        assert_eq!(response.json_string("ok").as_deref(), Some("false"));
        assert_eq!(response.json_string("phone"), None);
        assert_eq!(response.json_string("missing"), None);
        assert_eq!(response.json_string("items.0.name").as_deref(), Some("a"));
        assert_eq!(response.json_string("items.5.name"), None);
    }

    #[test]
    fn test_json_string_on_non_json_body() {
        let response = ApiResponse::new(502, "Bad Gateway");
        assert_eq!(response.json_value(), None);
        assert_eq!(response.json_string("error"), None);
        assert_eq!(response.text(), "Bad Gateway");
    }

    #[test]
    fn test_wait_error_conversion() {
        let err: ClientError = WaitError::<ApiResponse, ClientError>::Timeout {
            condition: "user 'x' to be present (HTTP 200)".into(),
            elapsed: Duration::from_secs(15),
            attempts: 30,
            last: Some(ApiResponse::new(404, "")),
        }
        .into();
        assert!(matches!(err, ClientError::Wait { attempts: 30, .. }));
    }
}

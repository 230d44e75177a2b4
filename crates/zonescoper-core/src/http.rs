//! Resilient request layer.
//!
//! Every remote call goes through [`execute`]. A call is described by a
//! [`RequestConfig`] and produces either a [`RawResponse`] or a classified
//! [`RequestError`]:
//!
//! - transport failures (connect, timeout, body read) sleep for a fixed
//!   `base_delay` and are retried up to `max_retries` times;
//! - HTTP statuses `>= 400` are returned immediately as
//!   [`RequestError::RemoteRejection`], never retried;
//! - when the retry budget is spent the caller receives
//!   [`RequestError::RetryExhausted`] carrying a synthetic `503` response.

use std::time::Duration;

pub use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default fixed delay between transport-level retries.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const EXHAUSTED_BODY: &str = "Service is unavailable after retries.";

/// A typed query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
}

impl QueryValue {
    /// Converts a dynamic JSON value into a query value.
    ///
    /// Only strings and integers are supported. Anything else is dropped
    /// (logged at debug level) rather than rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => {
                    tracing::debug!(value = %n, "Dropping non-integer query parameter");
                    None
                }
            },
            other => {
                tracing::debug!(value = %other, "Dropping unsupported query parameter type");
                None
            }
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// One logical remote operation.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// API base URL, e.g. `https://secure.sysdig.com`.
    pub endpoint: String,
    pub method: Method,
    /// Path appended to `endpoint`.
    pub path: String,
    pub params: Vec<(String, QueryValue)>,
    /// Extra headers, sent in addition to the bearer token.
    pub headers: Vec<(String, String)>,
    pub json: Option<Value>,
    pub token: String,
    /// Verify the server's TLS certificate (default: disabled).
    pub verify_tls: bool,
    pub max_retries: u32,
    /// Fixed sleep between transport-level retries.
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl RequestConfig {
    /// Creates a `GET` request against `endpoint` with default retry settings.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::GET,
            path: String::new(),
            params: Vec::new(),
            headers: Vec::new(),
            json: None,
            token: token.into(),
            verify_tls: false,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidRequest`] if `body` cannot be serialized.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, RequestError> {
        let value = serde_json::to_value(body)
            .map_err(|e| RequestError::InvalidRequest(format!("failed to encode JSON body: {e}")))?;
        self.json = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full request URL including encoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidRequest`] if the endpoint and path do not
    /// form a valid URL.
    pub fn url(&self) -> Result<Url, RequestError> {
        let raw = format!("{}{}", self.endpoint.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| RequestError::InvalidRequest(format!("failed to parse URL '{raw}': {e}")))?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, &value.render());
            }
        }
        Ok(url)
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// The synthetic response handed back once the retry budget is spent.
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: EXHAUSTED_BODY.to_string(),
        }
    }

    /// Decodes the body into `T`. An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let text = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(|source| RequestError::Decode {
            source,
            body: self.body.clone(),
        })
    }
}

/// Classified failure of a remote call.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Connection, timeout or body read failure. Retryable.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with an HTTP error status. Never retried.
    #[error("HTTP request failed with status code: {}", response.status.as_u16())]
    RemoteRejection { response: RawResponse },

    /// Every attempt failed at the transport level.
    #[error("Service unavailable after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        response: RawResponse,
        #[source]
        source: Box<RequestError>,
    },

    /// The response body did not match the expected shape.
    #[error("Could not decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The request could not be built (bad URL, client construction).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    /// Whether a retry may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The response that accompanies this error, if any.
    ///
    /// Rejections carry the server's response; exhausted retries carry a
    /// synthetic `503`.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::RemoteRejection { response } | Self::RetryExhausted { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }
}

/// Executes `config` with bounded retry.
///
/// # Errors
///
/// See [`RequestError`] for the classification.
pub async fn execute(config: &RequestConfig) -> Result<RawResponse, RequestError> {
    let client = build_client(config)?;
    let url = config.url()?;
    let attempts = config.max_retries.saturating_add(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match send_once(&client, &url, config).await {
            Ok(response) if response.status.as_u16() >= 400 => {
                tracing::info!(
                    method = %config.method,
                    url = %url,
                    status = response.status.as_u16(),
                    body = %response.body,
                    "Received HTTP error status"
                );
                return Err(RequestError::RemoteRejection { response });
            }
            Ok(response) => {
                tracing::debug!(
                    method = %config.method,
                    url = %url,
                    status = response.status.as_u16(),
                    "Received HTTP response"
                );
                return Ok(response);
            }
            Err(error) if error.is_retryable() && attempt < attempts => {
                tracing::error!(
                    method = %config.method,
                    url = %url,
                    attempt,
                    max_attempts = attempts,
                    error = %error,
                    "Error on HTTP request, retrying"
                );
                tokio::time::sleep(config.base_delay).await;
            }
            Err(error) if error.is_retryable() => {
                tracing::error!(
                    endpoint = %config.endpoint,
                    retries = config.max_retries,
                    error = %error,
                    "Failed to fetch data after retries"
                );
                return Err(RequestError::RetryExhausted {
                    attempts,
                    response: RawResponse::service_unavailable(),
                    source: Box::new(error),
                });
            }
            Err(error) => return Err(error),
        }
    }
}

/// Executes `config` and decodes a successful body into `T`.
///
/// # Errors
///
/// Any [`RequestError`] from [`execute`], or [`RequestError::Decode`].
pub async fn execute_json<T: DeserializeOwned>(config: &RequestConfig) -> Result<T, RequestError> {
    execute(config).await?.json()
}

fn build_client(config: &RequestConfig) -> Result<reqwest::Client, RequestError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .danger_accept_invalid_certs(!config.verify_tls)
        .build()
        .map_err(|e| RequestError::InvalidRequest(format!("failed to build HTTP client: {e}")))
}

async fn send_once(
    client: &reqwest::Client,
    url: &Url,
    config: &RequestConfig,
) -> Result<RawResponse, RequestError> {
    let mut request = client.request(config.method.clone(), url.clone());
    for (key, value) in &config.headers {
        request = request.header(key, value);
    }
    request = request.bearer_auth(&config.token);
    if let Some(body) = &config.json {
        request = request.json(body);
    }

    let response = request.send().await.map_err(RequestError::Transport)?;
    let status = response.status();
    let body = response.text().await;
    read_response(status, body).map_err(RequestError::Transport)
}

/// Pairs `status` with the read body. An error status keeps its rejection
/// even when the body cannot be read, so it is never retried.
fn read_response<E: std::fmt::Display>(
    status: StatusCode,
    body: Result<String, E>,
) -> Result<RawResponse, E> {
    let body = match body {
        Ok(body) => body,
        Err(error) if status.as_u16() >= 400 => {
            tracing::debug!(
                status = status.as_u16(),
                error = %error,
                "Could not read error response body"
            );
            String::new()
        }
        Err(error) => return Err(error),
    };
    Ok(RawResponse { status, body })
}

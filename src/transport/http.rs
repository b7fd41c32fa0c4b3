//! HTTP adaptation layer.
//!
//! [`HttpClient`] is the seam between the transport and the HTTP stack. The
//! reqwest implementation is the only code that inspects `reqwest::Error`;
//! everything above it sees [`HttpError`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use thiserror::Error;
use url::Url;

use super::BoxError;

/// Client identifier sent with every request.
pub const CLIENT_IDENTIFIER: &str = concat!("zeptomail-rs/", env!("CARGO_PKG_VERSION"));

/// A JSON POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRequest {
    pub url: Url,
    /// Sent verbatim as the `Authorization` header.
    pub authorization: String,
    /// Serialized JSON body.
    pub body: Bytes,
}

/// Status and body of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP response level.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be built; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// DNS, TCP or TLS handshake failure.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    /// The connection was made but no usable response came back.
    #[error("request failed: {0}")]
    Request(#[source] BoxError),
}

/// Minimal HTTP client used by the transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POSTs a JSON body and returns the response, whatever its status.
    async fn post_json(&self, request: &JsonRequest) -> Result<HttpResponse, HttpError>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client. With `ssl_verify` off, invalid certificates are accepted.
    pub fn new(ssl_verify: bool) -> Result<Self, HttpError> {
        let client = Self::builder(ssl_verify)
            .build()
            .map_err(|e| HttpError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Client builder with the settings [`ReqwestClient::new`] applies.
    ///
    /// Start here to add timeouts or proxy settings, then wrap the result
    /// with [`ReqwestClient::from_client`].
    pub fn builder(ssl_verify: bool) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(!ssl_verify)
            .user_agent(CLIENT_IDENTIFIER)
    }

    /// Wraps a preconfigured client (custom timeouts, proxies, ...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_headers(request: &JsonRequest) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&request.authorization).map_err(|_| {
            HttpError::InvalidRequest("API key is not a valid header value".to_string())
        })?;
        authorization.set_sensitive(true);

        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_IDENTIFIER));
        Ok(headers)
    }

    fn classify(error: reqwest::Error) -> HttpError {
        if error.is_connect() {
            HttpError::Connect(Box::new(error))
        } else if error.is_builder() {
            HttpError::InvalidRequest(error.to_string())
        } else {
            HttpError::Request(Box::new(error))
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, request: &JsonRequest) -> Result<HttpResponse, HttpError> {
        let headers = Self::build_headers(request)?;

        let response = self
            .client
            .post(request.url.clone())
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::classify)?;

        Ok(HttpResponse { status, body })
    }
}

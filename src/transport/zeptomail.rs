//! ZeptoMail transport implementation.
//!
//! Each send is a single `POST {endpoint}/v1.1/email` with the API key in the
//! `Authorization` header. Nothing is retried: a failure is logged once and
//! returned as a [`MailError`].

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

use super::endpoint::EndpointResolver;
use super::http::{HttpClient, HttpError, JsonRequest, ReqwestClient};
use super::log::{error_chain, MailLog, SendEvent, TracingLog};
use super::payload::PayloadBuilder;
use super::{MailError, MailTransport, Result, SentMessage};
use crate::config::TransportConfig;
use crate::domain::{Envelope, OutboundMessage};

const TRANSPORT_NAME: &str = "zeptomail";

/// Generic message for failures after a connection was made.
const REQUEST_FAILED: &str = "Mail request failed.";

/// Fields of a successful send response the transport cares about.
#[derive(Debug, Deserialize)]
struct SendResponse {
    request_id: Option<String>,
}

/// Mail transport for the ZeptoMail HTTP API.
///
/// Holds only immutable settings, so one instance can serve concurrent sends
/// as long as its [`HttpClient`] can.
pub struct ZeptoMailTransport {
    api_key: String,
    host: String,
    ssl_verify: bool,
    client: Arc<dyn HttpClient>,
    log: Arc<dyn MailLog>,
}

impl ZeptoMailTransport {
    /// Creates a transport from settings.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Configuration`] if the HTTP client cannot be built.
    /// The host and API key are validated on each send.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = ReqwestClient::new(config.ssl_verify)
            .map_err(|e| MailError::configuration(e.to_string()))?;

        Ok(Self::with_http_client(config, client))
    }

    /// Creates a transport that sends through `client`.
    ///
    /// `config.ssl_verify` is not applied to `client`. It only decides
    /// whether sends are reported to the log as unverified.
    pub fn with_http_client(config: TransportConfig, client: impl HttpClient + 'static) -> Self {
        Self {
            api_key: config.api_key,
            host: config.host,
            ssl_verify: config.ssl_verify,
            client: Arc::new(client),
            log: Arc::new(TracingLog),
        }
    }

    /// Replaces the default `tracing` log sink.
    pub fn with_log(mut self, log: Arc<dyn MailLog>) -> Self {
        self.log = log;
        self
    }

    /// The configured host, as given.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves the send-email URL for the configured host.
    pub fn endpoint(&self) -> Result<String> {
        EndpointResolver::resolve(&self.host)
    }

    /// Sends `message` to the recipients listed in its own headers.
    pub async fn send_message<M: OutboundMessage>(&self, message: M) -> Result<SentMessage<M>> {
        let envelope = Envelope::from_message(&message);
        self.deliver(message, envelope).await
    }

    async fn deliver<M: OutboundMessage>(
        &self,
        message: M,
        envelope: Envelope,
    ) -> Result<SentMessage<M>> {
        let (endpoint, url) = self.prepare()?;

        let payload = PayloadBuilder::build(&message, &envelope)
            .await
            .map_err(|e| self.unexpected(e))?;

        let body = serde_json::to_vec(&payload).map_err(|e| {
            self.unexpected(MailError::internal(
                format!("failed to serialize payload: {}", e),
                Some(e.into()),
            ))
        })?;

        if !self.ssl_verify {
            self.log.record(&SendEvent::TlsUnverified { endpoint: &endpoint });
        }
        self.log.record(&SendEvent::Dispatching {
            endpoint: &endpoint,
            recipients: envelope.recipients.len(),
            attachments: payload.attachments.len(),
        });

        let request = JsonRequest {
            url,
            authorization: self.api_key.clone(),
            body: body.into(),
        };

        let response = match self.client.post_json(&request).await {
            Ok(response) => response,
            Err(HttpError::Connect(source)) => {
                self.log.record(&SendEvent::ConnectFailed {
                    endpoint: &endpoint,
                    error: source.as_ref(),
                });
                return Err(MailError::Connect { source });
            }
            Err(HttpError::Request(source)) => {
                self.log.record(&SendEvent::RequestFailed {
                    endpoint: &endpoint,
                    error: source.as_ref(),
                });
                return Err(MailError::internal(REQUEST_FAILED, Some(source)));
            }
            Err(HttpError::InvalidRequest(reason)) => {
                return Err(self.misconfigured(reason));
            }
        };

        if !response.is_success() {
            self.log.record(&SendEvent::ApiRejected {
                status: response.status,
                body: &response.body,
            });
            return Err(MailError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let request_id = serde_json::from_str::<SendResponse>(&response.body)
            .ok()
            .and_then(|parsed| parsed.request_id);

        self.log.record(&SendEvent::Delivered {
            endpoint: &endpoint,
            status: response.status,
            request_id: request_id.as_deref(),
        });

        Ok(SentMessage::new(message, envelope).with_request_id(request_id))
    }

    /// Validates settings and resolves the endpoint, before any I/O.
    fn prepare(&self) -> Result<(String, Url)> {
        let endpoint = match EndpointResolver::resolve(&self.host) {
            Ok(endpoint) => endpoint,
            Err(MailError::Configuration(reason)) => return Err(self.misconfigured(reason)),
            Err(other) => return Err(other),
        };

        if self.api_key.trim().is_empty() {
            return Err(self.misconfigured("ZeptoMail API key is not configured."));
        }

        let url = Url::parse(&endpoint).map_err(|e| {
            self.misconfigured(format!(
                "ZeptoMail host {:?} does not form a valid URL: {}",
                self.host, e
            ))
        })?;

        Ok((endpoint, url))
    }

    fn misconfigured(&self, reason: impl Into<String>) -> MailError {
        let reason = reason.into();
        self.log.record(&SendEvent::Misconfigured { reason: &reason });
        MailError::Configuration(reason)
    }

    /// Logs an internal failure with its cause chain and passes it through.
    fn unexpected(&self, error: MailError) -> MailError {
        if let MailError::Internal { detail, source } = &error {
            let trace = match source {
                Some(source) => error_chain(source.as_ref()),
                None => String::new(),
            };
            self.log.record(&SendEvent::Unexpected { detail, trace });
        }
        error
    }
}

impl fmt::Debug for ZeptoMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeptoMailTransport")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ZeptoMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TRANSPORT_NAME)
    }
}

#[async_trait]
impl<M: OutboundMessage + 'static> MailTransport<M> for ZeptoMailTransport {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    async fn send(&self, message: M, envelope: Envelope) -> Result<SentMessage<M>> {
        self.deliver(message, envelope).await
    }
}

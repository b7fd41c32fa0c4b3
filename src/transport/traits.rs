//! Mail transport trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Envelope, OutboundMessage};

/// Boxed underlying cause kept for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Errors reported by a mail transport.
///
/// The display text of each variant is safe to show to end users; the
/// underlying cause, where there is one, is available through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum MailError {
    /// Missing or invalid settings, detected before any network activity.
    #[error("{0}")]
    Configuration(String),

    /// The connection to the API could not be established.
    #[error("Failed to connect to mail server.")]
    Connect {
        #[source]
        source: BoxError,
    },

    /// The API answered with a non-success status.
    #[error("Mail API error: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// Anything else that went wrong while building or sending the request.
    #[error("An unexpected error occurred while sending mail.")]
    Internal {
        /// Diagnostic detail for logs.
        detail: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl MailError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        MailError::Configuration(message.into())
    }

    pub(crate) fn internal(detail: impl Into<String>, source: Option<BoxError>) -> Self {
        MailError::Internal {
            detail: detail.into(),
            source,
        }
    }

    /// HTTP status for API rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            MailError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Confirmation that a message was accepted for delivery.
#[derive(Debug, Clone)]
pub struct SentMessage<M> {
    message: M,
    envelope: Envelope,
    request_id: Option<String>,
}

impl<M> SentMessage<M> {
    pub fn new(message: M, envelope: Envelope) -> Self {
        Self {
            message,
            envelope,
            request_id: None,
        }
    }

    pub(crate) fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// The message that was sent.
    pub fn message(&self) -> &M {
        &self.message
    }

    /// The envelope the message was delivered to.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Request identifier reported by the API, when it returned one.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Splits the confirmation back into the message and envelope.
    pub fn into_parts(self) -> (M, Envelope) {
        (self.message, self.envelope)
    }
}

/// Trait for mail transports.
///
/// A transport delivers one message per call and does not retry; callers
/// decide whether a failed send is queued, retried or reported.
#[async_trait]
pub trait MailTransport<M: OutboundMessage>: Send + Sync {
    /// Short transport identifier (e.g., "zeptomail").
    fn name(&self) -> &str;

    /// Sends `message` to the recipients in `envelope`.
    async fn send(&self, message: M, envelope: Envelope) -> Result<SentMessage<M>>;
}

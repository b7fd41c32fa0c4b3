//! Diagnostic events emitted while sending.
//!
//! The transport never configures logging itself. It reports what happened
//! to a [`MailLog`] handed in at construction; [`TracingLog`] forwards those
//! events to `tracing`.

use std::fmt;

/// Something worth recording during a send.
#[derive(Debug)]
pub enum SendEvent<'a> {
    /// A request is about to be issued.
    Dispatching {
        endpoint: &'a str,
        recipients: usize,
        attachments: usize,
    },
    /// The request goes out without TLS certificate verification.
    TlsUnverified { endpoint: &'a str },
    /// The API accepted the message.
    Delivered {
        endpoint: &'a str,
        status: u16,
        request_id: Option<&'a str>,
    },
    /// No connection could be established.
    ConnectFailed {
        endpoint: &'a str,
        error: &'a (dyn std::error::Error + Send + Sync),
    },
    /// The API answered with an error status.
    ApiRejected { status: u16, body: &'a str },
    /// The request failed after connecting, without a usable response.
    RequestFailed {
        endpoint: &'a str,
        error: &'a (dyn std::error::Error + Send + Sync),
    },
    /// Settings rejected before any network activity.
    Misconfigured { reason: &'a str },
    /// Any other failure on the send path.
    Unexpected { detail: &'a str, trace: String },
}

impl SendEvent<'_> {
    /// Whether this event describes a failed send.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            SendEvent::Dispatching { .. }
                | SendEvent::TlsUnverified { .. }
                | SendEvent::Delivered { .. }
        )
    }
}

impl fmt::Display for SendEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendEvent::Dispatching { endpoint, .. } => write!(f, "Dispatching mail to {}", endpoint),
            SendEvent::TlsUnverified { endpoint } => {
                write!(f, "TLS certificate verification is disabled for {}", endpoint)
            }
            SendEvent::Delivered { status, .. } => write!(f, "Mail accepted: HTTP {}", status),
            SendEvent::ConnectFailed { error, .. } => write!(f, "Connection error: {}", error),
            SendEvent::ApiRejected { status, .. } => write!(f, "Mail API error: HTTP {}", status),
            SendEvent::RequestFailed { error, .. } => write!(f, "Request error: {}", error),
            SendEvent::Misconfigured { reason } => write!(f, "Mail transport misconfigured: {}", reason),
            SendEvent::Unexpected { detail, .. } => write!(f, "Unexpected error: {}", detail),
        }
    }
}

/// Sink for [`SendEvent`]s.
pub trait MailLog: Send + Sync {
    fn record(&self, event: &SendEvent<'_>);
}

/// Forwards events to the `tracing` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl MailLog for TracingLog {
    fn record(&self, event: &SendEvent<'_>) {
        match event {
            SendEvent::Dispatching {
                endpoint,
                recipients,
                attachments,
            } => {
                tracing::debug!(endpoint, recipients, attachments, "{}", event);
            }
            SendEvent::TlsUnverified { endpoint } => {
                tracing::warn!(endpoint, "{}", event);
            }
            SendEvent::Delivered {
                endpoint,
                status,
                request_id,
            } => {
                tracing::info!(endpoint, status, request_id = ?request_id, "Email sent via ZeptoMail");
            }
            SendEvent::ConnectFailed { endpoint, error } => {
                tracing::error!(endpoint, error = %error, "{}", event);
            }
            SendEvent::ApiRejected { status, body } => {
                tracing::error!(status, response = %body, "{}", event);
            }
            SendEvent::RequestFailed { endpoint, error } => {
                tracing::error!(endpoint, error = %error, "{}", event);
            }
            SendEvent::Misconfigured { .. } => {
                tracing::error!("{}", event);
            }
            SendEvent::Unexpected { trace, .. } => {
                tracing::error!(trace = %trace, "{}", event);
            }
        }
    }
}

/// Formats an error and its chain of sources, one per line.
pub(crate) fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut out = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        out.push_str("\ncaused by: ");
        out.push_str(&source.to_string());
        current = source.source();
    }
    out
}

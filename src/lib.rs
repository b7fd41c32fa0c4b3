//! zeptomail - ZeptoMail HTTP API mail transport
//!
//! This crate delivers outbound messages through ZeptoMail's send-email
//! endpoint. A host mailer builds a message, picks recipients, and hands both
//! to a [`transport::MailTransport`]; the transport turns them into one JSON
//! request and reports success or a categorized [`transport::MailError`].

pub mod config;
pub mod domain;
pub mod transport;

pub use config::TransportConfig;
pub use domain::{Address, Attachment, Email, Envelope, OutboundMessage};
pub use transport::{MailError, MailTransport, SentMessage, ZeptoMailTransport};

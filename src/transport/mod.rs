//! ZeptoMail mail transport.
//!
//! This module contains the [`MailTransport`] trait and its implementation
//! for the ZeptoMail HTTP API:
//!
//! - [`ZeptoMailTransport`] - sends one message per `POST /v1.1/email`
//! - [`EndpointResolver`] - maps region domains and hosts to the send URL
//! - [`PayloadBuilder`] - builds the JSON request body
//! - [`HttpClient`] - the HTTP seam, backed by [`ReqwestClient`]
//! - [`MailLog`] - receives send diagnostics, [`TracingLog`] by default
//!
//! # Example
//!
//! ```ignore
//! use zeptomail::config::TransportConfig;
//! use zeptomail::domain::{Address, Email};
//! use zeptomail::transport::ZeptoMailTransport;
//!
//! async fn notify(transport: &ZeptoMailTransport) -> zeptomail::transport::Result<()> {
//!     let email = Email::builder()
//!         .from(Address::with_name("billing@example.com", "Billing"))
//!         .to("customer@example.com")
//!         .subject("Your invoice")
//!         .html("<p>Attached.</p>")
//!         .attach_path("/tmp/invoice.pdf", "application/pdf")
//!         .build();
//!
//!     let sent = transport.send_message(email).await?;
//!     println!("accepted: {:?}", sent.request_id());
//!     Ok(())
//! }
//! ```

mod endpoint;
mod http;
mod log;
mod payload;
mod traits;
mod zeptomail;

pub use endpoint::{EndpointResolver, SEND_PATH};
pub use http::{HttpClient, HttpError, HttpResponse, JsonRequest, ReqwestClient, CLIENT_IDENTIFIER};
pub use log::{MailLog, SendEvent, TracingLog};
pub use payload::{
    AttachmentEntry, Classification, ClassifiedRecipient, EmailAddress, PayloadBuilder, Recipient,
    SendPayload, Sender,
};
pub use traits::{BoxError, MailError, MailTransport, Result, SentMessage};
pub use zeptomail::ZeptoMailTransport;

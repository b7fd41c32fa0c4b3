//! Message-side types read by the transport.
//!
//! This module contains the address, message, attachment and envelope types
//! a host mailer hands to [`crate::transport::ZeptoMailTransport`].

mod address;
mod envelope;
mod message;

pub use address::{Address, AddressParseError};
pub use envelope::Envelope;
pub use message::{
    Attachment, AttachmentBody, ContentDisposition, DispositionKind, Email, EmailBuilder,
    OutboundMessage,
};

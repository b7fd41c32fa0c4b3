//! Outbound message types.
//!
//! The transport only ever reads a message through [`OutboundMessage`], so any
//! host-side message representation can be sent by implementing that trait.
//! [`Email`] is the bundled implementation with a fluent builder.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::Address;

/// Read-only view of an assembled email message.
pub trait OutboundMessage: Send + Sync {
    /// Subject line, possibly empty.
    fn subject(&self) -> &str;

    /// HTML body, if any.
    fn html_body(&self) -> Option<&str>;

    /// Plain text body, if any.
    fn text_body(&self) -> Option<&str>;

    /// Addresses from the `From` header, in header order.
    fn from(&self) -> &[Address];

    /// Addresses from the `To` header.
    fn to(&self) -> &[Address];

    /// Addresses from the `Cc` header.
    fn cc(&self) -> &[Address];

    /// Addresses from the `Bcc` header.
    fn bcc(&self) -> &[Address];

    /// Attachments in the order they were added.
    fn attachments(&self) -> &[Attachment];
}

/// Whether a part is a regular attachment or embedded inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispositionKind {
    #[default]
    Attachment,
    Inline,
}

/// Parsed `Content-Disposition` header of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentDisposition {
    pub kind: DispositionKind,
    /// The `filename` parameter.
    pub filename: Option<String>,
    /// The `name` parameter.
    pub name: Option<String>,
}

impl ContentDisposition {
    pub fn attachment(filename: impl Into<String>) -> Self {
        Self {
            kind: DispositionKind::Attachment,
            filename: Some(filename.into()),
            name: None,
        }
    }

    pub fn inline(filename: impl Into<String>) -> Self {
        Self {
            kind: DispositionKind::Inline,
            filename: Some(filename.into()),
            name: None,
        }
    }

    /// File name presented to the recipient.
    ///
    /// A non-empty `name` parameter takes precedence over `filename`.
    pub fn effective_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.filename.as_deref().unwrap_or_default(),
        }
    }
}

/// Where the bytes of an attachment live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentBody {
    /// Content held in memory.
    Bytes(Bytes),
    /// Content read from disk when the message is sent.
    Path(PathBuf),
}

/// A file attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub body: AttachmentBody,
    /// Declared `Content-Type`, parameters included.
    pub content_type: String,
    pub disposition: ContentDisposition,
}

impl Attachment {
    /// Creates an attachment from in-memory content.
    pub fn from_bytes(
        data: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            body: AttachmentBody::Bytes(data.into()),
            content_type: content_type.into(),
            disposition: ContentDisposition::attachment(filename),
        }
    }

    /// Creates an attachment backed by a file.
    ///
    /// The filename is taken from the last path component. The file is not
    /// touched until the message is sent.
    pub fn from_path(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            body: AttachmentBody::Path(path),
            content_type: content_type.into(),
            disposition: ContentDisposition::attachment(filename),
        }
    }

    /// Marks this attachment as inline content.
    pub fn inline(mut self) -> Self {
        self.disposition.kind = DispositionKind::Inline;
        self
    }

    /// Sets an explicit `name` disposition parameter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.disposition.name = Some(name.into());
        self
    }

    /// MIME type without parameters (`text/plain; charset=utf-8` -> `text/plain`).
    pub fn mime_type(&self) -> &str {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Loads the raw content of this attachment.
    pub async fn read_body(&self) -> std::io::Result<Bytes> {
        match &self.body {
            AttachmentBody::Bytes(bytes) => Ok(bytes.clone()),
            AttachmentBody::Path(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }

    /// Path of a file-backed attachment.
    pub fn path(&self) -> Option<&Path> {
        match &self.body {
            AttachmentBody::Path(path) => Some(path),
            AttachmentBody::Bytes(_) => None,
        }
    }
}

/// A complete email message ready to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Email {
    pub from: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Create a new email builder.
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }
}

impl OutboundMessage for Email {
    fn subject(&self) -> &str {
        &self.subject
    }

    fn html_body(&self) -> Option<&str> {
        self.html.as_deref()
    }

    fn text_body(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn from(&self) -> &[Address] {
        &self.from
    }

    fn to(&self) -> &[Address] {
        &self.to
    }

    fn cc(&self) -> &[Address] {
        &self.cc
    }

    fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

/// Builder for constructing [`Email`] instances.
#[derive(Debug, Default)]
pub struct EmailBuilder {
    email: Email,
}

impl EmailBuilder {
    /// Add a sender address.
    pub fn from(mut self, address: impl Into<Address>) -> Self {
        self.email.from.push(address.into());
        self
    }

    /// Add a primary recipient.
    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.email.to.push(address.into());
        self
    }

    /// Add multiple primary recipients.
    pub fn to_many(mut self, addresses: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        self.email.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Add a CC recipient.
    pub fn cc(mut self, address: impl Into<Address>) -> Self {
        self.email.cc.push(address.into());
        self
    }

    /// Add a BCC recipient.
    pub fn bcc(mut self, address: impl Into<Address>) -> Self {
        self.email.bcc.push(address.into());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.email.subject = subject.into();
        self
    }

    /// Set plain text body content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.email.text = Some(text.into());
        self
    }

    /// Set HTML body content.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.email.html = Some(html.into());
        self
    }

    /// Add an attachment.
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.email.attachments.push(attachment);
        self
    }

    /// Attach a file that is read when the message is sent.
    pub fn attach_path(self, path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        self.attach(Attachment::from_path(path, content_type))
    }

    /// Embed inline content, e.g. an image referenced from the HTML body.
    pub fn embed(
        self,
        data: impl Into<Bytes>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.attach(Attachment::from_bytes(data, filename, content_type).inline())
    }

    pub fn build(self) -> Email {
        self.email
    }
}

//! Send-email request body.
//!
//! Converts an [`OutboundMessage`] and its [`Envelope`] into the JSON shape
//! expected by the ZeptoMail `/v1.1/email` endpoint.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use super::{MailError, Result};
use crate::domain::{Address, Attachment, Envelope, OutboundMessage};

/// Request body for the send-email endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPayload {
    pub subject: String,
    pub htmlbody: String,
    pub from: Sender,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Recipient>,
    /// Always serialized, even when empty.
    #[serde(default)]
    pub attachments: Vec<AttachmentEntry>,
}

/// The `from` object. Both keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub address: String,
    pub name: String,
}

/// One entry of the `to`/`cc`/`bcc` arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One entry of the `attachments` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentEntry {
    /// Base64 of the raw attachment bytes.
    pub content: String,
    pub name: String,
    pub mime_type: String,
}

/// Delivery role of an envelope recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    To,
    Cc,
    Bcc,
}

/// An envelope recipient tagged with its delivery role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecipient {
    pub address: String,
    /// Display name; empty when the envelope recipient has none.
    pub name: String,
    pub classification: Classification,
}

impl ClassifiedRecipient {
    fn to_wire(&self) -> Recipient {
        Recipient {
            email_address: EmailAddress {
                address: self.address.clone(),
                name: if self.name.is_empty() {
                    None
                } else {
                    Some(self.name.clone())
                },
            },
        }
    }
}

/// Builds [`SendPayload`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder;

impl PayloadBuilder {
    /// Builds the request body for `message` delivered to `envelope`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Internal`] when an attachment body cannot be read.
    pub async fn build<M: OutboundMessage + ?Sized>(
        message: &M,
        envelope: &Envelope,
    ) -> Result<SendPayload> {
        let recipients = Self::classify(message, envelope);

        Ok(SendPayload {
            subject: message.subject().to_string(),
            htmlbody: Self::body(message),
            from: Self::sender(message),
            to: Self::partition(&recipients, Classification::To),
            cc: Self::partition(&recipients, Classification::Cc),
            bcc: Self::partition(&recipients, Classification::Bcc),
            attachments: Self::attachments(message.attachments()).await?,
        })
    }

    /// Tags every envelope recipient as to, cc or bcc.
    ///
    /// Bcc is checked before Cc, so a mailbox listed in both is sent as bcc.
    /// Recipients missing from both header lists default to to.
    pub fn classify<M: OutboundMessage + ?Sized>(
        message: &M,
        envelope: &Envelope,
    ) -> Vec<ClassifiedRecipient> {
        envelope
            .recipients
            .iter()
            .map(|recipient| {
                let classification = if contains(message.bcc(), recipient) {
                    Classification::Bcc
                } else if contains(message.cc(), recipient) {
                    Classification::Cc
                } else {
                    Classification::To
                };

                ClassifiedRecipient {
                    address: recipient.email.clone(),
                    name: recipient.name_or_empty().to_string(),
                    classification,
                }
            })
            .collect()
    }

    fn partition(recipients: &[ClassifiedRecipient], kind: Classification) -> Vec<Recipient> {
        recipients
            .iter()
            .filter(|recipient| recipient.classification == kind)
            .map(ClassifiedRecipient::to_wire)
            .collect()
    }

    /// HTML body, falling back to the text body, falling back to "".
    fn body<M: OutboundMessage + ?Sized>(message: &M) -> String {
        message
            .html_body()
            .or_else(|| message.text_body())
            .unwrap_or_default()
            .to_string()
    }

    fn sender<M: OutboundMessage + ?Sized>(message: &M) -> Sender {
        message
            .from()
            .first()
            .map(|from| Sender {
                address: from.email.clone(),
                name: from.name_or_empty().to_string(),
            })
            .unwrap_or_default()
    }

    async fn attachments(attachments: &[Attachment]) -> Result<Vec<AttachmentEntry>> {
        let mut entries = Vec::with_capacity(attachments.len());

        for attachment in attachments {
            let name = attachment.disposition.effective_name().to_string();
            let body = attachment.read_body().await.map_err(|e| {
                MailError::internal(
                    format!("failed to read attachment {:?}: {}", name, e),
                    Some(e.into()),
                )
            })?;

            entries.push(AttachmentEntry {
                content: STANDARD.encode(&body),
                name,
                mime_type: attachment.mime_type().to_string(),
            });
        }

        Ok(entries)
    }
}

fn contains(list: &[Address], recipient: &Address) -> bool {
    list.iter().any(|address| address.same_mailbox(recipient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Email;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn build(email: &Email) -> SendPayload {
        PayloadBuilder::build(email, &Envelope::from_message(email))
            .await
            .unwrap()
    }

    #[test]
    fn bcc_wins_over_cc() {
        let email = Email::builder()
            .cc("both@example.com")
            .bcc("both@example.com")
            .build();
        let envelope = Envelope::new(None, vec![Address::new("both@example.com")]);

        let classified = PayloadBuilder::classify(&email, &envelope);
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].classification, Classification::Bcc);
    }

    #[test]
    fn unlisted_recipient_defaults_to_to() {
        let email = Email::builder().cc("cc@example.com").build();
        let envelope = Envelope::new(
            None,
            vec![
                Address::new("stranger@example.com"),
                Address::new("cc@example.com"),
            ],
        );

        let classified = PayloadBuilder::classify(&email, &envelope);
        assert_eq!(classified[0].classification, Classification::To);
        assert_eq!(classified[1].classification, Classification::Cc);
    }

    #[test]
    fn classification_matches_case_insensitively() {
        let email = Email::builder().bcc("Hidden@Example.com").build();
        let envelope = Envelope::new(None, vec![Address::new("hidden@example.com")]);

        let classified = PayloadBuilder::classify(&email, &envelope);
        assert_eq!(classified[0].classification, Classification::Bcc);
    }

    #[test]
    fn classification_uses_envelope_names() {
        let email = Email::builder().to(Address::with_name("a@example.com", "Header")).build();
        let envelope = Envelope::new(None, vec![Address::with_name("a@example.com", "Envelope")]);

        let classified = PayloadBuilder::classify(&email, &envelope);
        assert_eq!(classified[0].name, "Envelope");
    }

    #[tokio::test]
    async fn partitions_keep_envelope_order() {
        let email = Email::builder()
            .to("t1@example.com")
            .cc("c1@example.com")
            .to("t2@example.com")
            .cc("c2@example.com")
            .build();
        let envelope = Envelope::new(
            None,
            vec![
                Address::new("c2@example.com"),
                Address::new("t2@example.com"),
                Address::new("c1@example.com"),
                Address::new("t1@example.com"),
            ],
        );

        let payload = PayloadBuilder::build(&email, &envelope).await.unwrap();
        let to: Vec<&str> = payload
            .to
            .iter()
            .map(|r| r.email_address.address.as_str())
            .collect();
        let cc: Vec<&str> = payload
            .cc
            .iter()
            .map(|r| r.email_address.address.as_str())
            .collect();

        assert_eq!(to, vec!["t2@example.com", "t1@example.com"]);
        assert_eq!(cc, vec!["c2@example.com", "c1@example.com"]);
    }

    #[tokio::test]
    async fn full_payload_shape() {
        let email = Email::builder()
            .from(Address::with_name("a@x.com", "A"))
            .to(Address::with_name("to@example.com", "To Person"))
            .cc("cc@example.com")
            .subject("Quarterly report")
            .html("<p>hi</p>")
            .attach(Attachment::from_bytes("hello", "f.txt", "text/plain; charset=utf-8"))
            .build();

        let payload = build(&email).await;
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "subject": "Quarterly report",
                "htmlbody": "<p>hi</p>",
                "from": {"address": "a@x.com", "name": "A"},
                "to": [{"email_address": {"address": "to@example.com", "name": "To Person"}}],
                "cc": [{"email_address": {"address": "cc@example.com"}}],
                "attachments": [
                    {"content": "aGVsbG8=", "name": "f.txt", "mime_type": "text/plain"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn empty_recipient_lists_are_omitted_but_attachments_kept() {
        let email = Email::builder().subject("").build();
        let payload = build(&email).await;
        let value = serde_json::to_value(&payload).unwrap();

        let object = value.as_object().unwrap();
        assert!(!object.contains_key("to"));
        assert!(!object.contains_key("cc"));
        assert!(!object.contains_key("bcc"));
        assert_eq!(object["attachments"], json!([]));
        assert_eq!(object["subject"], json!(""));
    }

    #[tokio::test]
    async fn only_bcc_recipients() {
        let email = Email::builder().bcc("hidden@example.com").build();
        let value = serde_json::to_value(build(&email).await).unwrap();

        assert!(value.get("to").is_none());
        assert!(value.get("cc").is_none());
        assert_eq!(
            value["bcc"],
            json!([{"email_address": {"address": "hidden@example.com"}}])
        );
    }

    #[tokio::test]
    async fn html_body_preferred() {
        let email = Email::builder().html("<p>hi</p>").text("hi").build();
        assert_eq!(build(&email).await.htmlbody, "<p>hi</p>");
    }

    #[tokio::test]
    async fn text_body_fallback() {
        let email = Email::builder().text("hi").build();
        assert_eq!(build(&email).await.htmlbody, "hi");
    }

    #[tokio::test]
    async fn missing_bodies_yield_empty_string() {
        let email = Email::builder().build();
        assert_eq!(build(&email).await.htmlbody, "");
    }

    #[tokio::test]
    async fn sender_from_first_address() {
        let email = Email::builder()
            .from(Address::with_name("a@x.com", "A"))
            .from("b@x.com")
            .build();

        let value = serde_json::to_value(build(&email).await).unwrap();
        assert_eq!(value["from"], json!({"address": "a@x.com", "name": "A"}));
    }

    #[tokio::test]
    async fn sender_without_name() {
        let email = Email::builder().from("a@x.com").build();
        let value = serde_json::to_value(build(&email).await).unwrap();
        assert_eq!(value["from"], json!({"address": "a@x.com", "name": ""}));
    }

    #[tokio::test]
    async fn missing_sender_is_blank() {
        let email = Email::builder().build();
        let value = serde_json::to_value(build(&email).await).unwrap();
        assert_eq!(value["from"], json!({"address": "", "name": ""}));
    }

    #[tokio::test]
    async fn attachment_name_parameter_overrides_filename() {
        let email = Email::builder()
            .attach(Attachment::from_bytes("a", "f.txt", "text/plain"))
            .attach(Attachment::from_bytes("b", "f.txt", "text/plain").with_name("override.txt"))
            .build();

        let payload = build(&email).await;
        assert_eq!(payload.attachments[0].name, "f.txt");
        assert_eq!(payload.attachments[1].name, "override.txt");
    }

    #[tokio::test]
    async fn attachments_keep_order_and_encode_binary() {
        let email = Email::builder()
            .attach(Attachment::from_bytes(vec![0u8, 255, 16], "a.bin", "application/octet-stream"))
            .embed(vec![0x89u8, 0x50, 0x4e, 0x47], "logo.png", "image/png")
            .build();

        let payload = build(&email).await;
        assert_eq!(payload.attachments.len(), 2);
        assert_eq!(payload.attachments[0].content, "AP8Q");
        assert_eq!(payload.attachments[1].name, "logo.png");
        assert_eq!(payload.attachments[1].mime_type, "image/png");
        assert_eq!(payload.attachments[1].content, "iVBORw==");
    }

    #[tokio::test]
    async fn unreadable_attachment_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let email = Email::builder()
            .attach_path(dir.path().join("gone.pdf"), "application/pdf")
            .build();

        let err = PayloadBuilder::build(&email, &Envelope::default())
            .await
            .unwrap_err();

        match err {
            MailError::Internal { detail, source } => {
                assert!(detail.contains("gone.pdf"));
                assert!(source.is_some());
            }
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}

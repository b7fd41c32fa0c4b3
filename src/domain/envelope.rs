//! Transmission envelope.
//!
//! The envelope is the list of mailboxes a message is actually delivered to.
//! It usually mirrors the To/Cc/Bcc headers but is allowed to differ from them.

use serde::{Deserialize, Serialize};

use super::{Address, OutboundMessage};

/// Sender and recipients used for delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Envelope sender, if known.
    pub sender: Option<Address>,
    /// De-duplicated recipient list, in delivery order.
    pub recipients: Vec<Address>,
}

impl Envelope {
    pub fn new(sender: Option<Address>, recipients: Vec<Address>) -> Self {
        Self { sender, recipients }
    }

    /// Derives the envelope from a message's headers.
    ///
    /// The sender is the first `From` address. Recipients are To, then Cc,
    /// then Bcc, keeping the first occurrence of each mailbox.
    pub fn from_message<M: OutboundMessage + ?Sized>(message: &M) -> Self {
        let mut recipients: Vec<Address> = Vec::new();

        for address in message
            .to()
            .iter()
            .chain(message.cc())
            .chain(message.bcc())
        {
            if !recipients.iter().any(|seen| seen.same_mailbox(address)) {
                recipients.push(address.clone());
            }
        }

        Self {
            sender: message.from().first().cloned(),
            recipients,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

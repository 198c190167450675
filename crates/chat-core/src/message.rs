//! Message and participant types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::offer::{format_inr, OfferPayload};

/// The role of a conversation participant.
///
/// A conversation pins both identities, so messages record the author's
/// role rather than a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Customer,
    Seller,
}

impl ParticipantRole {
    /// The counterpart role.
    pub fn other(&self) -> Self {
        match self {
            ParticipantRole::Customer => ParticipantRole::Seller,
            ParticipantRole::Seller => ParticipantRole::Customer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Customer => "customer",
            ParticipantRole::Seller => "seller",
        }
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminates plain text messages from offer messages.
///
/// The payload lives inside the `Offer` variant, so a text message cannot
/// accidentally carry one and an offer message cannot lack one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Offer(OfferPayload),
}

/// A single message in a conversation.
///
/// `id`, `sender`, `text`, `timestamp` and the kind tag are immutable once
/// the message exists; only `is_read` and, for offers, the payload's
/// negotiation fields change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: ParticipantRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    #[serde(flatten)]
    pub kind: MessageKind,
}

impl Message {
    /// Create a plain text message with a fresh id and timestamp.
    pub fn text(sender: ParticipantRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            is_read: false,
            kind: MessageKind::Text,
        }
    }

    /// Create a pending offer message.
    ///
    /// The text is a display summary only; the payload carries the
    /// authoritative price.
    pub fn offer(sender: ParticipantRole, offer_price: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: format!("Offered ₹{} for this vehicle", format_inr(offer_price)),
            timestamp: Utc::now(),
            is_read: false,
            kind: MessageKind::Offer(OfferPayload::new(offer_price)),
        }
    }

    /// The offer payload, when this is an offer message.
    pub fn offer_payload(&self) -> Option<&OfferPayload> {
        match &self.kind {
            MessageKind::Offer(payload) => Some(payload),
            MessageKind::Text => None,
        }
    }

    pub fn is_offer(&self) -> bool {
        matches!(self.kind, MessageKind::Offer(_))
    }
}

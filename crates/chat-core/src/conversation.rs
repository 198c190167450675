//! Conversation state and message-list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, MessageKind, ParticipantRole};
use crate::offer::OfferPayload;

/// A persistent thread between one customer and one seller about one
/// vehicle.
///
/// The message list is append-only and insertion order is chronological
/// order. `last_message_at` always equals the timestamp of the last
/// message, or `created_at` while the conversation is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub customer_id: String,
    pub seller_id: String,
    pub vehicle_id: String,
    pub messages: Vec<Message>,
    pub is_read_by_customer: bool,
    pub is_read_by_seller: bool,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
    pub is_flagged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Create an empty conversation between two participants.
    pub fn new(
        customer_id: impl Into<String>,
        seller_id: impl Into<String>,
        vehicle_id: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            seller_id: seller_id.into(),
            vehicle_id: vehicle_id.into(),
            messages: Vec::new(),
            is_read_by_customer: true,
            is_read_by_seller: true,
            created_at,
            last_message_at: created_at,
            is_flagged: false,
            flag_reason: None,
            flagged_at: None,
        }
    }

    /// Identity of the participant holding `role`.
    pub fn participant(&self, role: ParticipantRole) -> &str {
        match role {
            ParticipantRole::Customer => &self.customer_id,
            ParticipantRole::Seller => &self.seller_id,
        }
    }

    /// Whether `identity` holds `role` in this conversation.
    pub fn has_participant(&self, role: ParticipantRole, identity: &str) -> bool {
        self.participant(role) == identity
    }

    /// Append a message, recompute `last_message_at`, and clear the
    /// recipient role's read flag.
    ///
    /// Messages are never reordered or deduplicated; double-submits from
    /// the UI arrive as distinct messages.
    pub fn record_message(&mut self, message: Message) {
        self.last_message_at = message.timestamp;
        match message.sender {
            ParticipantRole::Customer => self.is_read_by_seller = false,
            ParticipantRole::Seller => self.is_read_by_customer = false,
        }
        self.messages.push(message);
    }

    /// Mark every message not authored by `role` as read and set the
    /// role's conversation-level read flag.
    ///
    /// A reader's own messages are already implicitly read and are left
    /// untouched.
    pub fn mark_read_by(&mut self, role: ParticipantRole) {
        for message in &mut self.messages {
            if message.sender != role {
                message.is_read = true;
            }
        }
        match role {
            ParticipantRole::Customer => self.is_read_by_customer = true,
            ParticipantRole::Seller => self.is_read_by_seller = true,
        }
    }

    /// Mutable access to the payload of the offer message with
    /// `message_id`. Returns `None` when no such message exists or the
    /// message is plain text.
    pub fn offer_mut(&mut self, message_id: &str) -> Option<&mut OfferPayload> {
        self.messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .and_then(|message| match &mut message.kind {
                MessageKind::Offer(payload) => Some(payload),
                MessageKind::Text => None,
            })
    }

    /// Record moderation metadata. Flagging is a separate action and never
    /// part of message flow.
    pub fn flag(&mut self, reason: impl Into<String>, at: DateTime<Utc>) {
        self.is_flagged = true;
        self.flag_reason = Some(reason.into());
        self.flagged_at = Some(at);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages from the other participant that `role` has not read yet.
    pub fn unread_count_for(&self, role: ParticipantRole) -> usize {
        self.messages
            .iter()
            .filter(|message| message.sender != role && !message.is_read)
            .count()
    }
}

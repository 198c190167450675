//! In-memory conversation registry.
//!
//! The registry is the single source of truth for conversation state; all
//! mutation goes through it so parallel views (the active-conversation
//! cache, dashboards) can resynchronize by re-reading. Each mutating call
//! runs under one write lock, so the compound effect of an offer response
//! (payload update plus outcome message) is observed atomically.

use chat_core::{Conversation, Message, OfferResponse, ParticipantRole};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::error::{ChatError, Result};

/// Conversation collection keyed by conversation id, in insertion order.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: RwLock<IndexMap<String, Conversation>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert conversations wholesale. Used at hydration time, not during
    /// normal message flow.
    pub async fn hydrate(&self, conversations: Vec<Conversation>) {
        let mut map = self.conversations.write().await;
        for conversation in conversations {
            map.insert(conversation.id.clone(), conversation);
        }
    }

    /// Insert or replace a single conversation.
    pub async fn insert(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation);
    }

    /// Clone-out read of one conversation.
    pub async fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.conversations.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Stable snapshot of every conversation, in insertion order. This is
    /// what full-snapshot saves persist.
    pub async fn snapshot(&self) -> Vec<Conversation> {
        self.conversations.read().await.values().cloned().collect()
    }

    /// Conversations where `identity` holds `role`. A stable snapshot for
    /// a dashboard render; callers re-query rather than hold references.
    pub async fn for_participant(
        &self,
        role: ParticipantRole,
        identity: &str,
    ) -> Vec<Conversation> {
        self.conversations
            .read()
            .await
            .values()
            .filter(|conversation| conversation.has_participant(role, identity))
            .cloned()
            .collect()
    }

    /// Append a message to a conversation, updating `last_message_at` and
    /// the recipient's read flag.
    pub async fn append_message(&self, id: &str, message: Message) -> Result<()> {
        let mut map = self.conversations.write().await;
        let conversation = map
            .get_mut(id)
            .ok_or_else(|| ChatError::conversation_not_found(id))?;
        conversation.record_message(message);
        Ok(())
    }

    /// Mark every message from the other participant as read.
    pub async fn mark_read(&self, id: &str, role: ParticipantRole) -> Result<()> {
        let mut map = self.conversations.write().await;
        let conversation = map
            .get_mut(id)
            .ok_or_else(|| ChatError::conversation_not_found(id))?;
        conversation.mark_read_by(role);
        Ok(())
    }

    /// Apply an offer response and append the outcome message in one
    /// locked step.
    ///
    /// Fails without touching the conversation when the conversation or
    /// offer message is missing or the offer is already resolved, so a
    /// reader never observes the payload updated without the outcome
    /// message or vice versa.
    pub async fn respond_to_offer(
        &self,
        id: &str,
        message_id: &str,
        response: OfferResponse,
        responder: ParticipantRole,
    ) -> Result<Message> {
        let mut map = self.conversations.write().await;
        let conversation = map
            .get_mut(id)
            .ok_or_else(|| ChatError::conversation_not_found(id))?;

        let payload = conversation
            .offer_mut(message_id)
            .ok_or_else(|| ChatError::NotFound {
                entity: "offer message",
                id: message_id.to_string(),
            })?;
        payload.respond(response)?;

        let outcome = Message::text(responder, response.outcome_text());
        conversation.record_message(outcome.clone());
        Ok(outcome)
    }

    /// Record moderation metadata on a conversation.
    pub async fn flag(&self, id: &str, reason: &str, at: DateTime<Utc>) -> Result<()> {
        let mut map = self.conversations.write().await;
        let conversation = map
            .get_mut(id)
            .ok_or_else(|| ChatError::conversation_not_found(id))?;
        conversation.flag(reason, at);
        Ok(())
    }
}

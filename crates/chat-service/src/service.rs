//! Conversation service facade.

use chat_core::{Conversation, Message, Notification, OfferResponse, ParticipantRole};
use chat_store::SnapshotStore;
use chrono::Utc;
use notifier::{notification_for, NotificationSink};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ChatError, Result};
use crate::registry::ConversationRegistry;

/// The conversation currently being typed into.
///
/// At most one indicator is tracked process-wide; it is neither persisted
/// nor notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    pub conversation_id: String,
    pub role: ParticipantRole,
}

/// Single entry point for conversation mutations.
///
/// Every operation is all-or-nothing with respect to the registry: an
/// unknown conversation id fails with [`ChatError::NotFound`] before any
/// mutation. Successful mutations then fan out a notification, persist the
/// full snapshot, and refresh the active-conversation cache, in that
/// order. Memory is the source of truth (local-first); a fan-out or
/// persistence failure propagates to the caller but does not revert it.
pub struct ChatService<S: SnapshotStore, N: NotificationSink> {
    registry: ConversationRegistry,
    store: S,
    sink: N,
    active: RwLock<Option<Conversation>>,
    typing: RwLock<Option<TypingState>>,
}

impl<S: SnapshotStore, N: NotificationSink> ChatService<S, N> {
    /// Hydrate the registry from the store and wire up the sink.
    pub async fn load(store: S, sink: N) -> Result<Self> {
        let conversations = store.load_conversations().await?;
        info!(count = conversations.len(), "Hydrating conversation registry");

        let registry = ConversationRegistry::new();
        registry.hydrate(conversations).await;

        Ok(Self {
            registry,
            store,
            sink,
            active: RwLock::new(None),
            typing: RwLock::new(None),
        })
    }

    /// Create and persist an empty conversation between a customer and a
    /// seller about one vehicle.
    pub async fn start_conversation(
        &self,
        customer_id: impl Into<String>,
        seller_id: impl Into<String>,
        vehicle_id: impl Into<String>,
    ) -> Result<Conversation> {
        let conversation = Conversation::new(customer_id, seller_id, vehicle_id);
        info!(
            conversation = %conversation.id,
            vehicle = %conversation.vehicle_id,
            "Starting conversation"
        );

        self.registry.insert(conversation.clone()).await;
        self.persist().await?;
        Ok(conversation)
    }

    /// Send a plain text message.
    ///
    /// The text must be non-empty after trimming. Returns the appended
    /// message.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
        sender: ParticipantRole,
    ) -> Result<Message> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::Validation(
                "message text must not be empty".to_string(),
            ));
        }

        let message = Message::text(sender, trimmed);
        self.registry
            .append_message(conversation_id, message.clone())
            .await?;
        debug!(conversation = %conversation_id, sender = %sender, "Appended text message");

        self.finish_mutation(conversation_id, sender, &message.text)
            .await?;
        Ok(message)
    }

    /// Send an offer message with a pending payload.
    pub async fn send_offer(
        &self,
        conversation_id: &str,
        offer_price: i64,
        sender: ParticipantRole,
    ) -> Result<Message> {
        if offer_price <= 0 {
            return Err(ChatError::Validation(format!(
                "offer price must be positive, got {}",
                offer_price
            )));
        }

        let message = Message::offer(sender, offer_price);
        self.registry
            .append_message(conversation_id, message.clone())
            .await?;
        info!(
            conversation = %conversation_id,
            price = offer_price,
            "Appended offer message"
        );

        self.finish_mutation(conversation_id, sender, &message.text)
            .await?;
        Ok(message)
    }

    /// Respond to a pending or countered offer.
    ///
    /// The payload transition and the outcome message are applied in one
    /// registry step, so no reader observes one without the other. Returns
    /// the appended outcome message.
    pub async fn respond_to_offer(
        &self,
        conversation_id: &str,
        message_id: &str,
        response: OfferResponse,
        responder: ParticipantRole,
    ) -> Result<Message> {
        if let OfferResponse::Counter { price } = response {
            if price <= 0 {
                return Err(ChatError::Validation(format!(
                    "counter price must be positive, got {}",
                    price
                )));
            }
        }

        let outcome = self
            .registry
            .respond_to_offer(conversation_id, message_id, response, responder)
            .await?;
        info!(
            conversation = %conversation_id,
            message = %message_id,
            "Recorded offer response"
        );

        self.finish_mutation(conversation_id, responder, &outcome.text)
            .await?;
        Ok(outcome)
    }

    /// Mark every message from the other participant as read.
    ///
    /// Reading is not an event the other party hears about; no
    /// notification is created.
    pub async fn mark_read(&self, conversation_id: &str, reader: ParticipantRole) -> Result<()> {
        self.registry.mark_read(conversation_id, reader).await?;
        self.persist().await?;
        self.refresh_active(conversation_id).await;
        Ok(())
    }

    /// Record moderation metadata on a conversation. Outside message flow;
    /// no notification, no read-flag change.
    pub async fn flag_conversation(&self, conversation_id: &str, reason: &str) -> Result<()> {
        self.registry
            .flag(conversation_id, reason, Utc::now())
            .await?;
        info!(conversation = %conversation_id, reason = %reason, "Flagged conversation");

        self.persist().await?;
        self.refresh_active(conversation_id).await;
        Ok(())
    }

    /// Update the process-wide typing indicator. Ephemeral: not persisted,
    /// not notified.
    pub async fn set_typing(
        &self,
        conversation_id: &str,
        role: ParticipantRole,
        is_typing: bool,
    ) -> Result<()> {
        if !self.registry.contains(conversation_id).await {
            return Err(ChatError::conversation_not_found(conversation_id));
        }

        let mut typing = self.typing.write().await;
        if is_typing {
            *typing = Some(TypingState {
                conversation_id: conversation_id.to_string(),
                role,
            });
        } else if typing
            .as_ref()
            .is_some_and(|state| state.conversation_id == conversation_id)
        {
            *typing = None;
        }
        Ok(())
    }

    /// The current typing indicator, if any.
    pub async fn typing(&self) -> Option<TypingState> {
        self.typing.read().await.clone()
    }

    /// Pin a conversation as the one on screen. Mutating operations
    /// refresh this copy from the registry so the UI never displays stale
    /// state relative to what was just written.
    pub async fn open_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let conversation = self
            .registry
            .get(conversation_id)
            .await
            .ok_or_else(|| ChatError::conversation_not_found(conversation_id))?;
        *self.active.write().await = Some(conversation.clone());
        Ok(conversation)
    }

    /// Clear the active-conversation cache.
    pub async fn close_conversation(&self) {
        *self.active.write().await = None;
    }

    /// The cached active conversation, if one is open.
    pub async fn active_conversation(&self) -> Option<Conversation> {
        self.active.read().await.clone()
    }

    /// Clone-out read of one conversation.
    pub async fn conversation(&self, conversation_id: &str) -> Option<Conversation> {
        self.registry.get(conversation_id).await
    }

    /// Conversations where `identity` holds `role`, for dashboards.
    pub async fn conversations_for(
        &self,
        role: ParticipantRole,
        identity: &str,
    ) -> Vec<Conversation> {
        self.registry.for_participant(role, identity).await
    }

    /// Notifications addressed to `recipient`.
    pub async fn notifications_for(&self, recipient: &str) -> Result<Vec<Notification>> {
        Ok(self.sink.for_recipient(recipient).await?)
    }

    /// The underlying registry, for read-side collaborators.
    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// The notification sink.
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Fan out a notification, persist the snapshot, and refresh the
    /// active cache after a successful registry mutation.
    async fn finish_mutation(
        &self,
        conversation_id: &str,
        sender: ParticipantRole,
        text: &str,
    ) -> Result<()> {
        let conversation = self
            .registry
            .get(conversation_id)
            .await
            .ok_or_else(|| ChatError::conversation_not_found(conversation_id))?;

        if let Some(notification) = notification_for(&conversation, sender, text) {
            self.sink.publish(notification).await?;
        }

        self.persist().await?;
        self.refresh_active(conversation_id).await;
        Ok(())
    }

    /// Write the registry's full snapshot to the store.
    async fn persist(&self) -> Result<()> {
        let snapshot = self.registry.snapshot().await;
        self.store.save_conversations(&snapshot).await?;
        Ok(())
    }

    /// Re-read the active conversation from the registry if it matches the
    /// just-mutated id.
    async fn refresh_active(&self, conversation_id: &str) {
        let mut active = self.active.write().await;
        if active
            .as_ref()
            .is_some_and(|conversation| conversation.id == conversation_id)
        {
            *active = self.registry.get(conversation_id).await;
        }
    }
}

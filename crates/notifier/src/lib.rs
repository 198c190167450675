//! Notification fan-out for ReRide conversations.
//!
//! Whenever a message lands in a conversation, exactly one notification is
//! derived for the participant who did not send it. This crate provides
//! the derivation ([`notification_for`]), the preview truncation rule, and
//! the [`NotificationSink`] trait the conversation service publishes
//! through.
//!
//! Fan-out is fire-and-forget from the UI's perspective, but the sink must
//! complete or fail loudly before the triggering operation returns, so a
//! crash between message append and notification creation is a detectable
//! partial failure rather than a silent drop.

use async_trait::async_trait;
use chat_core::{Conversation, Notification, ParticipantRole};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Maximum number of characters of the triggering text kept in a
/// notification preview.
pub const PREVIEW_LIMIT: usize = 50;

/// Errors that can occur while publishing notifications.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Referenced notification does not exist.
    #[error("notification not found: {0}")]
    NotFound(String),

    /// The sink's backing transport failed.
    #[error("notification sink unavailable: {0}")]
    Sink(String),
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Truncate message text for a notification preview: the first
/// [`PREVIEW_LIMIT`] characters plus `...` when the text is longer,
/// otherwise the text unchanged.
pub fn truncate_preview(text: &str) -> String {
    let mut chars = text.chars();
    let preview: String = chars.by_ref().take(PREVIEW_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Derive the notification for a message sent into `conversation` by the
/// participant holding `sender`.
///
/// The recipient is the other participant. Returns `None` when the
/// recipient identity cannot be resolved; a notification cannot be
/// attributed to nobody.
pub fn notification_for(
    conversation: &Conversation,
    sender: ParticipantRole,
    text: &str,
) -> Option<Notification> {
    let recipient = conversation.participant(sender.other());
    if recipient.is_empty() {
        debug!(
            conversation = %conversation.id,
            sender = %sender,
            "No resolvable recipient, skipping notification"
        );
        return None;
    }

    Some(Notification::conversation(
        recipient,
        truncate_preview(text),
        &conversation.id,
    ))
}

/// Destination for derived notifications.
///
/// Abstracted so the service can publish to an in-memory store, a
/// database, or a push transport without caring which.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Record one notification. Must complete or fail before the
    /// triggering operation is considered done.
    async fn publish(&self, notification: Notification) -> Result<()>;

    /// Notifications addressed to `recipient`, oldest first.
    async fn for_recipient(&self, recipient: &str) -> Result<Vec<Notification>>;

    /// Mark one notification as read.
    async fn mark_read(&self, id: &str) -> Result<()>;

    /// Unread notification count for `recipient`.
    async fn unread_count(&self, recipient: &str) -> Result<usize>;
}

/// An in-memory sink backed by an append-only list.
#[derive(Debug, Default)]
pub struct InMemorySink {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of notifications published so far.
    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }
}

#[async_trait]
impl NotificationSink for InMemorySink {
    async fn publish(&self, notification: Notification) -> Result<()> {
        info!(
            recipient = %notification.recipient_email,
            target = %notification.target_id,
            "Publishing notification"
        );
        self.notifications.write().await.push(notification);
        Ok(())
    }

    async fn for_recipient(&self, recipient: &str) -> Result<Vec<Notification>> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_email == recipient)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotifyError::NotFound(id.to_string()))?;
        notification.is_read = true;
        Ok(())
    }

    async fn unread_count(&self, recipient: &str) -> Result<usize> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_email == recipient && !n.is_read)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::TargetType;

    fn conversation() -> Conversation {
        Conversation::new("buyer@reride.in", "dealer@reride.in", "veh_42")
    }

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(truncate_preview("Is this still available?"), "Is this still available?");
    }

    #[test]
    fn test_exactly_fifty_chars_is_unchanged() {
        let text = "a".repeat(50);
        assert_eq!(truncate_preview(&text), text);
    }

    #[test]
    fn test_long_text_is_truncated_with_ellipsis() {
        // 73 characters in, exactly 53 out (50 + "...").
        let text = "x".repeat(73);
        let preview = truncate_preview(&text);
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "₹".repeat(51);
        let preview = truncate_preview(&text);
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn test_notification_targets_the_other_participant() {
        let conv = conversation();

        let to_seller =
            notification_for(&conv, ParticipantRole::Customer, "Is this still available?").unwrap();
        assert_eq!(to_seller.recipient_email, "dealer@reride.in");
        assert_eq!(to_seller.target_id, conv.id);
        assert_eq!(to_seller.target_type, TargetType::Conversation);

        let to_customer = notification_for(&conv, ParticipantRole::Seller, "Yes!").unwrap();
        assert_eq!(to_customer.recipient_email, "buyer@reride.in");
    }

    #[test]
    fn test_unresolvable_recipient_skips_notification() {
        let mut conv = conversation();
        conv.seller_id = String::new();
        assert!(notification_for(&conv, ParticipantRole::Customer, "hello").is_none());
    }

    #[tokio::test]
    async fn test_in_memory_sink_filters_by_recipient() {
        let sink = InMemorySink::new();
        let conv = conversation();

        sink.publish(notification_for(&conv, ParticipantRole::Customer, "one").unwrap())
            .await
            .unwrap();
        sink.publish(notification_for(&conv, ParticipantRole::Seller, "two").unwrap())
            .await
            .unwrap();

        let seller_inbox = sink.for_recipient("dealer@reride.in").await.unwrap();
        assert_eq!(seller_inbox.len(), 1);
        assert_eq!(seller_inbox[0].message, "one");
        assert_eq!(sink.len().await, 2);
    }

    #[tokio::test]
    async fn test_mark_read_and_unread_count() {
        let sink = InMemorySink::new();
        let conv = conversation();

        let notification = notification_for(&conv, ParticipantRole::Customer, "one").unwrap();
        let id = notification.id.clone();
        sink.publish(notification).await.unwrap();

        assert_eq!(sink.unread_count("dealer@reride.in").await.unwrap(), 1);
        sink.mark_read(&id).await.unwrap();
        assert_eq!(sink.unread_count("dealer@reride.in").await.unwrap(), 0);

        let err = sink.mark_read("missing").await.unwrap_err();
        assert!(matches!(err, NotifyError::NotFound(_)));
    }
}

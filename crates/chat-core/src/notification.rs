//! Notification records derived from conversation events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a notification points at. Only conversations today; listings and
/// support tickets notify through other channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Conversation,
}

/// A notification for the participant who did not send the triggering
/// message.
///
/// Notifications are persisted independently of the conversation they
/// point at, so they survive even if conversation state is later trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_email: String,
    /// Truncated preview of the triggering text.
    pub message: String,
    pub target_id: String,
    pub target_type: TargetType,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create an unread conversation notification.
    pub fn conversation(
        recipient_email: impl Into<String>,
        message: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient_email: recipient_email.into(),
            message: message.into(),
            target_id: target_id.into(),
            target_type: TargetType::Conversation,
            is_read: false,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_starts_unread() {
        let notification = Notification::conversation("dealer@reride.in", "hello", "conv_1");
        assert!(!notification.is_read);
        assert_eq!(notification.target_type, TargetType::Conversation);
        assert_eq!(notification.target_id, "conv_1");
    }

    #[test]
    fn test_notification_serde_shape() {
        let notification = Notification::conversation("dealer@reride.in", "hello", "conv_1");
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["recipientEmail"], "dealer@reride.in");
        assert_eq!(json["targetType"], "conversation");
        assert_eq!(json["isRead"], false);

        let restored: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(restored, notification);
    }
}

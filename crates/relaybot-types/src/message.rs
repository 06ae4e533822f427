use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chat ID type (Telegram chat ID)
pub type ChatId = i64;

/// Message received from a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Correlation id used in log spans
    pub id: Uuid,
    pub chat_id: ChatId,
    /// `None` for stickers, photos and other non-text messages
    pub text: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(chat_id: ChatId, text: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            text,
            received_at: Utc::now(),
        }
    }

    /// Convenience constructor for a plain text message
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self::new(chat_id, Some(text.into()))
    }

    /// Text content, empty for non-text messages
    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Time since the message was received, clamped at zero
    pub fn age(&self) -> Duration {
        (Utc::now() - self.received_at).max(Duration::zero())
    }

    /// A command is any text starting with `/`
    pub fn is_command(&self) -> bool {
        self.body().starts_with('/')
    }
}

/// Reply produced for exactly one incoming message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingReply {
    pub chat_id: ChatId,
    pub text: String,
}

impl OutgoingReply {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_detection() {
        assert!(IncomingMessage::text(1, "/start").is_command());
        assert!(IncomingMessage::text(1, "/unknown arg").is_command());
        assert!(!IncomingMessage::text(1, "hello /start").is_command());
        assert!(!IncomingMessage::text(1, " /start").is_command());
    }

    #[test]
    fn test_non_text_message_is_not_command() {
        let message = IncomingMessage::new(42, None);
        assert!(!message.is_command());
        assert_eq!(message.body(), "");
    }

    #[test]
    fn test_age_counts_from_receipt() {
        let mut message = IncomingMessage::text(1, "hi");
        message.received_at = Utc::now() - Duration::seconds(3);
        assert!(message.age() >= Duration::seconds(3));

        // clock skew never yields a negative age
        message.received_at = Utc::now() + Duration::seconds(60);
        assert_eq!(message.age(), Duration::zero());
    }

    #[test]
    fn test_each_message_gets_its_own_id() {
        let a = IncomingMessage::text(1, "hi");
        let b = IncomingMessage::text(1, "hi");
        assert_ne!(a.id, b.id);
    }
}

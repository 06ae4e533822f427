//! Messaging channels for RelayBot
//!
//! A [`MessageChannel`] delivers incoming messages and sends replies. The
//! [`Relay`] pulls messages from a channel, runs them through the intent
//! dispatcher and sends back whatever reply it produces.

use async_trait::async_trait;
use relaybot_types::{ChatId, DeliveryError, IncomingMessage};

mod relay;
mod telegram;

pub use relay::Relay;
pub use telegram::{DeliveryMode, TelegramChannel, TelegramListener};

/// Transport that receives chat messages and delivers replies
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Wait for the next message; `None` once the channel has shut down
    async fn receive(&self) -> Option<IncomingMessage>;

    /// Deliver a reply. One attempt, no retries.
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError>;
}

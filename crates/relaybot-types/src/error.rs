//! Error types shared across the RelayBot crates

use thiserror::Error;

use crate::ChatId;

/// Weather lookup failures
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Provider does not know the requested city (HTTP 404)
    #[error("City '{city}' not found")]
    NotFound {
        /// City as it was requested
        city: String,
    },

    /// Any other failure: transport, timeout, non-2xx status, malformed payload
    #[error("Weather provider error: {0}")]
    Provider(String),
}

/// Outbound delivery failures
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to send reply to chat {chat_id}: {reason}")]
    Send { chat_id: ChatId, reason: String },
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Telegram bot token is not configured. Set BOT_TOKEN (or TELEGRAM_BOT_TOKEN) \
         or edit ~/.relaybot/relaybot.toml"
    )]
    MissingChannelToken,

    #[error("Webhook delivery requires delivery.webhook_url (or WEBHOOK_URL)")]
    MissingWebhookUrl,

    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("Invalid listen address '{0}'")]
    InvalidListenAddr(String),

    #[error("Unknown delivery mode '{0}', expected 'polling' or 'webhook'")]
    InvalidDeliveryMode(String),
}

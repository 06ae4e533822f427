use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use relaybot_types::{ChatId, DeliveryError, IncomingMessage};
use std::future::Future;
use std::net::SocketAddr;
use teloxide::{
    error_handlers::LoggingErrorHandler, prelude::*, types::ChatId as TelegramChatId,
    update_listeners::webhooks,
};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use url::Url;

use crate::MessageChannel;

/// Messages buffered between the update listener and the relay
const INBOX_CAPACITY: usize = 256;

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Long polling; removes any webhook left over from a previous deployment
    Polling,
    /// Telegram pushes updates to `url`, served locally on `listen_addr`
    Webhook { url: Url, listen_addr: SocketAddr },
}

/// Telegram side of the relay: sends replies and hands out received messages
pub struct TelegramChannel {
    bot: Bot,
    inbox: Mutex<mpsc::Receiver<IncomingMessage>>,
}

/// Feeds Telegram updates into a [`TelegramChannel`]; run it next to the relay
pub struct TelegramListener {
    bot: Bot,
    mode: DeliveryMode,
    inbox: mpsc::Sender<IncomingMessage>,
}

impl TelegramChannel {
    /// Validate the token and create the channel together with its listener
    pub async fn connect(token: &str, mode: DeliveryMode) -> Result<(Self, TelegramListener)> {
        let bot = Bot::new(token);
        validate_token(&bot).await?;

        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        info!("Telegram channel initialized ({:?})", mode);

        let channel = Self {
            bot: bot.clone(),
            inbox: Mutex::new(rx),
        };
        let listener = TelegramListener {
            bot,
            mode,
            inbox: tx,
        };
        Ok((channel, listener))
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn receive(&self) -> Option<IncomingMessage> {
        self.inbox.lock().await.recv().await
    }

    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(TelegramChatId(chat_id), text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Send {
                chat_id,
                reason: e.to_string(),
            })
    }
}

impl TelegramListener {
    /// Receive updates until `stop` resolves or the listener fails.
    ///
    /// On `stop` the dispatcher finishes the updates it is handling, then the
    /// inbox sender is dropped so the relay sees the channel close.
    pub async fn run<S>(self, stop: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let Self { bot, mode, inbox } = self;
        let handler = Update::filter_message().endpoint(forward_message);

        let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
            .dependencies(dptree::deps![inbox])
            .default_handler(|upd| async move {
                debug!("Ignoring non-message update: {:?}", upd.id);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .build();

        let token = dispatcher.shutdown_token();
        let stopper = tokio::spawn(async move {
            stop.await;
            match token.shutdown() {
                Ok(done) => {
                    info!("Stopping Telegram dispatcher...");
                    done.await;
                }
                Err(_) => debug!("Telegram dispatcher is not running, nothing to stop"),
            }
        });

        let result = match mode {
            DeliveryMode::Polling => {
                info!("Receiving Telegram updates via long polling");
                dispatcher.dispatch().await;
                Ok(())
            }
            DeliveryMode::Webhook { url, listen_addr } => {
                info!("Registering webhook {} (listening on {})", url, listen_addr);
                match webhooks::axum(bot, webhooks::Options::new(listen_addr, url)).await {
                    Ok(listener) => {
                        dispatcher
                            .dispatch_with_listener(
                                listener,
                                LoggingErrorHandler::with_custom_text(
                                    "An error from the webhook listener",
                                ),
                            )
                            .await;
                        Ok(())
                    }
                    Err(e) => Err(e).context("Failed to set up Telegram webhook"),
                }
            }
        };

        stopper.abort();
        result
    }
}

/// Validate the bot token by making a test API call
async fn validate_token(bot: &Bot) -> Result<()> {
    info!("Validating Telegram bot token...");

    match bot.get_me().await {
        Ok(me) => {
            info!("Telegram bot token is valid (@{})", me.username());
            Ok(())
        }
        Err(teloxide::RequestError::Api(teloxide::ApiError::InvalidToken)) => Err(anyhow!(
            "Invalid Telegram bot token. Please check BOT_TOKEN environment variable \
             or edit ~/.relaybot/relaybot.toml"
        )),
        Err(e) => Err(anyhow!("Failed to validate Telegram bot token: {}", e)),
    }
}

/// Convert a Telegram message and queue it for the relay
async fn forward_message(
    msg: Message,
    inbox: mpsc::Sender<IncomingMessage>,
) -> ResponseResult<()> {
    let incoming = IncomingMessage::new(msg.chat.id.0, msg.text().map(str::to_owned));
    debug!(
        "Telegram message {} in chat {}: {:?}",
        incoming.id, incoming.chat_id, incoming.text
    );

    let chat_id = incoming.chat_id;
    if inbox.send(incoming).await.is_err() {
        warn!("Relay is no longer receiving, dropping message from chat {}", chat_id);
    }

    Ok(())
}

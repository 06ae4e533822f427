use relaybot_dispatch::IntentDispatcher;
use relaybot_types::IncomingMessage;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, Instrument};

use crate::MessageChannel;

/// Pulls messages from a channel and answers each one independently
pub struct Relay {
    dispatcher: Arc<IntentDispatcher>,
    channel: Arc<dyn MessageChannel>,
}

impl Relay {
    pub fn new(dispatcher: Arc<IntentDispatcher>, channel: Arc<dyn MessageChannel>) -> Self {
        Self {
            dispatcher,
            channel,
        }
    }

    /// Run until the channel closes, then wait for in-flight replies
    pub async fn run(&self) {
        info!("Relay started");
        let mut in_flight = JoinSet::new();

        while let Some(message) = self.channel.receive().await {
            let span = info_span!("message", id = %message.id, chat_id = message.chat_id);
            in_flight.spawn(
                Self::handle(self.dispatcher.clone(), self.channel.clone(), message)
                    .instrument(span),
            );

            while let Some(finished) = in_flight.try_join_next() {
                if let Err(e) = finished {
                    error!("Message task failed: {}", e);
                }
            }
        }

        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                error!("Message task failed: {}", e);
            }
        }
        info!("Relay stopped: channel closed");
    }

    /// Classify, compose and send the reply for one message
    pub async fn handle(
        dispatcher: Arc<IntentDispatcher>,
        channel: Arc<dyn MessageChannel>,
        message: IncomingMessage,
    ) {
        let Some(reply) = dispatcher.dispatch(&message).await else {
            return;
        };

        match channel.send(reply.chat_id, &reply.text).await {
            Ok(()) => debug!("Reply sent {} ms after receipt", message.age().num_milliseconds()),
            Err(e) => error!("{}", e),
        }
    }
}

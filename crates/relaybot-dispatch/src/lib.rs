//! RelayBot dispatch - the message-intent pipeline
//!
//! One incoming message goes through [`IntentClassifier`] and then
//! [`ResponseComposer`]; [`IntentDispatcher`] ties the two together and is the
//! only thing the channel layer talks to.

pub mod classifier;
pub mod composer;
pub mod format;
pub mod replies;

use relaybot_provider::WeatherProvider;
use relaybot_types::{IncomingMessage, OutgoingReply};
use std::sync::Arc;
use tracing::{debug, info};

pub use classifier::{IntentClassifier, DEFAULT_CITY};
pub use composer::ResponseComposer;

/// Classifies a message and composes its reply
pub struct IntentDispatcher {
    classifier: IntentClassifier,
    composer: ResponseComposer,
}

impl IntentDispatcher {
    /// Build the dispatcher; `weather` is `None` when no API key is configured
    pub fn new(weather: Option<Arc<dyn WeatherProvider>>) -> Result<Self, regex::Error> {
        Ok(Self {
            classifier: IntentClassifier::new()?,
            composer: ResponseComposer::new(weather),
        })
    }

    /// Produce the reply for a message, or `None` for unrecognized commands
    pub async fn dispatch(&self, message: &IncomingMessage) -> Option<OutgoingReply> {
        let Some(intent) = self.classifier.classify(message) else {
            debug!("Unrecognized command, skipping: {:?}", message.text);
            return None;
        };

        info!("Classified message as {}", intent);
        let text = self.composer.compose(&intent).await;
        Some(OutgoingReply::new(message.chat_id, text))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reply_goes_to_the_same_chat() {
        let dispatcher = IntentDispatcher::new(None).unwrap();

        let reply = dispatcher
            .dispatch(&IncomingMessage::text(-100_42, "/help"))
            .await
            .unwrap();

        assert_eq!(reply.chat_id, -100_42);
        assert_eq!(reply.text, replies::HELP);
    }

    #[tokio::test]
    async fn test_unknown_command_has_no_reply() {
        let dispatcher = IntentDispatcher::new(None).unwrap();

        let reply = dispatcher
            .dispatch(&IncomingMessage::text(1, "/unknowncommand"))
            .await;

        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_weather_without_key_still_replies() {
        let dispatcher = IntentDispatcher::new(None).unwrap();

        let reply = dispatcher
            .dispatch(&IncomingMessage::text(1, "погода в Токио"))
            .await
            .unwrap();

        assert_eq!(reply.text, replies::WEATHER_NOT_CONFIGURED);
    }
}

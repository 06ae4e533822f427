use relaybot_provider::WeatherProvider;
use relaybot_types::{Intent, WeatherError};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::format::format_weather;
use crate::replies;

/// Turns an intent into reply text
pub struct ResponseComposer {
    /// `None` when no weather API key is configured
    weather: Option<Arc<dyn WeatherProvider>>,
}

impl ResponseComposer {
    pub fn new(weather: Option<Arc<dyn WeatherProvider>>) -> Self {
        if weather.is_none() {
            warn!("No weather provider configured, weather requests will get a configuration error");
        }
        Self { weather }
    }

    /// Compose the reply. Never fails: provider errors become user-facing text.
    pub async fn compose(&self, intent: &Intent) -> String {
        match intent {
            Intent::StartCommand => replies::welcome(),
            Intent::HelpCommand => replies::HELP.to_string(),
            Intent::WeatherRequest { city } => self.weather_reply(city).await,
            Intent::FreeText => replies::greeting(),
        }
    }

    async fn weather_reply(&self, city: &str) -> String {
        let Some(provider) = &self.weather else {
            return replies::WEATHER_NOT_CONFIGURED.to_string();
        };

        match provider.fetch(city).await {
            Ok(reading) => format_weather(&reading),
            Err(WeatherError::NotFound { city: missing }) => {
                info!("City '{}' not found by weather provider", missing);
                replies::city_not_found(city)
            }
            Err(e) => {
                error!("Weather lookup for '{}' failed: {}", city, e);
                replies::WEATHER_FAILED.to_string()
            }
        }
    }
}

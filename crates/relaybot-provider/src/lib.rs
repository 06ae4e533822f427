//! Weather providers for RelayBot
//!
//! The relay only depends on the [`WeatherProvider`] capability; the
//! OpenWeatherMap client is the production implementation.

use async_trait::async_trait;
use relaybot_types::{WeatherError, WeatherReading};

mod openweather;

pub use openweather::{OpenWeatherClient, OpenWeatherConfig, DEFAULT_BASE_URL};

/// Source of current weather conditions for a city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Look up current conditions.
    ///
    /// Returns [`WeatherError::NotFound`] when the provider does not know the
    /// city and [`WeatherError::Provider`] for every other failure.
    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError>;
}

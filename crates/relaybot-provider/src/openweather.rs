use anyhow::{Context, Result};
use async_trait::async_trait;
use relaybot_types::{ConditionCode, WeatherError, WeatherReading};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::WeatherProvider;

/// Public OpenWeatherMap API root
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY: usize = 200;

/// OpenWeatherMap client settings
#[derive(Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub base_url: String,
    /// Language of the condition description (`ru`, `en`, ...)
    pub lang: String,
    pub timeout: Duration,
}

impl OpenWeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: "ru".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the API key out of logs
impl fmt::Debug for OpenWeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("lang", &self.lang)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `GET /weather` response, only the fields the relay uses
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: String,
    weather: Vec<Condition>,
    main: MainReadings,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentWeather {
    fn into_reading(self) -> Result<WeatherReading, WeatherError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Provider("response contains no weather conditions".to_string())
        })?;

        Ok(WeatherReading {
            location_name: self.name,
            condition: ConditionCode::parse(&condition.main),
            description: condition.description,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_percent: self.main.humidity,
            wind_speed_ms: self.wind.speed,
        })
    }
}

/// Weather provider backed by the OpenWeatherMap current weather API
pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    /// Create a new client; the HTTP client is built once and reused
    pub fn new(config: OpenWeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeatherMap")?;

        info!("OpenWeatherMap provider initialized: {:?}", config);
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        debug!("Requesting current weather for '{}'", city);

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .await
            // the URL carries the API key
            .map_err(|e| WeatherError::Provider(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::NotFound {
                city: city.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Provider(e.without_url().to_string()))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(WeatherError::Provider(format!(
                "OpenWeatherMap API error ({}): {}",
                status, snippet
            )));
        }

        let current: CurrentWeather = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Provider(format!("Failed to parse OpenWeatherMap response: {}", e))
        })?;

        current.into_reading()
    }
}

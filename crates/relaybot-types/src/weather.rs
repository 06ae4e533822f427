use serde::{Deserialize, Serialize};

/// Weather group reported by the provider (`weather[0].main` in OpenWeatherMap)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionCode {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    /// Any group outside the known set, kept verbatim
    Other(String),
}

impl ConditionCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for ConditionCode {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

/// Current conditions for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub condition: ConditionCode,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_percent: u8,
    pub wind_speed_ms: f64,
}

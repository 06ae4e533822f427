//! Weather reply formatting

use relaybot_types::{ConditionCode, WeatherReading};

/// Emoji for conditions outside the known set
pub const DEFAULT_EMOJI: &str = "🌤️";

pub fn condition_emoji(condition: &ConditionCode) -> &'static str {
    match condition {
        ConditionCode::Clear => "☀️",
        ConditionCode::Clouds => "☁️",
        ConditionCode::Rain => "🌧️",
        ConditionCode::Drizzle => "🌦️",
        ConditionCode::Thunderstorm => "⛈️",
        ConditionCode::Snow => "❄️",
        ConditionCode::Mist | ConditionCode::Fog => "🌫️",
        ConditionCode::Other(_) => DEFAULT_EMOJI,
    }
}

/// Round half away from zero to a whole degree
fn whole_degrees(celsius: f64) -> i64 {
    // `as` saturates, and -0.4 rounds to -0.0 which prints as 0
    celsius.round() as i64
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_weather(reading: &WeatherReading) -> String {
    format!(
        "{} Weather in {}:\n\n\
         🌡️ Temperature: {}°C (feels like {}°C)\n\
         ☁️ {}\n\
         💧 Humidity: {}%\n\
         💨 Wind: {} m/s",
        condition_emoji(&reading.condition),
        reading.location_name,
        whole_degrees(reading.temperature_c),
        whole_degrees(reading.feels_like_c),
        capitalize_first(&reading.description),
        reading.humidity_percent,
        reading.wind_speed_ms,
    )
}

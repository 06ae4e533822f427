use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of an incoming message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// `/start`
    StartCommand,
    /// `/help`
    HelpCommand,
    /// `/weather`, `/погода` or a weather keyword in free text
    WeatherRequest { city: String },
    /// Anything else that is not a command
    FreeText,
}

impl Intent {
    pub fn weather(city: impl Into<String>) -> Self {
        Self::WeatherRequest { city: city.into() }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StartCommand => "start",
            Self::HelpCommand => "help",
            Self::WeatherRequest { .. } => "weather",
            Self::FreeText => "free_text",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeatherRequest { city } => write!(f, "weather({})", city),
            other => f.write_str(other.kind()),
        }
    }
}

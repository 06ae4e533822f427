use config::builder::DefaultState;
use config::ConfigBuilder;
use relaybot_channel::DeliveryMode;
use relaybot_provider::DEFAULT_BASE_URL;
use relaybot_types::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[telegram]
bot_token = ""  # Set via BOT_TOKEN env var

[weather]
api_key = ""  # Set via WEATHER_API_KEY env var, get one at https://openweathermap.org/api
base_url = "https://api.openweathermap.org/data/2.5"
lang = "ru"
timeout_secs = 10

[delivery]
mode = "polling"  # or "webhook"
webhook_url = ""  # Set via WEBHOOK_URL env var, e.g. https://example.com/bot
listen_addr = "0.0.0.0:8443"

[logging]
level = "info"  # trace, debug, info, warn, error
"#;

/// Convenience environment variables, applied in order (later wins)
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("BOT_TOKEN", "telegram.bot_token"),
    ("WEATHER_API_KEY", "weather.api_key"),
    ("WEBHOOK_URL", "delivery.webhook_url"),
];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Facts about the configuration that are safe to log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupStatus {
    pub token_configured: bool,
    pub token_length: usize,
    pub has_weather_key: bool,
    pub delivery_mode: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lang() -> String {
    "ru".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mode() -> String {
    "polling".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8443".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            webhook_url: String::new(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Get the global config path: ~/.relaybot/relaybot.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".relaybot").join("relaybot.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed.
    ///
    /// Returns `None` when there is no home directory (containers, serverless).
    fn ensure_global_config() -> anyhow::Result<Option<PathBuf>> {
        let Some(config_path) = Self::global_config_path() else {
            return Ok(None);
        };

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
            eprintln!("Please edit this file or set BOT_TOKEN / WEATHER_API_KEY.");
        }

        Ok(Some(config_path))
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.relaybot/relaybot.toml (auto-created if missing)
    /// 2. Local override: ./relaybot.toml (optional)
    /// 3. Environment variables with RELAYBOT__ prefix
    /// 4. BOT_TOKEN, WEATHER_API_KEY and friends (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(global_config_path) = Self::ensure_global_config()? {
            builder = builder.add_source(config::File::from(global_config_path));
        }

        builder = builder
            .add_source(config::File::with_name("relaybot").required(false))
            .add_source(config::Environment::with_prefix("RELAYBOT").separator("__"));

        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = env::var(var) {
                if !value.trim().is_empty() {
                    builder = builder.set_override(*key, value)?;
                }
            }
        }

        Self::from_builder(builder)
    }

    /// Build and deserialize an already assembled set of sources
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Telegram token; its absence disables the whole relay
    pub fn channel_token(&self) -> Result<&str, ConfigError> {
        let token = self.telegram.bot_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingChannelToken);
        }
        Ok(token)
    }

    /// Weather API key; `None` degrades weather replies to a configuration error
    pub fn weather_api_key(&self) -> Option<&str> {
        Some(self.weather.api_key.trim()).filter(|key| !key.is_empty())
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_secs)
    }

    pub fn delivery_mode(&self) -> Result<DeliveryMode, ConfigError> {
        match self.delivery.mode.trim().to_lowercase().as_str() {
            "polling" => Ok(DeliveryMode::Polling),
            "webhook" => {
                let raw_url = self.delivery.webhook_url.trim();
                if raw_url.is_empty() {
                    return Err(ConfigError::MissingWebhookUrl);
                }
                let url = Url::parse(raw_url).map_err(|e| ConfigError::InvalidWebhookUrl {
                    url: raw_url.to_string(),
                    reason: e.to_string(),
                })?;
                let listen_addr: SocketAddr = self
                    .delivery
                    .listen_addr
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidListenAddr(self.delivery.listen_addr.clone()))?;
                Ok(DeliveryMode::Webhook { url, listen_addr })
            }
            other => Err(ConfigError::InvalidDeliveryMode(other.to_string())),
        }
    }

    pub fn status(&self) -> StartupStatus {
        let token = self.telegram.bot_token.trim();
        StartupStatus {
            token_configured: !token.is_empty(),
            token_length: token.len(),
            has_weather_key: self.weather_api_key().is_some(),
            delivery_mode: self.delivery.mode.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(extra: &str) -> Config {
        let builder = config::Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(extra, FileFormat::Toml));
        Config::from_builder(builder).unwrap()
    }

    #[test]
    fn test_default_template_values() {
        let config = from_toml("");
        assert_eq!(config.weather.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.weather.lang, "ru");
        assert_eq!(config.weather_timeout(), Duration::from_secs(10));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.delivery_mode().unwrap(), DeliveryMode::Polling);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let config = from_toml("");
        assert!(matches!(
            config.channel_token(),
            Err(ConfigError::MissingChannelToken)
        ));
    }

    #[test]
    fn test_missing_weather_key_is_not_fatal() {
        let config = from_toml("[telegram]\nbot_token = \"123:abc\"");
        assert_eq!(config.channel_token().unwrap(), "123:abc");
        assert_eq!(config.weather_api_key(), None);
    }

    #[test]
    fn test_override_wins_over_file() {
        let builder = config::Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .set_override("weather.api_key", "from-env")
            .unwrap();
        let config = Config::from_builder(builder).unwrap();
        assert_eq!(config.weather_api_key(), Some("from-env"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let builder = config::Config::builder()
            .add_source(File::from_str("[telegram]\nbot_token = \"t\"", FileFormat::Toml));
        let config = Config::from_builder(builder).unwrap();
        assert_eq!(config.delivery.listen_addr, "0.0.0.0:8443");
        assert_eq!(config.weather.timeout_secs, 10);
    }

    #[test]
    fn test_webhook_mode() {
        let config = from_toml(
            "[delivery]\nmode = \"webhook\"\nwebhook_url = \"https://bot.example.com/api/bot\"\nlisten_addr = \"127.0.0.1:8080\"",
        );
        match config.delivery_mode().unwrap() {
            DeliveryMode::Webhook { url, listen_addr } => {
                assert_eq!(url.as_str(), "https://bot.example.com/api/bot");
                assert_eq!(listen_addr.port(), 8080);
            }
            other => panic!("expected webhook mode, got {:?}", other),
        }
    }

    #[test]
    fn test_webhook_mode_requires_url() {
        let config = from_toml("[delivery]\nmode = \"webhook\"");
        assert!(matches!(
            config.delivery_mode(),
            Err(ConfigError::MissingWebhookUrl)
        ));
    }

    #[test]
    fn test_invalid_delivery_settings() {
        let config = from_toml("[delivery]\nmode = \"carrier-pigeon\"");
        assert!(matches!(
            config.delivery_mode(),
            Err(ConfigError::InvalidDeliveryMode(_))
        ));

        let config = from_toml(
            "[delivery]\nmode = \"webhook\"\nwebhook_url = \"https://x.example\"\nlisten_addr = \"nowhere\"",
        );
        assert!(matches!(
            config.delivery_mode(),
            Err(ConfigError::InvalidListenAddr(_))
        ));
    }

    #[test]
    fn test_status_does_not_expose_secrets() {
        let config = from_toml("[telegram]\nbot_token = \"123:abc\"\n[weather]\napi_key = \"k\"");
        let status = config.status();
        assert_eq!(
            status,
            StartupStatus {
                token_configured: true,
                token_length: 7,
                has_weather_key: true,
                delivery_mode: "polling".to_string(),
            }
        );
        assert!(!format!("{:?}", status).contains("123:abc"));
    }
}

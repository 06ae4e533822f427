use crate::config::Config;
use anyhow::{Context, Result};
use relaybot_channel::{MessageChannel, Relay, TelegramChannel};
use relaybot_dispatch::IntentDispatcher;
use relaybot_provider::{OpenWeatherClient, OpenWeatherConfig, WeatherProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// How long shutdown waits for replies that are still being composed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(15);

/// Gateway service - main orchestrator
pub struct GatewayService {
    config: Config,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the weather provider, or `None` when no API key is configured
    fn weather_provider(&self) -> Result<Option<Arc<dyn WeatherProvider>>> {
        let Some(api_key) = self.config.weather_api_key() else {
            warn!("WEATHER_API_KEY is not set, weather requests will answer with a configuration error");
            return Ok(None);
        };

        let provider_config = OpenWeatherConfig::new(api_key)
            .with_base_url(&self.config.weather.base_url)
            .with_lang(&self.config.weather.lang)
            .with_timeout(self.config.weather_timeout());

        let client = OpenWeatherClient::new(provider_config)?;
        Ok(Some(Arc::new(client)))
    }

    /// Run the gateway service. Logging must already be initialized.
    pub async fn run(self) -> Result<()> {
        info!("Starting RelayBot Gateway Service");

        let status = self.config.status();
        info!(
            "Config status: token_configured={}, token_length={}, has_weather_key={}, delivery={}",
            status.token_configured,
            status.token_length,
            status.has_weather_key,
            status.delivery_mode
        );

        // Without a channel token nothing can be received or sent
        let token = self.config.channel_token()?;
        let mode = self.config.delivery_mode()?;

        let dispatcher = IntentDispatcher::new(self.weather_provider()?)
            .context("Failed to compile intent rules")?;
        info!("Intent dispatcher initialized");

        let (channel, listener) = TelegramChannel::connect(token, mode).await?;
        let channel: Arc<dyn MessageChannel> = Arc::new(channel);
        let relay = Relay::new(Arc::new(dispatcher), channel);
        let relay_task = tokio::spawn(async move { relay.run().await });

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let listener_run = listener.run(async move {
            let _ = stop_rx.await;
        });
        tokio::pin!(listener_run);

        // Setup signal handler for graceful shutdown
        let shutdown = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
            info!("Received shutdown signal");
        };

        let signalled = tokio::select! {
            result = &mut listener_run => {
                log_listener_exit(result);
                false
            }
            _ = shutdown => true,
        };

        if signalled {
            info!("Shutting down gracefully...");
            let _ = stop_tx.send(());
            log_listener_exit(listener_run.await);
        }

        // The listener is gone together with the inbox sender, so the relay
        // only has in-flight replies left
        info!("Waiting up to {:?} for in-flight replies", SHUTDOWN_GRACE);
        match tokio::time::timeout(SHUTDOWN_GRACE, relay_task).await {
            Ok(Ok(())) => info!("All in-flight replies handled"),
            Ok(Err(e)) => error!("Relay task failed: {}", e),
            Err(_) => warn!("In-flight replies did not finish within {:?}", SHUTDOWN_GRACE),
        }

        info!("Gateway service stopped");
        Ok(())
    }
}

fn log_listener_exit(result: Result<()>) {
    match result {
        Ok(()) => warn!("Telegram listener stopped"),
        Err(e) => error!("Telegram listener error: {:#}", e),
    }
}

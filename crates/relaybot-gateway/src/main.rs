mod config;
mod service;

use anyhow::Result;
use crate::config::Config;
use crate::service::GatewayService;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging depends on the configured level, so a broken config is
    // reported at the default level
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            relaybot_logging::init_logging("info")?;
            error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    relaybot_logging::init_logging(&config.logging.level)?;

    if let Err(e) = GatewayService::new(config).run().await {
        error!("Gateway service failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

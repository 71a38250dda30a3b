use std::error::Error;

use api::GatewayConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env when present.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .init();

    // Configuration errors abort before the listener is bound.
    let config = GatewayConfig::from_env()?;
    info!(
        address = %config.api_address,
        llm = ?config.llm.provider,
        history = ?config.history,
        origins = ?config.allowed_origins,
        "configuration loaded"
    );

    api::start(config).await?;

    Ok(())
}

/// Main entry point for the bar collector
use tracing::info;
use tracing_subscriber;

use barsync::{
    config::load_config,
    error::CollectorError,
    provider::YahooClient,
    scheduler::Scheduler,
    sheets::{ServiceAccountKey, SheetsClient, TokenProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("barsync=debug,info")
        .init();

    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config.toml".to_string());

    info!("Starting bar collector...");

    let config = load_config(&config_path)?;
    info!("Configuration loaded from {}", config_path);

    let zone = config.local_zone().ok_or_else(|| {
        CollectorError::ConfigError(format!("Unknown timezone: {}", config.timezone))
    })?;

    // Credential file problems are the one fatal startup condition; a token
    // exchange failure later is per-cycle recoverable
    let key = ServiceAccountKey::from_file(&config.credentials_file)?;
    let store = SheetsClient::new(
        TokenProvider::new(key),
        config.spreadsheet_id.clone(),
        config.worksheet.clone(),
    )?;

    let provider = YahooClient::new()?;

    let scheduler = Scheduler::new(config, zone, provider, store);
    scheduler.run().await?;

    Ok(())
}

use lares_bridge::app_config::AppConfig;
use lares_bridge::lares::client::LaresClient;
use lares_bridge::lares::setup;
use lares_bridge::platform::{LogPlatform, Platform};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::task;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    let client = Arc::new(LaresClient::new(&config)?);
    let connection = setup::validate(&client).await?;
    info!("✅  Connected to '{}' ({})", connection.title, connection.id);

    let platform: Arc<dyn Platform> = Arc::new(LogPlatform::new());
    let integration = setup::setup(client.clone(), &config, platform.clone()).await?;

    // Zones are read-only and carry no entities yet; surface them once so the
    // log shows what the panel watches.
    match client.zones(&integration.device).await {
        Ok(zones) => {
            let used = zones.iter().filter(|zone| zone.status.is_used()).count();
            let in_alarm = zones.iter().filter(|zone| zone.status.in_alarm()).count();
            let bypassed = zones.iter().filter(|zone| zone.status.is_bypassed()).count();
            info!("🛡️ {} zone(s): {} in use, {} in alarm, {} bypassed", zones.len(), used, in_alarm, bypassed);
        }
        Err(e) => debug!("🔴 Could not read zone status: {}", e),
    }

    let platform_reload = platform.clone();
    let mut hangup = signal(SignalKind::hangup())?;
    task::spawn(async move {
        loop {
            hangup.recv().await;
            platform_reload.on_options_changed().await;
        }
    });

    info!("🔥 {} is up and running, polling {} output(s)", env!("CARGO_PKG_NAME"), integration.outputs);
    integration.coordinator.clone().run().await;

    Ok(())
}

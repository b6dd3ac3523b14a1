//! Server binary entry point

use anyhow::{Context, Result};
use stlcost::Config;
use stlcost_server::{start_server, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stlcost=info,stlcost_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match std::env::var("STLCOST_CONFIG") {
        Ok(path) => {
            Config::load(&path).with_context(|| format!("Failed to load config from {path}"))?
        }
        Err(_) => Config::default(),
    };

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port.parse().with_context(|| format!("Invalid PORT `{port}`"))?;
        config.server.bind = format!("0.0.0.0:{port}");
    }

    let addr = config.server.bind.clone();
    tracing::info!(
        price_per_gram = config.pricing.price_per_gram,
        max_upload_bytes = config.server.max_upload_bytes,
        "Loaded pricing configuration"
    );

    start_server(&addr, AppState::new(config)).await?;

    Ok(())
}

//! Development server for clinic console UI work
//!
//! Runs the in-memory mock backend on the real clock, seeded with the same
//! dataset the integration tests use, so the UI has accounts, appointments,
//! plans and stock to show.
//!
//! Usage: cargo run -p dev-server
//!
//! `IP_ADDRESS`, `PORT`, `ALLOWED_ORIGINS`, `ACCESS_TOKEN_TTL_SECS` and
//! `REFRESH_TOKEN_TTL_SECS` are read from the environment or a .env file.
//! A short access token lifetime is handy for exercising the refresh flow:
//!
//! ACCESS_TOKEN_TTL_SECS=30 PORT=8000 cargo run -p dev-server

use std::sync::Arc;

use anyhow::Result;
use test_helpers::{
    Config, build,
    mock::DevDataset,
    store::ClinicStore,
    telemetry::{get_subscriber, init_subscriber, log_error},
    time::TimeSource,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Silently ignored if there is no .env file
    let _ = dotenvy::dotenv();

    init_subscriber(get_subscriber("info".into()))?;

    if let Err(e) = run().await {
        log_error(&e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    info!("🚀 Starting clinic development server");
    let mut config = Config::from_env()?;
    if config.port == 0 {
        config.port = 8000;
    }

    let store = Arc::new(ClinicStore::new(config.tokens, TimeSource::system()));
    info!("📊 Seeding development data...");
    let dataset = DevDataset::seed(&store);

    let server = build(&mut config, store).await?;
    tokio::spawn(server);

    info!("🎯 Development server ready!");
    info!("   API: http://{}:{}/api", config.ip, config.port);
    info!(
        "   UI:  cd ui && BACKEND_URL=http://{}:{} trunk serve",
        config.ip, config.port
    );
    info!(
        "   Access tokens live {}s, refresh tokens {}s",
        config.tokens.access_ttl.as_secs(),
        config.tokens.refresh_ttl.as_secs()
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}

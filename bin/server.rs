// Radiative Forcing Infographic - Web Server
// Loads the dataset once, then serves the page and the chart round trip

use anyhow::{Context, Result};
use clap::Parser;
use radiative_forcing::{init_logging, router, AppState, Config, Dataset};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.debug);

    println!("🌍 Radiative Forcing Infographic - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let dataset = Dataset::load(&config.data_path).context("Failed to load dataset")?;
    println!("✓ Dataset loaded: {} records from {:?}", dataset.len(), config.data_path);
    log::debug!("Dataset fingerprint {}", dataset.fingerprint());

    let state = AppState::new(Arc::new(dataset), config.debug);
    log::info!(
        "Default selection: {:?}",
        state.default_selection.iter().collect::<Vec<_>>()
    );

    let app = router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on {}", config.url());
    println!("   UI:  {}/", config.url());
    println!("   API: {}/api/chart (POST)", config.url());
    if config.debug {
        println!("   Debug mode on");
    }
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

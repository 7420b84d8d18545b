//! VPM Server - HTTP API for the Visual Product Matcher
//!
//! Loads `.env`, reads configuration, and serves until shutdown.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}

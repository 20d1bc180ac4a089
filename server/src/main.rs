use anyhow::Result;
use bulb_server::{http, runtime};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    runtime::init();
    info!("Starting light bulb server");

    // Initialize storage backend
    let service = runtime::service_from_env().await?;

    // Bind to address
    let addr = std::env::var("BIND_ADDRESS")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse::<SocketAddr>()?;

    // Start the HTTP server
    http::start_server(service, addr).await?;

    Ok(())
}

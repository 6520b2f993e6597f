use anyhow::{Context, Result};

use crate::metrics;
use crate::server::{ServerConfig, TrendingServer};
use crate::store::create_sqlite_store;

/// Configuration parameters for the trending server command
pub struct ServeParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub default_limit: usize,
    pub query_timeout: u64,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

/// Start the trending HTTP server
pub async fn serve(params: ServeParams) -> Result<()> {
    let ServeParams {
        host,
        port,
        database,
        default_limit,
        query_timeout,
        enable_cors,
        enable_logging,
    } = params;

    println!("Starting Trending Server");
    println!("========================");
    println!("  Host: {host}");
    println!("  Port: {port}");
    println!("  Database: {database}");
    println!("  Default limit: {default_limit}");
    println!("  Query timeout: {query_timeout}s");
    println!(
        "  CORS: {}",
        if enable_cors { "enabled" } else { "disabled" }
    );
    println!(
        "  Request Logging: {}",
        if enable_logging { "enabled" } else { "disabled" }
    );
    println!();

    if let Err(e) = metrics::init_metrics() {
        eprintln!("Warning: metrics initialization failed: {e}");
    }

    // Build bind address
    let bind_address = format!("{host}:{port}")
        .parse()
        .context("Invalid bind address")?;

    // Create server configuration
    let config = ServerConfig::builder()
        .bind_address(bind_address)
        .default_limit(default_limit)
        .query_timeout_secs(query_timeout)
        .enable_cors(enable_cors)
        .enable_request_logging(enable_logging)
        .build()?;

    // Open the post store
    let store = create_sqlite_store(&database)
        .with_context(|| format!("Failed to open post store at {database}"))?;

    // Create and start server
    let server = TrendingServer::new(store, config).context("Failed to create trending server")?;

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  GET  /api/trending?limit=N - Trending hashtags");
    println!("  GET  /api/health           - Health check");
    println!("  GET  /metrics              - Prometheus metrics endpoint");
    println!();
    println!("Trending server listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    // Start with graceful shutdown
    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Trending server stopped.");
    Ok(())
}

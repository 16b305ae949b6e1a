// appointment-parser - Gemini-backed appointment extraction service
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use appointment_parser::cli::Args;
use appointment_parser::config::AppConfig;
use appointment_parser::gemini::GeminiClient;
use appointment_parser::server::create_router;
use appointment_parser::utils::logging;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration (.env first so GEMINI_API_KEY can live there)
    dotenv::dotenv().ok();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting appointment-parser v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the Gemini client
    let gemini_client =
        GeminiClient::new(&config.gemini)?.with_log_sanitizing(config.logging.sanitize_secrets);
    info!(
        "Using Gemini model {} at {}",
        gemini_client.model(),
        gemini_client.base_url()
    );

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, gemini_client)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

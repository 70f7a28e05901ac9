use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use plateful_rs::{create_router, init_observability, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first
    let config = Config::from_environment()?;

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.enable_json_logging,
    )?;

    info!("Starting plateful-rs service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Upload directory: {}", config.uploads.upload_dir);

    // Wire repositories, services and metrics
    let state = AppState::new(&config)?;
    info!("Services initialized successfully");

    // Seed the bootstrap admin account
    state.bootstrap_admin(&config.auth).await?;
    info!("Admin account ready");

    // Build the application router
    let app = create_router(state, &config.uploads.upload_dir);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

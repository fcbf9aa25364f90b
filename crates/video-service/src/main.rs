//! Video Service
//!
//! Entry point for the meeting and attendee router.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use video_service::config::Config;
use video_service::observability::{logging, metrics};
use video_service::routes::{self, AppState};
use video_service::services::HttpVideoProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    info!("Starting Video Service");

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        media_region = %config.media_region,
        bind_address = %config.bind_address,
        ops_bind_address = %config.ops_bind_address,
        provider_request_timeout_seconds = config.provider_request_timeout_seconds,
        "Configuration loaded successfully"
    );

    let prometheus_handle = metrics::init_metrics_recorder().map_err(|e| {
        error!(error = %e, "Failed to initialize metrics recorder");
        e
    })?;

    let provider = HttpVideoProvider::from_config(&config).map_err(|e| {
        error!(error = %e, "Failed to build video provider client");
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!(error = %e, addr = %config.bind_address, "Invalid bind address");
        e
    })?;
    let ops_addr: SocketAddr = config.ops_bind_address.parse().map_err(|e| {
        error!(error = %e, addr = %config.ops_bind_address, "Invalid ops bind address");
        e
    })?;
    let drain_seconds = config.drain_seconds;

    let state = Arc::new(AppState {
        config,
        provider: Arc::new(provider),
    });

    let shutdown_token = CancellationToken::new();

    // Bind both listeners before serving to fail fast on bind errors
    let ops_listener = tokio::net::TcpListener::bind(ops_addr).await.map_err(|e| {
        error!(error = %e, addr = %ops_addr, "Failed to bind ops server");
        e
    })?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind public server");
        e
    })?;

    let ops_app = routes::build_ops_routes(prometheus_handle);
    let ops_shutdown_token = shutdown_token.child_token();
    let ops_task = tokio::spawn(async move {
        info!(addr = %ops_addr, "Ops server starting");
        let server = axum::serve(ops_listener, ops_app).with_graceful_shutdown(async move {
            ops_shutdown_token.cancelled().await;
            info!("Ops server shutting down");
        });
        if let Err(e) = server.await {
            error!(error = %e, "Ops server failed");
        }
    });

    let app = routes::build_routes(state);
    info!(addr = %addr, "Video Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain_seconds))
        .await?;

    shutdown_token.cancel();
    if let Err(e) = ops_task.await {
        warn!(error = %e, "Ops server task did not exit cleanly");
    }

    info!("Video Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and the drain period is complete.
async fn shutdown_signal(drain_seconds: u64) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!(error = %e, "Failed to listen for SIGINT"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    // The listener keeps accepting until the drain ends, so readiness probes
    // and load balancers observe the shutdown before connections are refused
    if drain_seconds > 0 {
        warn!(drain_seconds, "Draining connections...");
        tokio::time::sleep(Duration::from_secs(drain_seconds)).await;
        info!("Drain period complete");
    } else {
        info!("Skipping drain period (VIDEO_DRAIN_SECONDS=0)");
    }
}

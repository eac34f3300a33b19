//! Food Share - API Server Binary
//!
//! Starts the HTTP API server for the claim service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin foodshare-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin foodshare-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_DATABASE_MIN_CONNECTIONS` - Idle connections kept open (default: 0)
//! * `API_DATABASE_ACQUIRE_TIMEOUT_SECS` - Wait for a free connection (default: 30)
//! * `API_EXPIRY_SWEEP_INTERVAL_SECS` - Expiry sweep period, 0 to disable (default: 60)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SystemClock;
use domain_food::FoodRegistry;
use infra_db::{create_pool, run_migrations, PostgresClaimLedger, PostgresFoodRegistry};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Food Share API Server"
    );

    let pool = create_pool(config.database_config()).await?;
    run_migrations(&pool).await?;

    let food_port = Arc::new(PostgresFoodRegistry::new(pool.clone()));
    let claim_port = Arc::new(PostgresClaimLedger::new(pool));
    let clock = Arc::new(SystemClock);

    if config.expiry_sweep_interval_secs > 0 {
        let registry = FoodRegistry::new(food_port.clone(), clock.clone());
        tokio::spawn(run_expiry_sweep(
            registry,
            Duration::from_secs(config.expiry_sweep_interval_secs),
        ));
    }

    let state = AppState::new(food_port, claim_port, clock, config.clone());
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Periodically expires overdue listings
async fn run_expiry_sweep(registry: FoodRegistry, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        if let Err(e) = registry.expire_overdue().await {
            tracing::error!(error = %e, "expiry sweep failed");
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

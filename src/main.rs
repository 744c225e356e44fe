//! VaultMovies API - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool and run migrations (unless in-memory)
//! 3. Build HTTP router with routes and middleware
//! 4. Serve until Ctrl-C or SIGTERM

use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vaultmovies_api::{
    catalog::{CatalogRepository, InMemoryCatalog, PgCatalog},
    config::Config,
    db, routes,
    state::AppState,
    store::{InMemoryKeyStore, KeyStore, PgKeyStore},
};

#[derive(Debug, Parser)]
#[command(name = "vaultmovies-api", version, about = "Movie and manga catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Delete every issued API key and restart id numbering
    ResetKeys {
        /// Confirm that all key history should be destroyed
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::ResetKeys { yes } => reset_keys(config, yes).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let (keys, catalog): (Arc<dyn KeyStore>, Arc<dyn CatalogRepository>) = match &config.database_url {
        Some(database_url) if !config.in_memory => {
            let pool = db::create_pool(database_url, config.db_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            (
                Arc::new(PgKeyStore::new(pool.clone())),
                Arc::new(PgCatalog::new(pool)),
            )
        }
        _ => {
            tracing::warn!("Running with in-memory key store and empty catalog");
            (
                Arc::new(InMemoryKeyStore::new()),
                Arc::new(InMemoryCatalog::default()),
            )
        }
    };

    let state = AppState::new(keys, catalog, config.issuance_policy, config.key_ttl());
    tracing::info!(
        policy = ?state.issuer.policy(),
        ttl_hours = state.issuer.ttl().num_hours(),
        "Key issuer configured"
    );

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses are the requester identity for key issuance and checks
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn reset_keys(config: Config, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        anyhow::bail!("refusing to delete all API keys without --yes");
    }
    let Some(database_url) = config.database_url.as_deref() else {
        anyhow::bail!("reset-keys needs DATABASE_URL");
    };

    let pool = db::create_pool(database_url, 1).await?;
    db::run_migrations(&pool).await?;
    db::reset_api_keys(&pool).await?;
    tracing::warn!("All API keys deleted");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

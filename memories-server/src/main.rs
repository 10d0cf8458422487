//! memories-server - Memories gallery backend
//!
//! Serves the parsed memories feed and media files behind a shared access
//! code, and accepts spreadsheet/media uploads from the admin page.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use memories_common::api::auth::AccessGate;
use memories_common::config::{config_file_location, TomlConfig};
use memories_ingest::IngestCache;
use memories_server::config::{CliOverrides, ServerConfig};
use memories_server::storage::FileStorage;
use memories_server::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for memories-server
#[derive(Parser, Debug)]
#[command(name = "memories-server")]
#[command(about = "Access-code gated memories gallery backend")]
#[command(version)]
struct Args {
    /// Root folder holding uploads (overrides MEMORIES_ROOT_FOLDER and config file)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MEMORIES_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "MEMORIES_BIND")]
    bind: Option<String>,

    /// Shared access code; empty disables authentication
    #[arg(long, env = "MEMORIES_ACCESS_CODE", hide_env_values = true)]
    access_code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let file_config = TomlConfig::load_or_default();
    let config = ServerConfig::resolve(
        CliOverrides {
            root_folder: args.root_folder,
            bind_address: args.bind,
            port: args.port,
            access_code: args.access_code,
        },
        file_config,
    );

    init_tracing(&config)?;

    // Build identification first, before any I/O
    info!(
        "Starting memories-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    // Config is read before the subscriber exists, so report its source here
    match config_file_location() {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: none (compiled defaults)"),
    }
    info!("Root folder: {}", config.root_folder.display());

    let storage = FileStorage::open(config.root_folder.clone())
        .context("Failed to initialize upload storage")?;

    let access = AccessGate::from_code(config.access_code.as_deref());
    if access.is_enabled() {
        info!("✓ Access code required for API requests");
    } else {
        info!("Access code not configured (authentication disabled)");
    }

    let state = AppState::new(storage, IngestCache::new(config.cache_capacity), access);
    let app = build_router(state, config.max_upload_bytes);

    let address = config.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("memories-server listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over the configured level. With a log file configured,
/// output is appended there without ANSI colors.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level)));

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

//! Keepsake Persistence Daemon
//!
//! Buffers named JSON values in memory, flushes them to one durable file
//! on a debounce timer, and replays the last known value per channel at
//! startup and on manual trigger.

mod routes;
mod state;

use anyhow::Result;
use clap::Parser;
use keepsake_common::StoreConfig;
use keepsake_pipeline::StartupSignal;
use keepsake_store::{JsonBlobStore, PersistentStore};
use state::{AppState, LogDownstream};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "keepsaked")]
#[command(about = "Keepsake Persistence Daemon")]
#[command(version)]
struct Args {
    /// Path of the durable state file
    #[arg(short, long, default_value = "/var/lib/keepsake/state.json")]
    path: PathBuf,

    /// Debounce window in seconds between a mutation and its flush
    #[arg(short, long, default_value = "10")]
    interval: u64,

    /// Listen address for the HTTP API
    #[arg(short, long, default_value = "0.0.0.0:7677")]
    listen: String,

    /// Channels to create at startup (repeatable); each gets an ingest and
    /// a replay adapter, and replays its last value once serving begins
    #[arg(long = "channel")]
    channels: Vec<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Keepsake Persistence Daemon");
    info!(path = %args.path.display(), interval_secs = args.interval, "store configuration");

    let store = PersistentStore::open(
        Arc::new(JsonBlobStore::new()),
        StoreConfig::new(&args.path).with_interval_secs(args.interval),
    );
    let events = Arc::new(StartupSignal::new());
    let app_state = AppState::new(store, events.clone(), Arc::new(LogDownstream));

    for name in &args.channels {
        app_state.ensure_channel(name);
    }

    let app = routes::router(app_state.clone());

    let addr: SocketAddr = args
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", args.listen, e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    // The pipeline is wired and serving: replay every channel once.
    events.started().await;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down...");
        })
        .await?;

    app_state.shutdown();
    info!("Keepsake shut down gracefully");

    Ok(())
}

//! Coursepay CLI
//!
//! A headless driver for the course-marketplace purchase flow: cart,
//! checkout, and notifications against a remote REST backend, with
//! durable local state.

mod config;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use coursepay_core::checkout::{CheckoutConfig, CheckoutOrchestrator};
use coursepay_core::events::{CartSyncWorker, cart_mutation_channel, toast_channel};
use coursepay_core::persist::JsonFileStore;
use coursepay_core::stores::{CartStore, NotificationStore};
use coursepay_sdk::client::{CartSyncClient, MethodDirectoryClient, OrderClient, PaymentClient};
use repl::Repl;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Coursepay - course marketplace checkout client
#[derive(Parser, Debug)]
#[command(name = "coursepay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./coursepay.toml")]
    config: PathBuf,

    /// Override the backend API base URL
    #[arg(long)]
    api: Option<Url>,

    /// Override the local state directory
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting coursepay v{}", env!("CARGO_PKG_VERSION"));

    let mut file_config = config::load(&args.config).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(api) = args.api {
        file_config.api.base_url = api;
    }
    if let Some(dir) = args.state_dir {
        file_config.storage.dir = dir;
    }
    tracing::info!("Configuration loaded from {:?}", args.config);

    let persist = Arc::new(JsonFileStore::new(&file_config.storage.dir)?);

    // Event channels: toasts for the terminal, mutations for the mirror.
    let (toast_tx, toast_rx) = toast_channel();
    let (mutation_tx, mutation_rx) = cart_mutation_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cart = CartStore::load(persist.clone())
        .with_toast_sender(toast_tx.clone())
        .with_mutation_sender(mutation_tx);
    let inbox = NotificationStore::load(persist).with_toast_sender(toast_tx);

    let base_url = file_config.api.base_url.clone();
    let sync_worker = CartSyncWorker::new(
        CartSyncClient::new(base_url.clone()),
        mutation_rx,
        shutdown_rx,
    );
    let worker_handle = tokio::spawn(sync_worker.run());

    let orchestrator = CheckoutOrchestrator::new(
        OrderClient::new(base_url.clone()),
        PaymentClient::new(base_url.clone()),
        CheckoutConfig::new(file_config.receiving),
    );
    let methods = MethodDirectoryClient::new(base_url);

    let result = Repl::new(cart, inbox, orchestrator, methods, toast_rx)
        .run()
        .await;

    // Stop the mirror worker before exiting.
    let _ = shutdown_tx.send(true);
    let _ = worker_handle.await;
    tracing::info!("Shutdown complete");

    result
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,coursepay_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

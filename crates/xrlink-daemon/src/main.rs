//! xrlink daemon - Main entry point
//!
//! Bridges remote session clients and a running scene host: forwards playback
//! commands, drives the placeholder-then-target scene load, and streams loading
//! progress and playback status back to the clients.

mod api;
mod config;
mod event_loop;
mod host_link;
mod protocol;
mod server;
mod state;
mod ws;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use xrlink_core::{InterfaceProfile, SubscriptionHandle, Subscriptions};

#[derive(Parser, Debug)]
#[command(name = "xrlink")]
#[command(about = "Remote-control and telemetry bridge for interactive 3D sessions")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "xrlink.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Interface profile (screen, vr, ar)
    #[arg(short, long)]
    interface_mode: Option<InterfaceProfile>,

    /// Asset to open after the placeholder stage
    #[arg(short, long)]
    usd: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("xrlink v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }
    if let Some(mode) = args.interface_mode {
        config.bridge.interface_mode = mode;
    }
    if let Some(usd) = args.usd {
        config.bridge.usd_path = usd;
    }

    info!(
        profile = %config.bridge.interface_mode,
        usd = %config.bridge.usd_path,
        delay_ms = config.bridge.load_delay_ms,
        "Configuration loaded"
    );

    let bind = config.daemon.bind.clone();
    let (state, event_loop) = state::AppState::new(config);

    let mut subscriptions = Subscriptions::new();
    let task = tokio::spawn(event_loop.run());
    subscriptions.push(SubscriptionHandle::new("event-loop", move || task.abort()));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
    };

    let result = server::run(state, &bind, shutdown).await;

    subscriptions.unsubscribe_all();
    info!("Subscriptions released, exiting");
    result
}

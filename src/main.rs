//! ==============================================================================
//! main.rs - room monitor entry point
//! ==============================================================================
//!
//! purpose:
//!     keeps a local dashboard surface in sync with the smart room backend.
//!
//! responsibilities:
//!     - load configuration (file, then cli/env overrides)
//!     - build the http remote client and the surface
//!     - serve the surface endpoint the page talks to
//!     - run the initial load and start polling
//!     - stop polling on ctrl-c
//!
//! architecture:
//!
//!     ┌──────────────────────────────────────────────────────────┐
//!     │                     room monitor                          │
//!     │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────┐   │
//!     │  │ poll timer  │  │ surface http │  │ lifecycle       │   │
//!     │  │ (3s cycle)  │  │ (port 3000)  │  │ signals         │   │
//!     │  └──────┬──────┘  └──────┬───────┘  └────────┬────────┘   │
//!     │         └────────────────┼───────────────────┘            │
//!     │                    ┌─────┴─────┐                          │
//!     │                    │  monitor  │ gate + reconciler        │
//!     │                    └─────┬─────┘                          │
//!     └──────────────────────────┼───────────────────────────────┘
//!                                │ http
//!                       ┌────────┴────────┐
//!                       │ backend /api/*  │
//!                       └─────────────────┘
//!
//! ==============================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use room_monitor::{server, HttpRemote, MonitorConfig, RoomMonitor, Surface, SurfaceHandle};

/// Room monitor - keeps the smart room dashboard in sync with its backend
#[derive(Parser)]
#[command(name = "room-monitor", version, about)]
struct Cli {
    /// Config file (defaults to config/monitor.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base, e.g. http://127.0.0.1:8080/api
    #[arg(long, env = "ROOM_MONITOR_API_URL")]
    api_url: Option<String>,

    /// Address for the surface endpoint
    #[arg(long, env = "ROOM_MONITOR_BIND")]
    bind: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match MonitorConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] {e}");
                return ExitCode::FAILURE;
            }
        },
        None => MonitorConfig::load_or_default(),
    };

    init_logging(&config.logging.level, cli.verbose);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str, verbose: u8) {
    let filter = match verbose {
        0 => format!("{level},room_monitor={level}"),
        1 => format!("{level},room_monitor=debug"),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

async fn run(cli: Cli, mut config: MonitorConfig) -> anyhow::Result<()> {
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    println!("===========================================================");
    println!("  Smart Room Monitor");
    println!("===========================================================");
    config.print_summary();

    let remote = HttpRemote::new(
        &config.api.base_url,
        Duration::from_millis(config.api.request_timeout_ms),
    )?;
    let monitor = RoomMonitor::new(
        Arc::new(remote),
        SurfaceHandle::new(Surface::dashboard()),
        config.polling.interval(),
        config.feedback,
    );

    let server_monitor = monitor.clone();
    let bind = config.server.bind.clone();
    let server = tokio::spawn(async move { server::run_server(&bind, server_monitor).await });

    monitor.on_ready().await;

    tokio::select! {
        result = server => {
            monitor.stop_polling();
            result??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("shutting down");
            monitor.stop_polling();
        }
    }
    Ok(())
}

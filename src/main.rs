//! Overdose Dashboard Server
//!
//! Run with: cargo run --bin overdose-dashboard
//!
//! # Configuration
//!
//! Read from `--config`, or the first of
//! `$XDG_CONFIG_HOME/overdose-dashboard/config.toml`,
//! `/etc/overdose-dashboard/config.toml` and `./config.toml`.
//! `DASHBOARD_*` environment variables override file values; `RUST_LOG`
//! overrides the log filter.

use clap::Parser;
use overdose_dashboard::api::{serve, AppState};
use overdose_dashboard::auth::{
    AuthResult, IdentityProvider, IdentityToolkitProvider, MemoryProvider,
};
use overdose_dashboard::config::{AuthConfig, Config, LoggingConfig, ProviderKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "overdose-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the overdose dashboard and its API")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of the built UI bundle (overrides config)
    #[arg(long)]
    ui_dist: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(dist) = args.ui_dist {
        config.ui.dist_dir = Some(dist);
    }

    init_tracing(&config.logging);

    tracing::info!(
        "Starting overdose dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let provider = build_provider(&config.auth)?;
    tracing::info!(provider = %provider.name(), "Identity provider ready");
    if config.auth.provider == ProviderKind::Memory {
        tracing::warn!("Using the in-memory identity provider; accounts are lost on restart");
    }

    match &config.ui.dist_dir {
        Some(dir) => tracing::info!("UI bundle: {}", dir),
        None => tracing::info!("No UI bundle configured (set ui.dist_dir to serve one)"),
    }

    let state = AppState::new(config, provider);
    serve(state).await?;

    tracing::info!("Overdose dashboard stopped");
    Ok(())
}

/// Install the fmt subscriber: pretty or JSON, filtered by `RUST_LOG` or the config
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    let (json, pretty) = if logging.is_json() {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

fn build_provider(auth: &AuthConfig) -> AuthResult<Arc<dyn IdentityProvider>> {
    Ok(match auth.provider {
        ProviderKind::Memory => Arc::new(MemoryProvider::new()),
        ProviderKind::IdentityToolkit => {
            Arc::new(IdentityToolkitProvider::new(auth.identity_toolkit())?)
        }
    })
}

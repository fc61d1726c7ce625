//! HackHub API Server
//!
//! Run with: cargo run --bin hackhub
//!
//! Configuration comes from `config.toml` (or the file named by `HACKHUB_CONFIG`) with
//! `HACKHUB_*` environment overrides; see `hackhub-cli config` for the
//! full set of options. `RUST_LOG` overrides the configured log level.

use hackhub::api::{serve, AppState};
use hackhub::config::{Config, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting HackHub API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        provider = %config.media.provider,
        smtp_enabled = config.smtp.enabled,
        "Integrations"
    );

    let state = AppState::from_config(config)?;
    serve(state).await?;

    tracing::info!("HackHub API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter_directive().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

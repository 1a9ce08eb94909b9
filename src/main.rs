use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accounts_api::audit::{LogStore, MemoryLogStore, PostgresLogStore, ResilientLogger};
use accounts_api::config::{load_config, AppConfig};
use accounts_api::http::{AppState, HttpServer};
use accounts_api::lifecycle::Shutdown;
use accounts_api::observability::metrics;
use accounts_api::telemetry::{
    spawn_telemetry_worker, HttpTelemetrySink, NoopTelemetrySink, TelemetrySink,
};

#[derive(Parser, Debug)]
#[command(name = "accounts-api", about = "User account management API")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "accounts_api={},tower_http=info",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_enabled = config.database.enabled,
        telemetry_enabled = config.telemetry.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Primary audit sink
    let store: Arc<dyn LogStore> = if config.database.enabled {
        Arc::new(PostgresLogStore::connect(&config.database.dsn).await?)
    } else {
        tracing::warn!("database disabled, audit records are kept in memory");
        Arc::new(MemoryLogStore::new())
    };

    // Secondary telemetry sink behind its bounded queue
    let sink: Arc<dyn TelemetrySink> = if config.telemetry.enabled {
        Arc::new(HttpTelemetrySink::new(&config.telemetry))
    } else {
        Arc::new(NoopTelemetrySink)
    };
    let (queue, _telemetry_worker) = spawn_telemetry_worker(sink, config.telemetry.queue_capacity);

    let logger = Arc::new(ResilientLogger::new(store, queue, config.telemetry.enabled));

    let state = AppState::from_config(&config, logger)?;
    if let Some(admin) = &config.auth.bootstrap_admin {
        state.users.bootstrap(admin).await;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(&config, state);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

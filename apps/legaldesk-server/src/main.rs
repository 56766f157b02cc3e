//! # legaldesk-server
//!
//! Hosts the practice service over HTTP: loads configuration, connects to the
//! database, runs migrations and serves the REST API until Ctrl+C.

mod config;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use config::AppConfig;
use practice_service::PracticeServiceModule;
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "legaldesk-server", version, about = "LegalDesk practice management server")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&cfg.redacted())?);
        return Ok(());
    }

    init_tracing(&cfg.logging);
    info!("Starting LegalDesk server v{}", env!("CARGO_PKG_VERSION"));

    // Database
    let mut options = ConnectOptions::new(cfg.database.url.clone());
    options
        .max_connections(cfg.database.max_connections)
        .sqlx_logging(cfg.database.sqlx_logging);
    let db = Database::connect(options)
        .await
        .context("failed to connect to the database")?;

    // Module lifecycle
    let module = Arc::new(PracticeServiceModule::default());
    module.migrate(&db).await?;
    module.init(cfg.practice.clone(), db).await?;

    let app = module
        .register_rest(Router::new())?
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive());

    // Periodic cache eviction
    let janitor = module.clone();
    let every = cfg.server.cache_purge_interval;
    if !every.is_zero() {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = janitor.purge_caches();
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired cache entries");
                }
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind))?;
    info!(addr = %cfg.server.bind, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            }
            info!("Received Ctrl+C, shutting down");
        })
        .await?;
    Ok(())
}

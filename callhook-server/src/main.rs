//! Callhook Server
//!
//! Receives call-lifecycle webhooks and fans them out to the configured
//! handlers.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use callhook_core::config::Environment;
use callhook_core::processors::CallWebhookService;
use clap::Parser;
use config::{ConfigLoader, ConfigOverrides};
use server::{build_router, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Callhook - call-lifecycle webhook dispatcher
#[derive(Parser, Debug)]
#[command(name = "callhook-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./callhook.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Deployment environment (local, development, staging, production)
    #[arg(long, env = "CALLHOOK_ENVIRONMENT")]
    environment: Option<Environment>,

    /// Third-party automation webhook URL
    #[arg(long, env = "THIRD_PARTY_WEBHOOK_URL", hide_env_values = true)]
    third_party_webhook_url: Option<String>,

    /// Custom endpoint receiving raw call events
    #[arg(long, env = "CUSTOM_SERVER_WEBHOOK_URL", hide_env_values = true)]
    custom_webhook_url: Option<String>,

    /// Postgres connection string for the database handler
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.json_logs);

    tracing::info!("Starting callhook-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let overrides = ConfigOverrides {
        listen: args.listen,
        environment: args.environment,
        third_party_webhook_url: args.third_party_webhook_url,
        custom_webhook_url: args.custom_webhook_url,
        database_url: args.database_url,
    };
    let loaded_config = ConfigLoader::new(&args.config, overrides)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;

    let listen_addr = loaded_config.listen;
    let settings = Arc::new(loaded_config.settings);
    tracing::info!(environment = %settings.environment, "Configuration loaded from {:?}", args.config);

    // Run migrations if requested
    if args.migrate {
        let Some(database_url) = settings.database_url() else {
            tracing::error!("--migrate requires DATABASE_URL");
            anyhow::bail!("--migrate requires a database URL");
        };
        tracing::info!("Running database migrations...");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                e
            })?;
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        pool.close().await;
        tracing::info!("Migrations completed successfully");
    }

    // Build the dispatch service once; it is shared by every request
    let service = Arc::new(CallWebhookService::from_settings(&settings));
    let state = AppState::new(settings, service.clone());

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Release handler resources
    service.shutdown().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

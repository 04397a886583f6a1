use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobly_api::config::AppConfig;
use jobly_api::database::{init_schema, DatabaseManager};
use jobly_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "jobly-api", version, about = "Job board REST API")]
struct Args {
    /// Port to listen on (overrides PORT / JOBLY_API_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Create the companies, jobs, users and applications tables if missing
    #[arg(long)]
    init_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    let default_filter = match std::env::var("APP_ENV").as_deref() {
        Ok("production") | Ok("prod") => "info",
        _ => "jobly_api=debug,tower_http=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);

    let db = DatabaseManager::connect_lazy(&config.database).context("configuring database pool")?;
    if args.init_schema {
        init_schema(db.pool()).await.context("initializing schema")?;
        tracing::info!("Schema ready");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(db.clone(), config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

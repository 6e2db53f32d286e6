//! Mars rover pictures API service.
//!
//! HTTP caching proxy in front of the NASA Mars Rover Photos API: validates
//! rover/date requests, fetches and base64-encodes the referenced images,
//! and caches results per (rover, date).

use anyhow::Result;
use axum::{extract::Extension, routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use pictures_api::config::ApiConfig;
use pictures_api::handlers;
use pictures_api::preload::CachePreloader;
use pictures_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pictures-api")]
#[command(about = "Caching proxy for the NASA Mars Rover Photos API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000", env = "PICTURES_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "PICTURES_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build tokio runtime with configurable worker threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt().with_env_filter(filter).json().init();

    info!("Starting pictures API server");

    let config = ApiConfig::from_env();
    let state = Arc::new(AppState::new(config)?);

    spawn_preload(state.clone());

    // Build router
    let app = Router::new()
        .route("/pictures", get(handlers::pictures_handler))
        .route("/pictures/", get(handlers::pictures_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        // Layer extensions
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    // Parse listen address
    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read the preload date list and warm the cache in the background.
///
/// A missing or unreadable file downgrades to a warning; the server serves
/// requests either way, and never waits on preload completion.
fn spawn_preload(state: Arc<AppState>) {
    tokio::spawn(async move {
        let path = state.config.preload_dates_file.clone();
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Error preloading cache");
                return;
            }
        };

        let dates: Vec<String> = contents.lines().map(str::to_string).collect();
        CachePreloader::new(state.clone()).preload(&dates).await;
    });
}

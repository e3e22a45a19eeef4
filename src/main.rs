mod cache;
mod config;
mod error;
mod handlers;
mod metrics;
mod models;
mod state;
mod upstream;

use clap::Parser; // for cli
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cache::{ResponseCache, Sweeper};
use crate::config::Args;
use crate::state::AppState;
use crate::upstream::HttpCompletionClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

// this is main async function with tokio
#[tokio::main]
async fn main() -> ExitCode {
    // parse cli arguments
    let args = Args::parse();

    // a missing .env is fine as long as the key is in the environment
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(e) = &dotenv {
        info!("No .env loaded ({}), using process environment", e);
    }

    let api_key = match args.load_api_key() {
        Ok(key) => key,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cache = Arc::new(ResponseCache::new(args.ttl()));
    let upstream = HttpCompletionClient::new(reqwest::Client::new(), &args.api_url, api_key);

    // creating shared state
    let state = Arc::new(AppState {
        cache: Arc::clone(&cache),
        upstream: Arc::new(upstream),
        model: args.model.clone(),
    });

    let sweeper = Sweeper::start(Arc::clone(&cache), args.sweep_every());

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            sweeper.stop().await;
            return ExitCode::FAILURE;
        }
    };

    info!("Relay running on http://localhost:{}", args.port);
    info!("Forwarding to {} (model: {})", args.api_url, args.model);
    info!("Cache TTL: {:?}", cache.ttl());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.stop().await;

    match served {
        Ok(()) => {
            info!("Relay stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

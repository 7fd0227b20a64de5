//! Schedule-generation service.
//!
//! Run with: cargo run
//! Then POST a request to http://localhost:8080/generate-schedule

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use roster_scheduling::api::{self, AppState};
use roster_scheduling::SolverOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = env_or("PORT", 8080)?;
    let time_limit_secs: u64 = env_or("SOLVE_TIME_LIMIT_SECS", 60)?;
    let state = Arc::new(AppState {
        solver_options: SolverOptions {
            time_limit: Duration::from_secs(time_limit_secs),
        },
    });

    // CORS for browser front-ends.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, time_limit_secs, "schedule service listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {name}: {value:?}")),
        Err(_) => Ok(default),
    }
}

mod config;
mod db;
mod domain;
mod identity;
mod middleware;
mod state;
mod web;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;
    let addr = config.bind_addr.clone();

    tracing::info!("Seeding in-memory state...");
    let shared: SharedState = Arc::new(AppState::seeded(config).await?);
    tracing::info!(
        "Seeded {} employees and {} announcements",
        shared.employees.count().await,
        shared.announcements.count().await
    );

    let scheduler = JobScheduler::new().await?;

    // Expired sessions and reset flows - every minute
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 * * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let (sessions, resets) = state.purge_expired().await;
                if sessions > 0 || resets > 0 {
                    tracing::info!(
                        "Cleaned up {} expired sessions and {} expired reset flows",
                        sessions,
                        resets
                    );
                }
            })
        })?)
        .await?;

    scheduler.start().await?;
    tracing::info!("Scheduler started: expiry cleanup every minute");

    let app = web::routes(shared)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker API Server
//!
//! Serves users, teams, activities and workout templates, and ranks users
//! and teams by the points they have earned.

use anyhow::Context;
use octofit_tracker::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, FitnessStore, MemoryDb},
    services::{populate, LeaderboardService},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting OctoFit Tracker API"
    );

    let store: Arc<dyn FitnessStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryDb::new()),
        StoreBackend::Firestore => Arc::new(
            FirestoreDb::new(&config.gcp_project_id)
                .await
                .context("Failed to connect to Firestore")?,
        ),
    };

    let state = Arc::new(AppState::new(config.clone(), store));

    if config.seed_on_startup {
        let summary = populate(state.store.as_ref(), &state.leaderboard)
            .await
            .context("Failed to seed database")?;
        tracing::info!(?summary, "Database seeded");
    }

    if let Some(secs) = config.leaderboard_refresh_secs {
        spawn_leaderboard_refresh(state.leaderboard.clone(), Duration::from_secs(secs));
        tracing::info!(interval_secs = secs, "Periodic leaderboard refresh enabled");
    }

    // Build router
    let app = octofit_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Recompute the leaderboard every `period`. Failed passes are logged and
/// retried on the next tick.
fn spawn_leaderboard_refresh(leaderboard: LeaderboardService, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = leaderboard.recompute_leaderboard().await {
                tracing::error!(error = %e, "Periodic leaderboard recompute failed");
            }
        }
    });
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("octofit_tracker=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

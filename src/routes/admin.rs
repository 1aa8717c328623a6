// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes. Mounted behind `require_admin`.

use crate::error::Result;
use crate::services::{populate, PopulateSummary, RecomputeSummary};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/leaderboard/recompute", post(recompute))
        .route("/api/admin/populate", post(populate_db))
}

async fn recompute(State(state): State<Arc<AppState>>) -> Result<Json<RecomputeSummary>> {
    tracing::info!("Leaderboard recompute requested");
    Ok(Json(state.leaderboard.recompute_leaderboard().await?))
}

/// Wipe every collection and load the demo data set.
async fn populate_db(State(state): State<Arc<AppState>>) -> Result<Json<PopulateSummary>> {
    tracing::warn!("Populating database with demo data; existing data is deleted");
    let summary = populate(state.store.as_ref(), &state.leaderboard).await?;
    Ok(Json(summary))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only leaderboard routes.

use crate::error::{AppError, Result};
use crate::models::{EntryType, LeaderboardEntry};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/users", get(user_rankings))
        .route("/api/leaderboard/teams", get(team_rankings))
        .route("/api/leaderboard/{id}", get(get_entry))
}

/// Both rankings, rank ascending.
#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub users: Vec<LeaderboardEntry>,
    pub teams: Vec<LeaderboardEntry>,
}

async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Result<Json<LeaderboardResponse>> {
    let users = state.leaderboard.get_ranked_entries(EntryType::User).await?;
    let teams = state.leaderboard.get_ranked_entries(EntryType::Team).await?;
    Ok(Json(LeaderboardResponse { users, teams }))
}

async fn user_rankings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(
        state.leaderboard.get_ranked_entries(EntryType::User).await?,
    ))
}

async fn team_rankings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(
        state.leaderboard.get_ranked_entries(EntryType::Team).await?,
    ))
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaderboardEntry>> {
    let entry = state
        .leaderboard
        .get_entry(id)
        .await?
        .ok_or_else(|| AppError::not_found("Leaderboard entry", id))?;
    Ok(Json(entry))
}

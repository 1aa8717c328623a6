// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team routes.
//!
//! Only `name` and `description` are writable here. `members` follows user
//! writes and `total_points` is owned by the leaderboard pass.

use crate::error::{AppError, Result};
use crate::models::{Team, User};
use crate::routes::nullable;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/{id}",
            get(get_team)
                .put(replace_team)
                .patch(update_team)
                .delete(delete_team),
        )
        .route("/api/teams/{id}/members", get(team_members))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeamPatch {
    #[validate(length(min = 1, max = 100, message = "Team name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>> {
    Ok(Json(state.store.list_teams().await?))
}

async fn get_team(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<Team>> {
    Ok(Json(load_team(&state, id).await?))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TeamRequest>,
) -> Result<(StatusCode, Json<Team>)> {
    req.validate()?;

    let team = Team {
        id: Uuid::new_v4(),
        name: req.name,
        description: req.description,
        members: vec![],
        total_points: 0,
        created_at: chrono::Utc::now(),
    };

    store_team(&state, &team).await?;
    tracing::info!(team_id = %team.id, name = %team.name, "Team created");

    Ok((StatusCode::CREATED, Json(team)))
}

async fn replace_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<TeamRequest>,
) -> Result<Json<Team>> {
    req.validate()?;
    let mut team = load_team(&state, id).await?;

    team.name = req.name;
    team.description = req.description;

    store_team(&state, &team).await?;
    Ok(Json(team))
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TeamPatch>,
) -> Result<Json<Team>> {
    patch.validate()?;
    if let Some(Some(description)) = &patch.description {
        if description.len() > 1000 {
            return Err(AppError::BadRequest("Description too long".to_string()));
        }
    }
    let mut team = load_team(&state, id).await?;

    if let Some(name) = patch.name {
        team.name = name;
    }
    if let Some(description) = patch.description {
        team.description = description;
    }

    store_team(&state, &team).await?;
    Ok(Json(team))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.store.delete_team(id).await? {
        return Err(AppError::not_found("Team", id));
    }

    // Member `team_id` references are left dangling until reassigned.
    tracing::info!(team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn team_members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<User>>> {
    let team = load_team(&state, id).await?;
    Ok(Json(state.store.list_users_by_team(team.id).await?))
}

async fn load_team(state: &AppState, id: Uuid) -> Result<Team> {
    state
        .store
        .get_team(id)
        .await?
        .ok_or_else(|| AppError::not_found("Team", id))
}

async fn store_team(state: &AppState, team: &Team) -> Result<()> {
    if let Some(existing) = state.store.find_team_by_name(&team.name).await? {
        if existing.id != team.id {
            return Err(AppError::Conflict(format!(
                "Team name '{}' is already taken",
                team.name
            )));
        }
    }
    state.store.save_team(team).await
}

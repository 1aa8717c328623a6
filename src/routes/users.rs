// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes.

use crate::error::{AppError, Result};
use crate::models::{FitnessLevel, User};
use crate::routes::{nullable, required_param};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
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
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/by_team", get(users_by_team))
        .route(
            "/api/users/{id}",
            get(get_user)
                .put(replace_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

/// Create (or full replacement) payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,
    pub age: Option<u32>,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, message = "Height must not be negative"))]
    pub height: Option<f64>,
    pub fitness_level: Option<FitnessLevel>,
    pub team_id: Option<Uuid>,
}

/// Partial update payload.
///
/// Optional profile fields accept `null` to clear them; `team_id: null`
/// removes the user from their team.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub age: Option<Option<u32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub fitness_level: Option<Option<FitnessLevel>>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_id: Option<Option<Uuid>>,
}

impl UserPatch {
    fn check_measurements(&self) -> Result<()> {
        for (value, message) in [
            (self.weight, "Weight must not be negative"),
            (self.height, "Height must not be negative"),
        ] {
            if let Some(Some(v)) = value {
                if v < 0.0 {
                    return Err(AppError::BadRequest(message.to_string()));
                }
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ByTeamQuery {
    team: Option<String>,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> Result<Json<User>> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = User {
        id: Uuid::new_v4(),
        username: req.username,
        email: req.email,
        full_name: req.full_name,
        age: req.age,
        weight: req.weight,
        height: req.height,
        fitness_level: req.fitness_level,
        team_id: req.team_id,
        created_at: chrono::Utc::now(),
    };

    store_user(&state, None, &user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(user)))
}

async fn replace_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UserRequest>,
) -> Result<Json<User>> {
    req.validate()?;
    let previous = load_user(&state, id).await?;

    let user = User {
        id,
        username: req.username,
        email: req.email,
        full_name: req.full_name,
        age: req.age,
        weight: req.weight,
        height: req.height,
        fitness_level: req.fitness_level,
        team_id: req.team_id,
        created_at: previous.created_at,
    };

    store_user(&state, Some(&previous), &user).await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>> {
    patch.validate()?;
    patch.check_measurements()?;
    let previous = load_user(&state, id).await?;

    let mut user = previous.clone();
    if let Some(username) = patch.username {
        user.username = username;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(full_name) = patch.full_name {
        user.full_name = full_name;
    }
    if let Some(age) = patch.age {
        user.age = age;
    }
    if let Some(weight) = patch.weight {
        user.weight = weight;
    }
    if let Some(height) = patch.height {
        user.height = height;
    }
    if let Some(fitness_level) = patch.fitness_level {
        user.fitness_level = fitness_level;
    }
    if let Some(team_id) = patch.team_id {
        user.team_id = team_id;
    }

    store_user(&state, Some(&previous), &user).await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let user = load_user(&state, id).await?;

    state.store.delete_user(id).await?;
    sync_team_members(&state, Some(&user), None).await?;

    // Activities are kept; the next leaderboard pass excludes them.
    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Users on the team with the given name. Unknown teams yield an empty list.
async fn users_by_team(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByTeamQuery>,
) -> Result<Json<Vec<User>>> {
    let team_name = required_param(params.team, "Team")?;

    let users = match state.store.find_team_by_name(&team_name).await? {
        Some(team) => state.store.list_users_by_team(team.id).await?,
        None => vec![],
    };
    Ok(Json(users))
}

async fn load_user(state: &AppState, id: Uuid) -> Result<User> {
    state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

/// Check uniqueness and the team reference, save, then refresh the
/// affected teams' member caches.
async fn store_user(state: &AppState, previous: Option<&User>, user: &User) -> Result<()> {
    if let Some(existing) = state.store.find_user_by_username(&user.username).await? {
        if existing.id != user.id {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
    }
    if let Some(existing) = state.store.find_user_by_email(&user.email).await? {
        if existing.id != user.id {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
    }

    let team_changed = previous.map(|p| p.team_id) != Some(user.team_id);
    if let (Some(team_id), true) = (user.team_id, team_changed) {
        if state.store.get_team(team_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Unknown team {}", team_id)));
        }
    }

    state.store.save_user(user).await?;
    sync_team_members(state, previous, Some(user)).await
}

/// Keep `Team::members` in step with a user's membership change.
async fn sync_team_members(
    state: &AppState,
    previous: Option<&User>,
    current: Option<&User>,
) -> Result<()> {
    let old = previous.and_then(|u| u.team_id.map(|t| (t, u.username.as_str())));
    let new = current.and_then(|u| u.team_id.map(|t| (t, u.username.as_str())));
    if old == new {
        return Ok(());
    }

    if let Some((team_id, username)) = old {
        if let Some(mut team) = state.store.get_team(team_id).await? {
            if team.remove_member(username) {
                state.store.save_team(&team).await?;
            }
        }
    }
    if let Some((team_id, username)) = new {
        if let Some(mut team) = state.store.get_team(team_id).await? {
            team.add_member(username);
            state.store.save_team(&team).await?;
        }
    }
    Ok(())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity routes.

use crate::error::{AppError, Result};
use crate::models::{default_points, Activity};
use crate::routes::{nullable, required_param};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/by_user", get(activities_by_user))
        .route("/api/activities/by_type", get(activities_by_type))
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .put(replace_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}

/// Create (or full replacement) payload.
///
/// `points` defaults to `duration + calories_burned / 10` and `date` to now.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Activity type must be 1-100 characters"))]
    pub activity_type: String,
    pub duration: u32,
    #[validate(range(min = 0.0, message = "Distance must not be negative"))]
    pub distance: Option<f64>,
    pub calories_burned: Option<u32>,
    pub points: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 2000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityPatch {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Activity type must be 1-100 characters"))]
    pub activity_type: Option<String>,
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub distance: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub calories_burned: Option<Option<u32>>,
    pub points: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

#[derive(Deserialize)]
struct ByUserQuery {
    username: Option<String>,
}

#[derive(Deserialize)]
struct ByTypeQuery {
    #[serde(rename = "type")]
    activity_type: Option<String>,
}

async fn list_activities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Activity>>> {
    Ok(Json(state.store.list_activities().await?))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>> {
    Ok(Json(load_activity(&state, id).await?))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<Activity>)> {
    req.validate()?;
    let username = owner_username(&state, req.user_id).await?;

    let activity = Activity {
        id: Uuid::new_v4(),
        user_id: req.user_id,
        username,
        points: req
            .points
            .unwrap_or_else(|| default_points(req.duration, req.calories_burned)),
        activity_type: req.activity_type,
        duration: req.duration,
        distance: req.distance,
        calories_burned: req.calories_burned,
        date: req.date.unwrap_or_else(Utc::now),
        notes: req.notes,
    };

    state.store.save_activity(&activity).await?;
    tracing::info!(
        activity_id = %activity.id,
        user_id = %activity.user_id,
        points = activity.points,
        "Activity logged"
    );

    Ok((StatusCode::CREATED, Json(activity)))
}

async fn replace_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActivityRequest>,
) -> Result<Json<Activity>> {
    req.validate()?;
    let previous = load_activity(&state, id).await?;
    let username = owner_username(&state, req.user_id).await?;

    let activity = Activity {
        id,
        user_id: req.user_id,
        username,
        points: req
            .points
            .unwrap_or_else(|| default_points(req.duration, req.calories_burned)),
        activity_type: req.activity_type,
        duration: req.duration,
        distance: req.distance,
        calories_burned: req.calories_burned,
        date: req.date.unwrap_or(previous.date),
        notes: req.notes,
    };

    state.store.save_activity(&activity).await?;
    Ok(Json(activity))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ActivityPatch>,
) -> Result<Json<Activity>> {
    patch.validate()?;
    if let Some(Some(distance)) = patch.distance {
        if distance < 0.0 {
            return Err(AppError::BadRequest(
                "Distance must not be negative".to_string(),
            ));
        }
    }
    let mut activity = load_activity(&state, id).await?;

    if let Some(user_id) = patch.user_id {
        if user_id != activity.user_id {
            activity.username = owner_username(&state, user_id).await?;
            activity.user_id = user_id;
        }
    }
    if let Some(activity_type) = patch.activity_type {
        activity.activity_type = activity_type;
    }
    if let Some(duration) = patch.duration {
        activity.duration = duration;
    }
    if let Some(distance) = patch.distance {
        activity.distance = distance;
    }
    if let Some(calories_burned) = patch.calories_burned {
        activity.calories_burned = calories_burned;
    }
    if let Some(points) = patch.points {
        activity.points = points;
    }
    if let Some(date) = patch.date {
        activity.date = date;
    }
    if let Some(notes) = patch.notes {
        activity.notes = notes;
    }

    state.store.save_activity(&activity).await?;
    Ok(Json(activity))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.store.delete_activity(id).await? {
        return Err(AppError::not_found("Activity", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Activities of the user with the given username. Unknown users yield an
/// empty list.
async fn activities_by_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByUserQuery>,
) -> Result<Json<Vec<Activity>>> {
    let username = required_param(params.username, "Username")?;

    let activities = match state.store.find_user_by_username(&username).await? {
        Some(user) => state.store.list_activities_by_user(user.id).await?,
        None => vec![],
    };
    Ok(Json(activities))
}

async fn activities_by_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByTypeQuery>,
) -> Result<Json<Vec<Activity>>> {
    let activity_type = required_param(params.activity_type, "Type")?;
    Ok(Json(
        state.store.list_activities_by_type(&activity_type).await?,
    ))
}

async fn load_activity(state: &AppState, id: Uuid) -> Result<Activity> {
    state
        .store
        .get_activity(id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity", id))
}

/// Username of the referenced user, rejecting unknown users.
async fn owner_username(state: &AppState, user_id: Uuid) -> Result<String> {
    state
        .store
        .get_user(user_id)
        .await?
        .map(|user| user.username)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown user {}", user_id)))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout template routes.

use crate::error::{AppError, Result};
use crate::models::{FitnessLevel, Workout};
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
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/by_level", get(workouts_by_level))
        .route("/api/workouts/by_activity_type", get(workouts_by_activity_type))
        .route(
            "/api/workouts/{id}",
            get(get_workout)
                .put(replace_workout)
                .patch(update_workout)
                .delete(delete_workout),
        )
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: String,
    pub fitness_level: FitnessLevel,
    pub duration: u32,
    #[validate(length(min = 1, max = 100, message = "Activity type must be 1-100 characters"))]
    pub activity_type: String,
    #[serde(default)]
    pub exercises: Vec<String>,
    pub estimated_calories: Option<u32>,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WorkoutPatch {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,
    pub fitness_level: Option<FitnessLevel>,
    pub duration: Option<u32>,
    #[validate(length(min = 1, max = 100, message = "Activity type must be 1-100 characters"))]
    pub activity_type: Option<String>,
    pub exercises: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_calories: Option<Option<u32>>,
    pub points: Option<i64>,
}

#[derive(Deserialize)]
struct ByLevelQuery {
    level: Option<String>,
}

#[derive(Deserialize)]
struct ByTypeQuery {
    #[serde(rename = "type")]
    activity_type: Option<String>,
}

async fn list_workouts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Workout>>> {
    Ok(Json(state.store.list_workouts().await?))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workout>> {
    Ok(Json(load_workout(&state, id).await?))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>)> {
    req.validate()?;

    let workout = Workout {
        id: Uuid::new_v4(),
        name: req.name,
        description: req.description,
        fitness_level: req.fitness_level,
        duration: req.duration,
        activity_type: req.activity_type,
        exercises: req.exercises,
        estimated_calories: req.estimated_calories,
        points: req.points,
        created_at: chrono::Utc::now(),
    };

    state.store.save_workout(&workout).await?;
    tracing::info!(workout_id = %workout.id, name = %workout.name, "Workout created");

    Ok((StatusCode::CREATED, Json(workout)))
}

async fn replace_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<WorkoutRequest>,
) -> Result<Json<Workout>> {
    req.validate()?;
    let previous = load_workout(&state, id).await?;

    let workout = Workout {
        id,
        name: req.name,
        description: req.description,
        fitness_level: req.fitness_level,
        duration: req.duration,
        activity_type: req.activity_type,
        exercises: req.exercises,
        estimated_calories: req.estimated_calories,
        points: req.points,
        created_at: previous.created_at,
    };

    state.store.save_workout(&workout).await?;
    Ok(Json(workout))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<WorkoutPatch>,
) -> Result<Json<Workout>> {
    patch.validate()?;
    let mut workout = load_workout(&state, id).await?;

    if let Some(name) = patch.name {
        workout.name = name;
    }
    if let Some(description) = patch.description {
        workout.description = description;
    }
    if let Some(fitness_level) = patch.fitness_level {
        workout.fitness_level = fitness_level;
    }
    if let Some(duration) = patch.duration {
        workout.duration = duration;
    }
    if let Some(activity_type) = patch.activity_type {
        workout.activity_type = activity_type;
    }
    if let Some(exercises) = patch.exercises {
        workout.exercises = exercises;
    }
    if let Some(estimated_calories) = patch.estimated_calories {
        workout.estimated_calories = estimated_calories;
    }
    if let Some(points) = patch.points {
        workout.points = points;
    }

    state.store.save_workout(&workout).await?;
    Ok(Json(workout))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.store.delete_workout(id).await? {
        return Err(AppError::not_found("Workout", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn workouts_by_level(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByLevelQuery>,
) -> Result<Json<Vec<Workout>>> {
    let level: FitnessLevel = required_param(params.level, "Level")?
        .parse()
        .map_err(AppError::BadRequest)?;
    Ok(Json(state.store.list_workouts_by_level(level).await?))
}

async fn workouts_by_activity_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByTypeQuery>,
) -> Result<Json<Vec<Workout>>> {
    let activity_type = required_param(params.activity_type, "Type")?;
    Ok(Json(
        state
            .store
            .list_workouts_by_activity_type(&activity_type)
            .await?,
    ))
}

async fn load_workout(state: &AppState, id: Uuid) -> Result<Workout> {
    state
        .store
        .get_workout(id)
        .await?
        .ok_or_else(|| AppError::not_found("Workout", id))
}

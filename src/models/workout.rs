//! Workout template model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

use crate::models::FitnessLevel;

/// A suggested workout for a given fitness level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub fitness_level: FitnessLevel,
    /// Duration in minutes
    pub duration: u32,
    pub activity_type: String,
    #[serde(default)]
    pub exercises: Vec<String>,
    pub estimated_calories: Option<u32>,
    #[serde(default)]
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

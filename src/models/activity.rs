// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Stored activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Activity ID (also used as document ID)
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Owner's username at the time the activity was recorded
    pub username: String,
    /// Activity type (Running, Swimming, Yoga, etc.)
    pub activity_type: String,
    /// Duration in minutes
    pub duration: u32,
    /// Distance in kilometers
    pub distance: Option<f64>,
    pub calories_burned: Option<u32>,
    /// Points awarded. May be zero or negative.
    pub points: i64,
    /// When the activity took place
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Points awarded when the producer doesn't supply any:
/// one per minute plus one per ten calories.
pub fn default_points(duration: u32, calories_burned: Option<u32>) -> i64 {
    i64::from(duration) + i64::from(calories_burned.unwrap_or(0) / 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points() {
        assert_eq!(default_points(30, Some(300)), 60);
        assert_eq!(default_points(45, Some(109)), 55);
        assert_eq!(default_points(20, None), 20);
        assert_eq!(default_points(0, Some(9)), 0);
    }
}

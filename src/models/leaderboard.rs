// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard entries and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Discriminates per-user rows from per-team rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EntryType {
    User,
    Team,
}

impl EntryType {
    pub const ALL: [EntryType; 2] = [EntryType::User, EntryType::Team];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::User => "user",
            EntryType::Team => "team",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked row of a leaderboard.
///
/// User rows carry `user_id`/`username` and, if the user is on a known team,
/// `team_id`/`team_name`. Team rows carry only the team fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub entry_type: EntryType,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub total_points: i64,
    pub total_activities: u32,
    /// 1-based position within its entry type
    pub rank: u32,
    pub last_updated: DateTime<Utc>,
}

/// The complete ranking of one entry type, replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub entry_type: EntryType,
    /// Sorted by rank ascending
    pub entries: Vec<LeaderboardEntry>,
    pub computed_at: DateTime<Utc>,
}

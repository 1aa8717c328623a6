// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard recomputation.
//!
//! [`recompute`] is a pure function over complete in-memory collections.
//! [`LeaderboardService`] wraps it with the store reads, the team total
//! write-back, and the per-type snapshot swap.

use crate::db::FitnessStore;
use crate::error::Result;
use crate::models::{Activity, EntryType, LeaderboardEntry, Team, User};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const MAX_CONCURRENT_TEAM_WRITES: usize = 16;

/// Output of one recomputation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputation {
    /// Ranked per-user list
    pub user_entries: Vec<LeaderboardEntry>,
    /// Ranked per-team list
    pub team_entries: Vec<LeaderboardEntry>,
    /// `(team_id, total_points)` to write back onto each team, in input order
    pub team_totals: Vec<(Uuid, i64)>,
    /// Activities left out because their owner is not a known user
    pub excluded_activities: usize,
}

#[derive(Default, Clone, Copy)]
struct Totals {
    points: i64,
    activities: u32,
}

impl Totals {
    /// Saturates instead of overflowing on hostile point values.
    fn add(&mut self, points: i64) {
        self.points = self.points.saturating_add(points);
        self.activities = self.activities.saturating_add(1);
    }
}

/// Compute both rankings from a consistent snapshot of the data.
///
/// Activities are attributed through explicit identity lookups:
/// `activity.user_id` must resolve to a user in `users`, and that user's
/// `team_id` must resolve to a team in `teams`. Anything that does not
/// resolve is excluded from the affected aggregate without error.
///
/// Entries with equal points keep their relative order from `users` / `teams`.
pub fn recompute(
    users: &[User],
    teams: &[Team],
    activities: &[Activity],
    now: DateTime<Utc>,
) -> Recomputation {
    let user_index: HashMap<Uuid, &User> = users.iter().map(|u| (u.id, u)).collect();
    let team_index: HashMap<Uuid, &Team> = teams.iter().map(|t| (t.id, t)).collect();

    let mut user_totals: HashMap<Uuid, Totals> = HashMap::new();
    let mut team_totals: HashMap<Uuid, Totals> = HashMap::new();
    let mut excluded_activities = 0;

    for activity in activities {
        let Some(owner) = user_index.get(&activity.user_id) else {
            excluded_activities += 1;
            continue;
        };

        user_totals
            .entry(owner.id)
            .or_default()
            .add(activity.points);

        if let Some(team_id) = owner.team_id.filter(|id| team_index.contains_key(id)) {
            team_totals.entry(team_id).or_default().add(activity.points);
        }
    }

    let user_entries = users
        .iter()
        .map(|user| {
            let totals = user_totals.get(&user.id).copied().unwrap_or_default();
            let team = user.team_id.and_then(|id| team_index.get(&id));
            LeaderboardEntry {
                id: Uuid::new_v4(),
                entry_type: EntryType::User,
                user_id: Some(user.id),
                username: Some(user.username.clone()),
                team_id: team.map(|t| t.id),
                team_name: team.map(|t| t.name.clone()),
                total_points: totals.points,
                total_activities: totals.activities,
                rank: 0,
                last_updated: now,
            }
        })
        .collect();

    let team_entries = teams
        .iter()
        .map(|team| {
            let totals = team_totals.get(&team.id).copied().unwrap_or_default();
            LeaderboardEntry {
                id: Uuid::new_v4(),
                entry_type: EntryType::Team,
                user_id: None,
                username: None,
                team_id: Some(team.id),
                team_name: Some(team.name.clone()),
                total_points: totals.points,
                total_activities: totals.activities,
                rank: 0,
                last_updated: now,
            }
        })
        .collect();

    let team_totals = teams
        .iter()
        .map(|team| {
            let points = team_totals.get(&team.id).map_or(0, |t| t.points);
            (team.id, points)
        })
        .collect();

    Recomputation {
        user_entries: rank(user_entries),
        team_entries: rank(team_entries),
        team_totals,
        excluded_activities,
    }
}

/// Sort descending by points and number the result from 1.
///
/// `sort_by` is stable, so ties keep their input order.
fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
    entries
}

/// Result of a persisted recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeSummary {
    pub users: Vec<LeaderboardEntry>,
    pub teams: Vec<LeaderboardEntry>,
    pub computed_at: DateTime<Utc>,
}

/// Runs recomputation passes against the store and serves the rankings.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn FitnessStore>,
    /// Held for a whole pass so two passes never interleave their writes
    pass_lock: Arc<Mutex<()>>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn FitnessStore>) -> Self {
        Self {
            store,
            pass_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Recompute both leaderboards from the current store contents.
    ///
    /// Team totals are written back before the snapshots are swapped in.
    pub async fn recompute_leaderboard(&self) -> Result<RecomputeSummary> {
        let _guard = self.pass_lock.lock().await;
        self.run_pass().await
    }

    /// Block recomputation passes until the guard is dropped.
    ///
    /// Used by bulk rewrites of the store such as [`crate::services::populate`].
    pub async fn hold_passes(&self) -> PassGuard<'_> {
        PassGuard {
            service: self,
            _guard: self.pass_lock.lock().await,
        }
    }

    async fn run_pass(&self) -> Result<RecomputeSummary> {
        let users = self.store.list_users().await?;
        let teams = self.store.list_teams().await?;
        let activities = self.store.list_activities().await?;
        let computed_at = Utc::now();

        let result = recompute(&users, &teams, &activities, computed_at);

        if result.excluded_activities > 0 {
            tracing::warn!(
                excluded = result.excluded_activities,
                "Activities with unknown owners excluded from leaderboard"
            );
        }

        let totals: HashMap<Uuid, i64> = result.team_totals.iter().copied().collect();
        let vanished = stream::iter(teams)
            .map(|team| {
                let points = totals.get(&team.id).copied().unwrap_or(0);
                let store = self.store.clone();
                async move {
                    if team.total_points == points {
                        return Ok(true);
                    }
                    store.set_team_total_points(team.id, points).await
                }
            })
            .buffer_unordered(MAX_CONCURRENT_TEAM_WRITES)
            .collect::<Vec<Result<bool>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<bool>>>()?
            .into_iter()
            .filter(|written| !written)
            .count();

        if vanished > 0 {
            tracing::debug!(vanished, "Teams deleted during pass, totals not written");
        }

        self.store
            .replace_leaderboard_entries(EntryType::User, result.user_entries.clone())
            .await?;
        self.store
            .replace_leaderboard_entries(EntryType::Team, result.team_entries.clone())
            .await?;

        tracing::info!(
            users = users.len(),
            teams = result.team_entries.len(),
            activities = activities.len(),
            "Leaderboard recomputed"
        );

        Ok(RecomputeSummary {
            users: result.user_entries,
            teams: result.team_entries,
            computed_at,
        })
    }

    /// Current ranking for one entry type, rank ascending.
    ///
    /// Empty if no pass has run yet.
    pub async fn get_ranked_entries(&self, entry_type: EntryType) -> Result<Vec<LeaderboardEntry>> {
        let mut entries = self
            .store
            .get_leaderboard(entry_type)
            .await?
            .map(|s| s.entries)
            .unwrap_or_default();
        entries.sort_by_key(|e| e.rank);
        Ok(entries)
    }

    /// Look up a single entry in either current ranking.
    pub async fn get_entry(&self, id: Uuid) -> Result<Option<LeaderboardEntry>> {
        for entry_type in EntryType::ALL {
            let entries = self.get_ranked_entries(entry_type).await?;
            if let Some(entry) = entries.into_iter().find(|e| e.id == id) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

/// Exclusive hold on recomputation, from [`LeaderboardService::hold_passes`].
pub struct PassGuard<'a> {
    service: &'a LeaderboardService,
    _guard: MutexGuard<'a, ()>,
}

impl PassGuard<'_> {
    /// Run a pass without releasing the hold.
    pub async fn recompute_leaderboard(&self) -> Result<RecomputeSummary> {
        self.service.run_pass().await
    }
}

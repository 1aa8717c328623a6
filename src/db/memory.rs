// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backed by concurrent maps.
//!
//! Used for local development (`STORE_BACKEND=memory`) and by the offline
//! test suite. Contents are lost on restart.

use crate::db::{ordering, FitnessStore};
use crate::error::AppError;
use crate::models::{
    Activity, EntryType, FitnessLevel, LeaderboardEntry, LeaderboardSnapshot, Team, User, Workout,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory implementation of [`FitnessStore`].
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<Uuid, User>>,
    teams: Arc<DashMap<Uuid, Team>>,
    activities: Arc<DashMap<Uuid, Activity>>,
    workouts: Arc<DashMap<Uuid, Workout>>,
    /// Swapped whole on each replacement
    leaderboards: Arc<DashMap<EntryType, Arc<LeaderboardSnapshot>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<T: Clone>(map: &DashMap<Uuid, T>, keep: impl Fn(&T) -> bool) -> Vec<T> {
        map.iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }

    fn users_where(&self, keep: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users = Self::collect(&self.users, keep);
        ordering::users(&mut users);
        users
    }

    fn activities_where(&self, keep: impl Fn(&Activity) -> bool) -> Vec<Activity> {
        let mut activities = Self::collect(&self.activities, keep);
        ordering::activities(&mut activities);
        activities
    }

    fn workouts_where(&self, keep: impl Fn(&Workout) -> bool) -> Vec<Workout> {
        let mut workouts = Self::collect(&self.workouts, keep);
        ordering::workouts(&mut workouts);
        workouts
    }
}

#[async_trait]
impl FitnessStore for MemoryDb {
    // ─── Users ───────────────────────────────────────────────────

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users_where(|_| true))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users_where(|u| u.username == username).into_iter().next())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users_where(|u| u.email == email).into_iter().next())
    }

    async fn list_users_by_team(&self, team_id: Uuid) -> Result<Vec<User>, AppError> {
        Ok(self.users_where(|u| u.team_id == Some(team_id)))
    }

    async fn save_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.users.remove(&id).is_some())
    }

    // ─── Teams ───────────────────────────────────────────────────

    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let mut teams = Self::collect(&self.teams, |_| true);
        ordering::teams(&mut teams);
        Ok(teams)
    }

    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        Ok(self.teams.get(&id).map(|t| t.clone()))
    }

    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError> {
        Ok(self
            .teams
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value().clone()))
    }

    async fn save_team(&self, team: &Team) -> Result<(), AppError> {
        self.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn delete_team(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.teams.remove(&id).is_some())
    }

    async fn set_team_total_points(&self, id: Uuid, total_points: i64) -> Result<bool, AppError> {
        match self.teams.get_mut(&id) {
            Some(mut team) => {
                team.total_points = total_points;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ─── Activities ──────────────────────────────────────────────

    async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        Ok(self.activities_where(|_| true))
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>, AppError> {
        Ok(self.activities.get(&id).map(|a| a.clone()))
    }

    async fn list_activities_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, AppError> {
        Ok(self.activities_where(|a| a.user_id == user_id))
    }

    async fn list_activities_by_type(
        &self,
        activity_type: &str,
    ) -> Result<Vec<Activity>, AppError> {
        Ok(self.activities_where(|a| a.activity_type == activity_type))
    }

    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.activities.insert(activity.id, activity.clone());
        Ok(())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.activities.remove(&id).is_some())
    }

    // ─── Workouts ────────────────────────────────────────────────

    async fn list_workouts(&self) -> Result<Vec<Workout>, AppError> {
        Ok(self.workouts_where(|_| true))
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, AppError> {
        Ok(self.workouts.get(&id).map(|w| w.clone()))
    }

    async fn list_workouts_by_level(
        &self,
        level: FitnessLevel,
    ) -> Result<Vec<Workout>, AppError> {
        Ok(self.workouts_where(|w| w.fitness_level == level))
    }

    async fn list_workouts_by_activity_type(
        &self,
        activity_type: &str,
    ) -> Result<Vec<Workout>, AppError> {
        Ok(self.workouts_where(|w| w.activity_type == activity_type))
    }

    async fn save_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.workouts.insert(workout.id, workout.clone());
        Ok(())
    }

    async fn delete_workout(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.workouts.remove(&id).is_some())
    }

    // ─── Leaderboard ─────────────────────────────────────────────

    async fn get_leaderboard(
        &self,
        entry_type: EntryType,
    ) -> Result<Option<LeaderboardSnapshot>, AppError> {
        Ok(self
            .leaderboards
            .get(&entry_type)
            .map(|s| LeaderboardSnapshot::clone(s.value())))
    }

    async fn replace_leaderboard_entries(
        &self,
        entry_type: EntryType,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<(), AppError> {
        let computed_at = entries
            .iter()
            .map(|e| e.last_updated)
            .max()
            .unwrap_or_else(chrono::Utc::now);

        let snapshot = LeaderboardSnapshot {
            entry_type,
            entries,
            computed_at,
        };
        self.leaderboards.insert(entry_type, Arc::new(snapshot));
        Ok(())
    }

    // ─── Maintenance ─────────────────────────────────────────────

    async fn clear_all(&self) -> Result<(), AppError> {
        self.users.clear();
        self.teams.clear();
        self.activities.clear();
        self.workouts.clear();
        self.leaderboards.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn user(name: &str, offset_secs: i64) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            full_name: name.to_string(),
            age: None,
            weight: None,
            height: None,
            fitness_level: None,
            team_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    fn activity(user: &User, activity_type: &str, day: u32) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            activity_type: activity_type.to_string(),
            duration: 30,
            distance: None,
            calories_burned: None,
            points: 30,
            date: Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_users_listed_in_creation_order() {
        let db = MemoryDb::new();
        let carol = user("carol", 30);
        let alice = user("alice", 10);
        let bob = user("bob", 20);
        for u in [&carol, &alice, &bob] {
            db.save_user(u).await.unwrap();
        }

        let names: Vec<String> = db
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();

        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_activities_newest_first_and_filtered() {
        let db = MemoryDb::new();
        let alice = user("alice", 0);
        let bob = user("bob", 1);
        db.save_activity(&activity(&alice, "Running", 1)).await.unwrap();
        db.save_activity(&activity(&alice, "Yoga", 3)).await.unwrap();
        db.save_activity(&activity(&bob, "Running", 2)).await.unwrap();

        let all = db.list_activities().await.unwrap();
        let days: Vec<u32> = all
            .iter()
            .map(|a| chrono::Datelike::day(&a.date))
            .collect();
        assert_eq!(days, vec![3, 2, 1]);

        assert_eq!(db.list_activities_by_user(alice.id).await.unwrap().len(), 2);
        assert_eq!(
            db.list_activities_by_type("Running").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_replace_leaderboard_swaps_whole_snapshot() {
        let db = MemoryDb::new();
        assert!(db.get_leaderboard(EntryType::User).await.unwrap().is_none());

        let entry = |rank| LeaderboardEntry {
            id: Uuid::new_v4(),
            entry_type: EntryType::User,
            user_id: Some(Uuid::new_v4()),
            username: Some(format!("u{}", rank)),
            team_id: None,
            team_name: None,
            total_points: 10,
            total_activities: 1,
            rank,
            last_updated: Utc::now(),
        };

        db.replace_leaderboard_entries(EntryType::User, vec![entry(1), entry(2)])
            .await
            .unwrap();
        db.replace_leaderboard_entries(EntryType::User, vec![entry(1)])
            .await
            .unwrap();

        let snapshot = db.get_leaderboard(EntryType::User).await.unwrap().unwrap();
        assert_eq!(snapshot.entries.len(), 1);
        assert!(db.get_leaderboard(EntryType::Team).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_team_total_points_skips_missing_team() {
        let db = MemoryDb::new();
        let team = Team {
            id: Uuid::new_v4(),
            name: "Red".to_string(),
            description: Some("Original".to_string()),
            members: vec!["alice".to_string()],
            total_points: 0,
            created_at: Utc::now(),
        };
        db.save_team(&team).await.unwrap();

        assert!(db.set_team_total_points(team.id, 42).await.unwrap());
        let stored = db.get_team(team.id).await.unwrap().unwrap();
        assert_eq!(stored.total_points, 42);
        assert_eq!(stored.members, team.members);
        assert_eq!(stored.description, team.description);

        db.delete_team(team.id).await.unwrap();
        assert!(!db.set_team_total_points(team.id, 7).await.unwrap());
        assert!(db.get_team(team.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let db = MemoryDb::new();
        db.save_user(&user("alice", 0)).await.unwrap();
        db.replace_leaderboard_entries(EntryType::Team, vec![])
            .await
            .unwrap();

        db.clear_all().await.unwrap();

        assert!(db.list_users().await.unwrap().is_empty());
        assert!(db.get_leaderboard(EntryType::Team).await.unwrap().is_none());
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with `FIRESTORE_EMULATOR_HOST=localhost:8181 cargo test`.
//!
//! Tests share one emulator project and may run in parallel, so every
//! record uses a unique name and assertions only look at their own data.

use chrono::Utc;
use octofit_tracker::db::{FirestoreDb, FitnessStore};
use octofit_tracker::error::AppError;
use octofit_tracker::models::{
    Activity, EntryType, FitnessLevel, LeaderboardEntry, Team, User, Workout,
};
use uuid::Uuid;

mod common;
use common::test_db;

/// Unique suffix for test isolation.
fn unique() -> String {
    Uuid::new_v4().simple().to_string()
}

fn test_team(name: &str) -> Team {
    Team {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some("Integration test team".to_string()),
        members: vec![],
        total_points: 0,
        created_at: Utc::now(),
    }
}

fn test_user(username: &str, team_id: Option<Uuid>) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: "Test User".to_string(),
        age: Some(30),
        weight: None,
        height: None,
        fitness_level: Some(FitnessLevel::Beginner),
        team_id,
        created_at: Utc::now(),
    }
}

fn test_activity(user: &User, activity_type: &str, points: i64) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        user_id: user.id,
        username: user.username.clone(),
        activity_type: activity_type.to_string(),
        duration: 30,
        distance: None,
        calories_burned: Some(200),
        points,
        date: Utc::now(),
        notes: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OFFLINE CLIENT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_offline_client_reports_database_error() {
    let db = FirestoreDb::new_mock();

    let result = db.list_users().await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// USER & TEAM TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let tag = unique();
    let team = test_team(&format!("team-{tag}"));
    let user = test_user(&format!("user-{tag}"), Some(team.id));

    db.save_team(&team).await.unwrap();
    db.save_user(&user).await.unwrap();

    let fetched = db.get_user(user.id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&user));

    let by_name = db.find_user_by_username(&user.username).await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));
    let by_email = db.find_user_by_email(&user.email).await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));

    let members = db.list_users_by_team(team.id).await.unwrap();
    assert_eq!(members.len(), 1);

    let found_team = db.find_team_by_name(&team.name).await.unwrap();
    assert_eq!(found_team.map(|t| t.id), Some(team.id));

    assert!(db.delete_user(user.id).await.unwrap());
    assert!(!db.delete_user(user.id).await.unwrap());
    assert!(db.get_user(user.id).await.unwrap().is_none());

    assert!(db.delete_team(team.id).await.unwrap());
}

#[tokio::test]
async fn test_set_team_total_points_writes_only_total() {
    require_emulator!();

    let db = test_db().await;
    let mut team = test_team(&format!("team-{}", unique()));
    team.members = vec!["alice".to_string()];
    db.save_team(&team).await.unwrap();

    assert!(db.set_team_total_points(team.id, 99).await.unwrap());
    let stored = db.get_team(team.id).await.unwrap().unwrap();
    assert_eq!(stored.total_points, 99);
    assert_eq!(stored.name, team.name);
    assert_eq!(stored.members, team.members);
    assert_eq!(stored.description, team.description);

    // A deleted team is not recreated
    assert!(db.delete_team(team.id).await.unwrap());
    assert!(!db.set_team_total_points(team.id, 5).await.unwrap());
    assert!(db.get_team(team.id).await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVITY & WORKOUT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_activity_queries() {
    require_emulator!();

    let db = test_db().await;
    let tag = unique();
    let user = test_user(&format!("user-{tag}"), None);
    let activity_type = format!("Type-{tag}");

    db.save_user(&user).await.unwrap();
    let first = test_activity(&user, &activity_type, 10);
    let mut second = test_activity(&user, &activity_type, 20);
    second.date = first.date + chrono::Duration::hours(1);
    db.save_activity(&first).await.unwrap();
    db.save_activity(&second).await.unwrap();

    // Newest first
    let by_user = db.list_activities_by_user(user.id).await.unwrap();
    let ids: Vec<Uuid> = by_user.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let by_type = db.list_activities_by_type(&activity_type).await.unwrap();
    assert_eq!(by_type.len(), 2);

    assert!(db.delete_activity(first.id).await.unwrap());
    assert!(db.get_activity(first.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_workout_queries() {
    require_emulator!();

    let db = test_db().await;
    let activity_type = format!("Type-{}", unique());
    let workout = Workout {
        id: Uuid::new_v4(),
        name: "Integration Intervals".to_string(),
        description: "Short intervals".to_string(),
        fitness_level: FitnessLevel::Intermediate,
        duration: 25,
        activity_type: activity_type.clone(),
        exercises: vec!["Sprint".to_string(), "Rest".to_string()],
        estimated_calories: Some(300),
        points: 35,
        created_at: Utc::now(),
    };
    db.save_workout(&workout).await.unwrap();

    let by_type = db
        .list_workouts_by_activity_type(&activity_type)
        .await
        .unwrap();
    assert_eq!(by_type, vec![workout.clone()]);

    let by_level = db
        .list_workouts_by_level(FitnessLevel::Intermediate)
        .await
        .unwrap();
    assert!(by_level.iter().any(|w| w.id == workout.id));

    assert!(db.delete_workout(workout.id).await.unwrap());
}

// ═══════════════════════════════════════════════════════════════════════════
// LEADERBOARD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_leaderboard_snapshot_replaced() {
    require_emulator!();

    let db = test_db().await;
    let now = Utc::now();
    let entry = |points: i64, rank: u32| LeaderboardEntry {
        id: Uuid::new_v4(),
        entry_type: EntryType::Team,
        user_id: None,
        username: None,
        team_id: Some(Uuid::new_v4()),
        team_name: Some(format!("team-{rank}")),
        total_points: points,
        total_activities: 1,
        rank,
        last_updated: now,
    };

    let first = vec![entry(30, 1), entry(10, 2)];
    db.replace_leaderboard_entries(EntryType::Team, first)
        .await
        .unwrap();

    let second = vec![entry(5, 1)];
    db.replace_leaderboard_entries(EntryType::Team, second.clone())
        .await
        .unwrap();

    let snapshot = db.get_leaderboard(EntryType::Team).await.unwrap().unwrap();
    assert_eq!(snapshot.entry_type, EntryType::Team);
    assert_eq!(snapshot.entries, second);
}

#[tokio::test]
async fn test_large_leaderboard_split_across_chunks() {
    require_emulator!();

    let db = test_db().await;
    let now = Utc::now();
    // Well over one document's worth of entries
    let entries: Vec<LeaderboardEntry> = (1..=2500u32)
        .map(|rank| LeaderboardEntry {
            id: Uuid::new_v4(),
            entry_type: EntryType::User,
            user_id: Some(Uuid::new_v4()),
            username: Some(format!("user-{rank:04}-{}", unique())),
            team_id: Some(Uuid::new_v4()),
            team_name: Some(format!("team-{}", rank % 7)),
            total_points: i64::from(10_000 - rank),
            total_activities: rank % 50,
            rank,
            last_updated: now,
        })
        .collect();

    db.replace_leaderboard_entries(EntryType::User, entries.clone())
        .await
        .unwrap();
    let snapshot = db.get_leaderboard(EntryType::User).await.unwrap().unwrap();
    assert_eq!(snapshot.entries.len(), 2500);
    assert_eq!(snapshot.entries, entries);

    // A smaller replacement fully supersedes the chunked one
    let smaller = entries[..3].to_vec();
    db.replace_leaderboard_entries(EntryType::User, smaller.clone())
        .await
        .unwrap();
    let snapshot = db.get_leaderboard(EntryType::User).await.unwrap().unwrap();
    assert_eq!(snapshot.entries, smaller);

    db.replace_leaderboard_entries(EntryType::User, vec![])
        .await
        .unwrap();
    let snapshot = db.get_leaderboard(EntryType::User).await.unwrap().unwrap();
    assert!(snapshot.entries.is_empty());
}

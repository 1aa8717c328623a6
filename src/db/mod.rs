//! Database layer.
//!
//! [`FitnessStore`] is the persistence seam used by the routes and the
//! leaderboard service. Two backends implement it: [`MemoryDb`] for local
//! runs and tests, and [`FirestoreDb`] for production.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{
    Activity, EntryType, FitnessLevel, LeaderboardEntry, LeaderboardSnapshot, Team, User, Workout,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TEAMS: &str = "teams";
    pub const ACTIVITIES: &str = "activities";
    pub const WORKOUTS: &str = "workouts";
    /// One pointer document per entry type (keyed by "user" / "team")
    pub const LEADERBOARDS: &str = "leaderboards";
    /// Ranking pages, keyed by `{snapshot_id}_{index}`
    pub const LEADERBOARD_CHUNKS: &str = "leaderboard_chunks";
}

/// Persistence operations required by the API.
///
/// Ordering contract:
/// - users, teams, workouts: `created_at` ascending, then `id`
/// - activities: `date` descending, then `id`
///
/// `save_*` are upserts keyed by `id`. `delete_*` return whether a record was
/// removed.
#[async_trait]
pub trait FitnessStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users_by_team(&self, team_id: Uuid) -> Result<Vec<User>, AppError>;
    async fn save_user(&self, user: &User) -> Result<(), AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Teams ───────────────────────────────────────────────────
    async fn list_teams(&self) -> Result<Vec<Team>, AppError>;
    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError>;
    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError>;
    async fn save_team(&self, team: &Team) -> Result<(), AppError>;
    async fn delete_team(&self, id: Uuid) -> Result<bool, AppError>;
    /// Overwrite only `total_points` of an existing team.
    ///
    /// Returns `false` without writing if the team no longer exists.
    async fn set_team_total_points(&self, id: Uuid, total_points: i64) -> Result<bool, AppError>;

    // ─── Activities ──────────────────────────────────────────────
    async fn list_activities(&self) -> Result<Vec<Activity>, AppError>;
    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>, AppError>;
    async fn list_activities_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, AppError>;
    async fn list_activities_by_type(&self, activity_type: &str)
        -> Result<Vec<Activity>, AppError>;
    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError>;
    async fn delete_activity(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Workouts ────────────────────────────────────────────────
    async fn list_workouts(&self) -> Result<Vec<Workout>, AppError>;
    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, AppError>;
    async fn list_workouts_by_level(&self, level: FitnessLevel)
        -> Result<Vec<Workout>, AppError>;
    async fn list_workouts_by_activity_type(
        &self,
        activity_type: &str,
    ) -> Result<Vec<Workout>, AppError>;
    async fn save_workout(&self, workout: &Workout) -> Result<(), AppError>;
    async fn delete_workout(&self, id: Uuid) -> Result<bool, AppError>;

    // ─── Leaderboard ─────────────────────────────────────────────

    /// Current snapshot for an entry type, `None` if never computed.
    async fn get_leaderboard(
        &self,
        entry_type: EntryType,
    ) -> Result<Option<LeaderboardSnapshot>, AppError>;

    /// Atomically replace every entry of `entry_type` with `entries`.
    ///
    /// Concurrent readers see either the previous or the new list.
    async fn replace_leaderboard_entries(
        &self,
        entry_type: EntryType,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<(), AppError>;

    // ─── Maintenance ─────────────────────────────────────────────

    /// Delete every record in every collection.
    async fn clear_all(&self) -> Result<(), AppError>;
}

/// Sort key helpers shared by both backends.
pub(crate) mod ordering {
    use crate::models::{Activity, Team, User, Workout};

    pub fn users(users: &mut [User]) {
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }

    pub fn teams(teams: &mut [Team]) {
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }

    pub fn workouts(workouts: &mut [Workout]) {
        workouts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }

    pub fn activities(activities: &mut [Activity]) {
        activities.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
    }
}

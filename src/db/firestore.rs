// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users, Teams, Activities, Workouts (one document per record, keyed by id)
//! - Leaderboards (a pointer document per entry type, naming the chunk
//!   documents of the current snapshot)

use crate::db::{collections, ordering, FitnessStore};
use crate::error::AppError;
use crate::models::{
    Activity, EntryType, FitnessLevel, LeaderboardEntry, LeaderboardSnapshot, Team, User, Workout,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

// Keeps each chunk document well under the 1 MiB document limit.
const ENTRIES_PER_CHUNK: usize = 1000;

// A reader can lose a race with a writer deleting the previous chunks.
const SNAPSHOT_READ_ATTEMPTS: usize = 3;

/// Names the chunk documents that make up the current snapshot.
///
/// Rewriting this document is the atomic switch between snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeaderboardPointer {
    entry_type: EntryType,
    snapshot_id: Uuid,
    chunks: usize,
    computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeaderboardChunk {
    snapshot_id: Uuid,
    entry_type: EntryType,
    index: usize,
    entries: Vec<LeaderboardEntry>,
}

fn chunk_id(snapshot_id: Uuid, index: usize) -> String {
    format!("{snapshot_id}_{index}")
}

/// Field-masked write of a team's cached total.
#[derive(Debug, Serialize, Deserialize)]
struct TeamTotal {
    total_points: i64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ──────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_docs<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Documents whose `field` equals the given string value.
    async fn list_docs_where<T>(
        &self,
        collection: &str,
        field: &'static str,
        value: String,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field(field).eq(value.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T>(&self, collection: &str, id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a document, reporting whether it existed.
    async fn delete_existing<T>(&self, collection: &str, id: Uuid) -> Result<bool, AppError>
    where
        T: DeserializeOwned + Send,
    {
        let id = id.to_string();
        if self.get_doc::<T>(collection, &id).await?.is_none() {
            return Ok(false);
        }
        self.delete_doc(collection, &id).await?;
        Ok(true)
    }

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Entries of the snapshot named by `pointer`, or `None` if one of its
    /// chunks has already been deleted.
    async fn read_chunks(
        &self,
        pointer: &LeaderboardPointer,
    ) -> Result<Option<Vec<LeaderboardEntry>>, AppError> {
        let mut entries = Vec::new();
        for index in 0..pointer.chunks {
            let id = chunk_id(pointer.snapshot_id, index);
            match self
                .get_doc::<LeaderboardChunk>(collections::LEADERBOARD_CHUNKS, &id)
                .await?
            {
                Some(chunk) => entries.extend(chunk.entries),
                None => return Ok(None),
            }
        }
        Ok(Some(entries))
    }
}

#[async_trait]
impl FitnessStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.list_docs(collections::USERS).await?;
        ordering::users(&mut users);
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, &id.to_string()).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .list_docs_where(collections::USERS, "username", username.to_string())
            .await?;
        Ok(users.into_iter().next())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .list_docs_where(collections::USERS, "email", email.to_string())
            .await?;
        Ok(users.into_iter().next())
    }

    async fn list_users_by_team(&self, team_id: Uuid) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self
            .list_docs_where(collections::USERS, "team_id", team_id.to_string())
            .await?;
        ordering::users(&mut users);
        Ok(users)
    }

    async fn save_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id.to_string(), user)
            .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<User>(collections::USERS, id).await
    }

    // ─── Team Operations ─────────────────────────────────────────

    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let mut teams: Vec<Team> = self.list_docs(collections::TEAMS).await?;
        ordering::teams(&mut teams);
        Ok(teams)
    }

    async fn get_team(&self, id: Uuid) -> Result<Option<Team>, AppError> {
        self.get_doc(collections::TEAMS, &id.to_string()).await
    }

    async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError> {
        let teams: Vec<Team> = self
            .list_docs_where(collections::TEAMS, "name", name.to_string())
            .await?;
        Ok(teams.into_iter().next())
    }

    async fn save_team(&self, team: &Team) -> Result<(), AppError> {
        self.set_doc(collections::TEAMS, &team.id.to_string(), team)
            .await
    }

    async fn delete_team(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Team>(collections::TEAMS, id).await
    }

    /// Only `total_points` is written, and only if the team document exists,
    /// so concurrent edits and deletes are never overwritten.
    async fn set_team_total_points(&self, id: Uuid, total_points: i64) -> Result<bool, AppError> {
        let doc_id = id.to_string();
        let update = TeamTotal { total_points };

        let result: Result<(), _> = self
            .get_client()?
            .fluent()
            .update()
            .fields(["total_points"])
            .in_col(collections::TEAMS)
            .precondition(firestore::FirestoreWritePrecondition::Exists(true))
            .document_id(&doc_id)
            .object(&update)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                // A failed precondition means the team was deleted
                if self.get_doc::<Team>(collections::TEAMS, &doc_id).await?.is_none() {
                    return Ok(false);
                }
                Err(AppError::Database(e.to_string()))
            }
        }
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        let mut activities: Vec<Activity> = self.list_docs(collections::ACTIVITIES).await?;
        ordering::activities(&mut activities);
        Ok(activities)
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>, AppError> {
        self.get_doc(collections::ACTIVITIES, &id.to_string()).await
    }

    async fn list_activities_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, AppError> {
        let mut activities: Vec<Activity> = self
            .list_docs_where(collections::ACTIVITIES, "user_id", user_id.to_string())
            .await?;
        ordering::activities(&mut activities);
        Ok(activities)
    }

    async fn list_activities_by_type(
        &self,
        activity_type: &str,
    ) -> Result<Vec<Activity>, AppError> {
        let mut activities: Vec<Activity> = self
            .list_docs_where(
                collections::ACTIVITIES,
                "activity_type",
                activity_type.to_string(),
            )
            .await?;
        ordering::activities(&mut activities);
        Ok(activities)
    }

    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.set_doc(collections::ACTIVITIES, &activity.id.to_string(), activity)
            .await
    }

    async fn delete_activity(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Activity>(collections::ACTIVITIES, id)
            .await
    }

    // ─── Workout Operations ──────────────────────────────────────

    async fn list_workouts(&self) -> Result<Vec<Workout>, AppError> {
        let mut workouts: Vec<Workout> = self.list_docs(collections::WORKOUTS).await?;
        ordering::workouts(&mut workouts);
        Ok(workouts)
    }

    async fn get_workout(&self, id: Uuid) -> Result<Option<Workout>, AppError> {
        self.get_doc(collections::WORKOUTS, &id.to_string()).await
    }

    async fn list_workouts_by_level(
        &self,
        level: FitnessLevel,
    ) -> Result<Vec<Workout>, AppError> {
        let mut workouts: Vec<Workout> = self
            .list_docs_where(
                collections::WORKOUTS,
                "fitness_level",
                level.as_str().to_string(),
            )
            .await?;
        ordering::workouts(&mut workouts);
        Ok(workouts)
    }

    async fn list_workouts_by_activity_type(
        &self,
        activity_type: &str,
    ) -> Result<Vec<Workout>, AppError> {
        let mut workouts: Vec<Workout> = self
            .list_docs_where(
                collections::WORKOUTS,
                "activity_type",
                activity_type.to_string(),
            )
            .await?;
        ordering::workouts(&mut workouts);
        Ok(workouts)
    }

    async fn save_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.set_doc(collections::WORKOUTS, &workout.id.to_string(), workout)
            .await
    }

    async fn delete_workout(&self, id: Uuid) -> Result<bool, AppError> {
        self.delete_existing::<Workout>(collections::WORKOUTS, id)
            .await
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    async fn get_leaderboard(
        &self,
        entry_type: EntryType,
    ) -> Result<Option<LeaderboardSnapshot>, AppError> {
        for attempt in 1..=SNAPSHOT_READ_ATTEMPTS {
            let Some(pointer) = self
                .get_doc::<LeaderboardPointer>(collections::LEADERBOARDS, entry_type.as_str())
                .await?
            else {
                return Ok(None);
            };

            if let Some(entries) = self.read_chunks(&pointer).await? {
                return Ok(Some(LeaderboardSnapshot {
                    entry_type,
                    entries,
                    computed_at: pointer.computed_at,
                }));
            }

            tracing::debug!(
                entry_type = %entry_type,
                snapshot_id = %pointer.snapshot_id,
                attempt,
                "Leaderboard snapshot replaced during read, retrying"
            );
        }

        Err(AppError::Database(format!(
            "Leaderboard snapshot for {} kept changing during read",
            entry_type
        )))
    }

    /// Writes the ranking as chunk documents under a fresh snapshot id, then
    /// switches the pointer document. Readers see the old snapshot or the new
    /// one, never a mix.
    async fn replace_leaderboard_entries(
        &self,
        entry_type: EntryType,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<(), AppError> {
        let computed_at = entries
            .iter()
            .map(|e| e.last_updated)
            .max()
            .unwrap_or_else(Utc::now);
        let snapshot_id = Uuid::new_v4();
        let total = entries.len();

        let mut chunks = 0;
        for (index, page) in entries.chunks(ENTRIES_PER_CHUNK).enumerate() {
            let chunk = LeaderboardChunk {
                snapshot_id,
                entry_type,
                index,
                entries: page.to_vec(),
            };
            self.set_doc(
                collections::LEADERBOARD_CHUNKS,
                &chunk_id(snapshot_id, index),
                &chunk,
            )
            .await?;
            chunks += 1;
        }

        let previous = self
            .get_doc::<LeaderboardPointer>(collections::LEADERBOARDS, entry_type.as_str())
            .await?;

        let pointer = LeaderboardPointer {
            entry_type,
            snapshot_id,
            chunks,
            computed_at,
        };
        self.set_doc(collections::LEADERBOARDS, entry_type.as_str(), &pointer)
            .await?;

        if let Some(previous) = previous {
            let stale: Vec<String> = (0..previous.chunks)
                .map(|index| chunk_id(previous.snapshot_id, index))
                .collect();
            if let Err(e) = self
                .batch_delete(&stale, collections::LEADERBOARD_CHUNKS, |id: &String| {
                    id.clone()
                })
                .await
            {
                tracing::warn!(
                    entry_type = %entry_type,
                    snapshot_id = %previous.snapshot_id,
                    error = %e,
                    "Failed to delete previous leaderboard chunks"
                );
            }
        }

        tracing::debug!(
            entry_type = %entry_type,
            %snapshot_id,
            entries = total,
            chunks,
            "Leaderboard snapshot replaced"
        );
        Ok(())
    }

    // ─── Maintenance ─────────────────────────────────────────────

    async fn clear_all(&self) -> Result<(), AppError> {
        let activities = self.list_activities().await?;
        self.batch_delete(&activities, collections::ACTIVITIES, |a: &Activity| {
            a.id.to_string()
        })
        .await?;

        let users = self.list_users().await?;
        self.batch_delete(&users, collections::USERS, |u: &User| u.id.to_string())
            .await?;

        let teams = self.list_teams().await?;
        self.batch_delete(&teams, collections::TEAMS, |t: &Team| t.id.to_string())
            .await?;

        let workouts = self.list_workouts().await?;
        self.batch_delete(&workouts, collections::WORKOUTS, |w: &Workout| {
            w.id.to_string()
        })
        .await?;

        self.batch_delete(&EntryType::ALL, collections::LEADERBOARDS, |t: &EntryType| {
            t.as_str().to_string()
        })
        .await?;

        let chunks: Vec<LeaderboardChunk> =
            self.list_docs(collections::LEADERBOARD_CHUNKS).await?;
        self.batch_delete(&chunks, collections::LEADERBOARD_CHUNKS, |c: &LeaderboardChunk| {
            chunk_id(c.snapshot_id, c.index)
        })
        .await?;

        tracing::info!(
            activities = activities.len(),
            users = users.len(),
            teams = teams.len(),
            workouts = workouts.len(),
            "Cleared all collections"
        );
        Ok(())
    }
}

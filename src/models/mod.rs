// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod leaderboard;
pub mod team;
pub mod user;
pub mod workout;

pub use activity::{default_points, Activity};
pub use leaderboard::{EntryType, LeaderboardEntry, LeaderboardSnapshot};
pub use team::Team;
pub use user::{FitnessLevel, User};
pub use workout::Workout;

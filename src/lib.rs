// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OctoFit Tracker: fitness tracking backend
//!
//! This crate provides the REST API for users, teams, activities, workout
//! templates and the user/team leaderboards derived from activity points.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FitnessStore;
use services::LeaderboardService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FitnessStore>,
    pub leaderboard: LeaderboardService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn FitnessStore>) -> Self {
        let leaderboard = LeaderboardService::new(store.clone());
        Self {
            config,
            store,
            leaderboard,
        }
    }
}

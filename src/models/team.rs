//! Team model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// A team of users competing on the team leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Team {
    pub id: Uuid,
    /// Unique team name
    pub name: String,
    pub description: Option<String>,
    /// Member usernames. Denormalized cache; `User::team_id` is authoritative.
    #[serde(default)]
    pub members: Vec<String>,
    /// Sum of member activity points, overwritten by each leaderboard pass
    #[serde(default)]
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Add a username to the members cache if not already listed.
    pub fn add_member(&mut self, username: &str) {
        if !self.members.iter().any(|m| m == username) {
            self.members.push(username.to_string());
        }
    }

    /// Remove a username from the members cache.
    ///
    /// Returns `true` if it was listed.
    pub fn remove_member(&mut self, username: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != username);
        self.members.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Team Marvel".to_string(),
            description: None,
            members: vec![],
            total_points: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut team = team();
        team.add_member("thor");
        team.add_member("hulk");
        team.add_member("thor");

        assert_eq!(team.members, vec!["thor", "hulk"]);
    }

    #[test]
    fn test_remove_member() {
        let mut team = team();
        team.add_member("thor");

        assert!(team.remove_member("thor"));
        assert!(!team.remove_member("thor"));
        assert!(team.members.is_empty());
    }
}

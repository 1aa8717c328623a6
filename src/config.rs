//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Which data store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store (local development and tests)
    Memory,
    /// Google Cloud Firestore
    Firestore,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "firestore" => Ok(StoreBackend::Firestore),
            other => Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID (Firestore backend)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Data store selection
    pub store_backend: StoreBackend,
    /// Bearer key for `/api/admin/*`. `None` disables the admin routes.
    pub admin_api_key: Option<String>,
    /// Period of the background leaderboard refresh, in seconds.
    pub leaderboard_refresh_secs: Option<u64>,
    /// Run the demo seeder at startup
    pub seed_on_startup: bool,
}

impl Config {
    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            admin_api_key: Some("test_admin_key".to_string()),
            leaderboard_refresh_secs: None,
            seed_on_startup: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Memory,
        };

        let gcp_project_id = match (env::var("GCP_PROJECT_ID"), store_backend) {
            (Ok(id), _) => id,
            (Err(_), StoreBackend::Firestore) => {
                return Err(ConfigError::Missing("GCP_PROJECT_ID"))
            }
            (Err(_), StoreBackend::Memory) => "local-dev".to_string(),
        };

        let port = match env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v.clone()))?,
            Err(_) => 8080,
        };

        let leaderboard_refresh_secs = match env::var("LEADERBOARD_REFRESH_SECS") {
            Ok(v) => {
                let secs: u64 = v
                    .parse()
                    .map_err(|_| ConfigError::Invalid("LEADERBOARD_REFRESH_SECS", v.clone()))?;
                (secs > 0).then_some(secs)
            }
            Err(_) => None,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id,
            port,
            store_backend,
            admin_api_key: env::var("ADMIN_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            leaderboard_refresh_secs,
            seed_on_startup: env::var("SEED_ON_STARTUP")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

use anyhow::Result;
use sea_orm::Database;

use crate::schemas::AppState;

/// Application settings derived from the environment at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Comma-separated `ALLOWED_ORIGINS`; empty keeps CORS permissive
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load settings from the environment (and a `.env` file if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://agrirust.db".to_string());
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            database_url,
            bind_address,
            allowed_origins,
        }
    }
}

/// Connect to the database and build the shared application state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    Ok(AppState {
        db,
        allowed_origins: config.allowed_origins.clone(),
    })
}

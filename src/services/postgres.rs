use crate::models::{EventCategory, PreferenceProfile, UserPreferences};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL client for stored preference profiles
///
/// Attendees can save their filters once; recommendation requests that only
/// carry a `userId` are scored against the saved profile.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch the stored preference profile of a user
    pub async fn get_preferences(&self, user_id: &str) -> Result<PreferenceProfile, PostgresError> {
        let query = r#"
            SELECT user_id, price_min, price_max, categories, location,
                   date_start_ms, date_end_ms, updated_at
            FROM user_event_preferences
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("No preferences stored for user {}", user_id)))?;

        Ok(profile_from_row(&row))
    }

    /// Insert or replace the preference profile of a user
    pub async fn upsert_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> Result<PreferenceProfile, PostgresError> {
        let query = r#"
            INSERT INTO user_event_preferences
                (user_id, price_min, price_max, categories, location, date_start_ms, date_end_ms, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                price_min = EXCLUDED.price_min,
                price_max = EXCLUDED.price_max,
                categories = EXCLUDED.categories,
                location = EXCLUDED.location,
                date_start_ms = EXCLUDED.date_start_ms,
                date_end_ms = EXCLUDED.date_end_ms,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, price_min, price_max, categories, location,
                      date_start_ms, date_end_ms, updated_at
        "#;

        let categories: Vec<String> = preferences
            .categories
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(preferences.price_range[0])
            .bind(preferences.price_range[1])
            .bind(&categories)
            .bind(&preferences.location)
            .bind(preferences.date_range[0])
            .bind(preferences.date_range[1])
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Stored preferences for user {} ({} categories)", user_id, categories.len());

        Ok(profile_from_row(&row))
    }

    /// Remove the preference profile of a user
    pub async fn delete_preferences(&self, user_id: &str) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM user_event_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn profile_from_row(row: &PgRow) -> PreferenceProfile {
    let categories: Vec<String> = row.get("categories");

    PreferenceProfile {
        user_id: row.get("user_id"),
        preferences: UserPreferences {
            price_range: [row.get("price_min"), row.get("price_max")],
            categories: categories.into_iter().map(EventCategory::from).collect(),
            location: row.get("location"),
            date_range: [row.get("date_start_ms"), row.get("date_end_ms")],
        },
        updated_at: row.get("updated_at"),
    }
}

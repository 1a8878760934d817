use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::user::UserRow;

/// Creates and returns a PostgreSQL connection pool against the configured database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("Connecting to PostgreSQL database '{}'...", config.name);

    let options = PgConnectOptions::from_str(&config.url)?.database(&config.name);
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// The user collection: one document per user, keyed by username, with the
/// profile embedded. Carried in `AppState` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<UserRow>, AppError>;

    /// Inserts a new user document. Returns `false` if the username is taken.
    async fn insert_user(&self, user: &UserRow) -> Result<bool, AppError>;

    /// Replaces the profile embedded in the user's document.
    async fn save_profile(&self, username: &str, profile: &Profile) -> Result<(), AppError>;

    /// `None` when the user does not exist.
    async fn load_profile(&self, username: &str) -> Result<Option<Profile>, AppError>;
}

/// `UserStore` backed by a single Postgres table with a JSONB profile column.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
    /// Validated as a plain identifier by `Config`.
    table: String,
}

impl PgUserStore {
    pub fn new(pool: PgPool, collection: &str) -> Self {
        Self {
            pool,
            table: collection.to_string(),
        }
    }

    /// Creates the collection table if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), AppError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                username      TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                profile       JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        info!("User collection '{}' ready", self.table);
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user(&self, username: &str) -> Result<Option<UserRow>, AppError> {
        let sql = format!(
            "SELECT username, password_hash, created_at FROM {} WHERE username = $1",
            self.table
        );
        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_user(&self, user: &UserRow) -> Result<bool, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {} (username, password_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn save_profile(&self, username: &str, profile: &Profile) -> Result<(), AppError> {
        let sql = format!(
            "UPDATE {} SET profile = $2, updated_at = now() WHERE username = $1",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(username)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {username} not found")));
        }
        Ok(())
    }

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT profile FROM {} WHERE username = $1", self.table);
        let profile: Option<Json<Profile>> = sqlx::query_scalar(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile.map(|Json(p)| p))
    }
}

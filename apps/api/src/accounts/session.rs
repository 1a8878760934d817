//! Login sessions: created at login, destroyed at logout.
//!
//! A session carries the caller's identity plus the documents generated during
//! it. Nothing in a session is written to the user collection.

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// At most one document per kind; regenerating replaces the previous one.
    #[serde(default)]
    pub documents: Vec<GeneratedDocument>,
}

impl Session {
    pub fn new(username: &str) -> Self {
        Self {
            token: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
            documents: Vec::new(),
        }
    }

    pub fn store_document(&mut self, document: GeneratedDocument) {
        self.documents.retain(|d| d.kind != document.kind);
        self.documents.push(document);
    }

    pub fn document(&self, kind: DocumentKind) -> Option<&GeneratedDocument> {
        self.documents.iter().find(|d| d.kind == kind)
    }
}

/// Session persistence. Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, token: Uuid) -> Result<Option<Session>, AppError>;

    /// Creates or overwrites the session.
    async fn put(&self, session: &Session) -> Result<(), AppError>;

    /// Overwrites the session only if it still exists. Returns `false` when it
    /// was destroyed in the meantime, and then stores nothing.
    async fn update(&self, session: &Session) -> Result<bool, AppError>;

    async fn destroy(&self, token: Uuid) -> Result<(), AppError>;
}

/// Redis-backed sessions: JSON under `session:{token}` with a sliding TTL
/// refreshed on every write.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn key(token: Uuid) -> String {
        format!("session:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(Self::key(token)).await?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt session {token}: {e}")))
        })
        .transpose()
    }

    async fn put(&self, session: &Session) -> Result<(), AppError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize session: {e}")))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(session.token), json, self.ttl.as_secs())
            .await?;
        debug!(username = %session.username, "session stored");
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<bool, AppError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize session: {e}")))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // SET .. XX replies nil when the key is gone
        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::key(session.token))
            .arg(json)
            .arg("EX")
            .arg(self.ttl.as_secs())
            .arg("XX")
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn destroy(&self, token: Uuid) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }
}

/// Extracts the caller's session from `Authorization: Bearer <token>`.
/// Missing, malformed, expired or logged-out tokens are all `Unauthorized`.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or(AppError::Unauthorized)?;

        let session = state
            .sessions
            .get(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentSession(session))
    }
}

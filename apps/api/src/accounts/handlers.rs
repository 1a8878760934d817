use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::service;
use crate::accounts::session::CurrentSession;
use crate::errors::AppError;
use crate::extract::ValidJson;
use crate::models::profile::Profile;
use crate::profiles::repository;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub session_started_at: DateTime<Utc>,
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if let Some(confirm) = &req.confirm_password {
        if *confirm != req.password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
    }

    let user = service::register(state.users.as_ref(), &req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: user.username,
            created_at: user.created_at,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Opens a session and returns its token together with the saved profile.
pub async fn handle_login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = service::login(
        state.users.as_ref(),
        state.sessions.as_ref(),
        &req.username,
        &req.password,
    )
    .await?;

    let profile = repository::load(state.users.as_ref(), &session.username).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        username: session.username,
        profile,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<StatusCode, AppError> {
    service::logout(state.sessions.as_ref(), &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(CurrentSession(session): CurrentSession) -> Json<MeResponse> {
    Json(MeResponse {
        username: session.username,
        session_started_at: session.created_at,
    })
}

use axum::{extract::State, Json};

use crate::accounts::session::CurrentSession;
use crate::errors::AppError;
use crate::extract::ValidJson;
use crate::models::profile::Profile;
use crate::profiles::repository;
use crate::profiles::validation::validate_profile;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// Returns the caller's saved profile, or an empty profile if none was saved.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Profile>, AppError> {
    let profile = repository::load(state.users.as_ref(), &session.username).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Normalizes and validates the submitted profile, then replaces the stored one.
/// Returns the profile exactly as saved.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidJson(profile): ValidJson<Profile>,
) -> Result<Json<Profile>, AppError> {
    let profile = profile.normalized();

    let validation = validate_profile(&profile);
    if !validation.passed {
        return Err(AppError::Validation(validation.message()));
    }

    repository::save(state.users.as_ref(), &session.username, &profile).await?;
    Ok(Json(profile))
}

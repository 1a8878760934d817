//! Axum route handlers for the Generation API.
//!
//! Generation loads the caller's profile, runs one pipeline call and stores the
//! result in the session, replacing any earlier document of that kind.

use axum::{extract::State, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::accounts::session::{CurrentSession, Session};
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::generation::pipeline;
use crate::generation::requests::{CoverLetterRequest, EnhanceRequest, ResumeRequest};
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::profiles::repository;
use crate::state::AppState;

/// POST /api/v1/documents/:kind
///
/// The body shape depends on `kind`: `ResumeRequest`, `CoverLetterRequest`
/// or `EnhanceRequest`.
pub async fn handle_generate(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidPath(kind): ValidPath<DocumentKind>,
    ValidJson(body): ValidJson<Value>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let model = state.model.as_ref();
    let document = match kind {
        DocumentKind::Resume => {
            let request: ResumeRequest = parse_body(body)?;
            let profile = repository::load(state.users.as_ref(), &session.username).await?;
            pipeline::generate_resume(model, &profile, &request).await?
        }
        DocumentKind::CoverLetter => {
            let request: CoverLetterRequest = parse_body(body)?;
            request.validate()?;
            let profile = repository::load(state.users.as_ref(), &session.username).await?;
            pipeline::generate_cover_letter(model, &profile, &request).await?
        }
        DocumentKind::AchievementStatement => {
            let request: EnhanceRequest = parse_body(body)?;
            pipeline::enhance_skill_statement(model, &request).await?
        }
    };
    keep_in_session(&state, session, document).await
}

/// POST /api/v1/profile/analysis
///
/// Returns the model's JSON analysis of the saved profile. Not kept in the session.
pub async fn handle_analyze_portfolio(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Value>, AppError> {
    let profile = repository::load(state.users.as_ref(), &session.username).await?;
    let analysis = pipeline::analyze_portfolio(state.model.as_ref(), &profile).await?;
    Ok(Json(analysis))
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    CurrentSession(session): CurrentSession,
) -> Json<Vec<GeneratedDocument>> {
    Json(session.documents)
}

/// GET /api/v1/documents/:kind
pub async fn handle_get_document(
    CurrentSession(session): CurrentSession,
    ValidPath(kind): ValidPath<DocumentKind>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let document = session_document(&session, kind)?;
    Ok(Json(document.clone()))
}

/// Looks up the session's document of `kind`, or `NotFound`.
pub fn session_document(
    session: &Session,
    kind: DocumentKind,
) -> Result<&GeneratedDocument, AppError> {
    session.document(kind).ok_or_else(|| {
        AppError::NotFound(format!(
            "No {} has been generated in this session",
            kind.title().to_lowercase()
        ))
    })
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

async fn keep_in_session(
    state: &AppState,
    mut session: Session,
    document: GeneratedDocument,
) -> Result<Json<GeneratedDocument>, AppError> {
    session.store_document(document.clone());
    if !state.sessions.update(&session).await? {
        return Err(AppError::Unauthorized);
    }
    Ok(Json(document))
}
